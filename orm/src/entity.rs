//! Per-type persistence declarations.
//!
//! A record type opts into the mapper by implementing [`Entity`]: it names its
//! table, lists its persisted fields in column order, and exposes get/set by
//! field name. Transient fields are simply left out of [`Entity::FIELDS`].

use crate::error::MappingError;
use crate::value::SqlValue;

/// Scalar kind of a persisted field. Drives column decoding and the
/// positional conversion used for delimited rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Integer,
    Long,
    Float,
    Boolean,
    Date,
    Enumerated,
    Text,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Enumerated => "enumerated",
            Self::Text => "text",
        }
    }
}

/// Static declaration of one persisted field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub name: &'static str,
    pub column: &'static str,
    pub kind: FieldKind,
    pub nullable: bool,
    pub identity: bool,
}

impl FieldDef {
    /// A non-null, non-identity column.
    pub const fn new(name: &'static str, column: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            column,
            kind,
            nullable: false,
            identity: false,
        }
    }

    /// The store-generated primary key. Nullable until first persisted.
    pub const fn identity(name: &'static str, column: &'static str) -> Self {
        Self {
            name,
            column,
            kind: FieldKind::Long,
            nullable: true,
            identity: true,
        }
    }

    pub const fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A record type that maps 1:1 onto a table.
///
/// `Default` supplies the zero-valued instance that rows are decoded into.
pub trait Entity: Default + Send + Sync + 'static {
    /// Type name used in diagnostics.
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Persisted fields in column order.
    const FIELDS: &'static [FieldDef];

    /// Read a persisted field.
    fn get(&self, field: &str) -> Result<SqlValue, MappingError>;

    /// Write a persisted field, converting from the stored representation.
    fn set(&mut self, field: &str, value: SqlValue) -> Result<(), MappingError>;
}

/// Helper for `Entity::get`/`Entity::set` fall-through arms.
pub fn unknown_field<E: Entity>(field: &str) -> MappingError {
    MappingError::UnknownField {
        entity: E::ENTITY,
        field: field.to_string(),
    }
}
