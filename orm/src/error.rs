//! Error taxonomy for the mapping layer.
//!
//! [`MappingError`] covers everything that goes wrong while turning records
//! into statements or rows back into records; these are data problems the
//! caller has to fix. [`PersistenceError`] is what the [`Gateway`] returns and
//! additionally carries driver failures.
//!
//! [`Gateway`]: crate::Gateway

/// Descriptor, row or delimited-row conversion failure.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("entity `{entity}` declares no table name")]
    MissingTable { entity: &'static str },

    #[error("entity `{entity}` declares no identity field")]
    MissingIdentity { entity: &'static str },

    #[error("entity `{entity}` declares more than one identity field")]
    DuplicateIdentity { entity: &'static str },

    #[error("entity `{entity}` has no persisted field `{field}`")]
    UnknownField { entity: &'static str, field: String },

    #[error("field `{field}`: `{value}` is not a member of {enumeration}")]
    UnknownVariant {
        field: &'static str,
        enumeration: &'static str,
        value: String,
    },

    #[error("field `{field}`: cannot convert `{value}` to {expected}")]
    Conversion {
        field: String,
        value: String,
        expected: &'static str,
    },

    #[error("expected {expected} values but found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("column `{column}` is NULL but field is not nullable")]
    UnexpectedNull { column: &'static str },

    #[error("failed to read column `{column}`: {source}")]
    Column {
        column: &'static str,
        #[source]
        source: sqlx::Error,
    },
}

/// Errors surfaced by the [`Gateway`](crate::Gateway).
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("mapping error: {0}")]
    Mapping(#[from] MappingError),
    #[error("migration error: {0}")]
    Migration(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
