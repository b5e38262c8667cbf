//! Dynamically typed column values and enumerated-type encoding.

use chrono::NaiveDate;

use crate::error::MappingError;

/// A single bound parameter or decoded column value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    Text(String),
}

/// An enumeration persisted by symbolic name.
///
/// Names are written exactly as [`Enumerated::name`] returns them and matched
/// case-insensitively when read back, so `"SUITE"`, `"Suite"` and `"suite"`
/// all decode to the same member.
pub trait Enumerated: Copy + 'static {
    /// Human-readable type name used in error messages.
    const TYPE_NAME: &'static str;
    /// Every member, in declaration order.
    const VARIANTS: &'static [Self];

    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::VARIANTS
            .iter()
            .copied()
            .find(|variant| variant.name().eq_ignore_ascii_case(name))
    }
}

impl SqlValue {
    /// Encode an enumerated value as its symbolic name.
    pub fn from_enum<E: Enumerated>(value: E) -> Self {
        SqlValue::Text(value.name().to_string())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    fn mismatch(&self, field: &'static str, expected: &'static str) -> MappingError {
        let value = match self {
            SqlValue::Null => "NULL".to_string(),
            SqlValue::Integer(v) => v.to_string(),
            SqlValue::Float(v) => v.to_string(),
            SqlValue::Boolean(v) => v.to_string(),
            SqlValue::Date(v) => v.to_string(),
            SqlValue::Text(v) => v.clone(),
        };
        MappingError::Conversion {
            field: field.to_string(),
            value,
            expected,
        }
    }

    pub fn into_i64(self, field: &'static str) -> Result<i64, MappingError> {
        match self {
            SqlValue::Integer(v) => Ok(v),
            other => Err(other.mismatch(field, "integer")),
        }
    }

    pub fn into_i32(self, field: &'static str) -> Result<i32, MappingError> {
        match self {
            SqlValue::Integer(v) => i32::try_from(v)
                .map_err(|_| SqlValue::Integer(v).mismatch(field, "32-bit integer")),
            other => Err(other.mismatch(field, "32-bit integer")),
        }
    }

    pub fn into_f32(self, field: &'static str) -> Result<f32, MappingError> {
        match self {
            SqlValue::Float(v) => Ok(v as f32),
            SqlValue::Integer(v) => Ok(v as f32),
            other => Err(other.mismatch(field, "float")),
        }
    }

    pub fn into_bool(self, field: &'static str) -> Result<bool, MappingError> {
        match self {
            SqlValue::Boolean(v) => Ok(v),
            SqlValue::Integer(0) => Ok(false),
            SqlValue::Integer(1) => Ok(true),
            other => Err(other.mismatch(field, "boolean")),
        }
    }

    pub fn into_date(self, field: &'static str) -> Result<NaiveDate, MappingError> {
        match self {
            SqlValue::Date(v) => Ok(v),
            other => Err(other.mismatch(field, "date")),
        }
    }

    pub fn into_string(self, field: &'static str) -> Result<String, MappingError> {
        match self {
            SqlValue::Text(v) => Ok(v),
            other => Err(other.mismatch(field, "text")),
        }
    }

    /// Decode a symbolic name. Unknown names are an error, never a default.
    pub fn into_enum<E: Enumerated>(self, field: &'static str) -> Result<E, MappingError> {
        match self {
            SqlValue::Text(name) => {
                E::from_name(&name).ok_or(MappingError::UnknownVariant {
                    field,
                    enumeration: E::TYPE_NAME,
                    value: name,
                })
            }
            other => Err(other.mismatch(field, E::TYPE_NAME)),
        }
    }

    /// Map `Null` to `None` and everything else through `convert`.
    pub fn into_option<T>(
        self,
        convert: impl FnOnce(Self) -> Result<T, MappingError>,
    ) -> Result<Option<T>, MappingError> {
        match self {
            SqlValue::Null => Ok(None),
            other => convert(other).map(Some),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Integer(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Integer(v as i64)
    }
}

impl From<f32> for SqlValue {
    fn from(v: f32) -> Self {
        SqlValue::Float(v as f64)
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Float(v)
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Boolean(v)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(v: NaiveDate) -> Self {
        SqlValue::Date(v)
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}
