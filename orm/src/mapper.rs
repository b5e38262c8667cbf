//! Record ↔ row conversion.
//!
//! Writes go record → ordered [`SqlValue`]s whose order matches the
//! placeholders produced by [`crate::statement`]. Reads go row → record by
//! column name. Enumerated fields travel as their symbolic name in both
//! directions.

use chrono::NaiveDate;
use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use crate::descriptor::describe;
use crate::entity::{Entity, FieldDef, FieldKind};
use crate::error::MappingError;
use crate::value::SqlValue;

/// Date format accepted in delimited rows.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

fn checked_value<E: Entity>(record: &E, field: &FieldDef) -> Result<SqlValue, MappingError> {
    let value = record.get(field.name)?;
    if value.is_null() && !field.nullable {
        return Err(MappingError::UnexpectedNull {
            column: field.column,
        });
    }
    Ok(value)
}

/// Bind values for [`insert_statement`](crate::statement::insert_statement):
/// every persisted field in descriptor order.
pub fn to_row<E: Entity>(record: &E) -> Result<Vec<SqlValue>, MappingError> {
    let descriptor = describe::<E>()?;
    descriptor
        .fields()
        .iter()
        .map(|field| checked_value(record, field))
        .collect()
}

/// Bind values for [`update_statement`](crate::statement::update_statement):
/// the non-identity fields in descriptor order, then the identity.
pub fn to_row_without_identity<E: Entity>(record: &E) -> Result<Vec<SqlValue>, MappingError> {
    let descriptor = describe::<E>()?;
    let mut values = descriptor
        .non_identity_fields()
        .map(|field| checked_value(record, field))
        .collect::<Result<Vec<_>, _>>()?;
    values.push(record.get(descriptor.identity().name)?);
    Ok(values)
}

fn column_error(column: &'static str, source: sqlx::Error) -> MappingError {
    MappingError::Column { column, source }
}

fn read_column(row: &SqliteRow, field: &FieldDef) -> Result<SqlValue, MappingError> {
    let column = field.column;
    let value = match field.kind {
        FieldKind::Integer | FieldKind::Long => row
            .try_get::<Option<i64>, _>(column)
            .map_err(|e| column_error(column, e))?
            .map(SqlValue::Integer),
        FieldKind::Float => row
            .try_get::<Option<f64>, _>(column)
            .map_err(|e| column_error(column, e))?
            .map(SqlValue::Float),
        FieldKind::Boolean => row
            .try_get::<Option<bool>, _>(column)
            .map_err(|e| column_error(column, e))?
            .map(SqlValue::Boolean),
        FieldKind::Date => row
            .try_get::<Option<NaiveDate>, _>(column)
            .map_err(|e| column_error(column, e))?
            .map(SqlValue::Date),
        FieldKind::Enumerated | FieldKind::Text => row
            .try_get::<Option<String>, _>(column)
            .map_err(|e| column_error(column, e))?
            .map(SqlValue::Text),
    };
    Ok(value.unwrap_or(SqlValue::Null))
}

/// Decode a row into a fresh `E`, reading each persisted column by name.
pub fn from_row<E: Entity>(row: &SqliteRow) -> Result<E, MappingError> {
    let descriptor = describe::<E>()?;
    let mut record = E::default();
    for field in descriptor.fields() {
        let value = read_column(row, field)?;
        if value.is_null() && !field.nullable {
            return Err(MappingError::UnexpectedNull {
                column: field.column,
            });
        }
        record.set(field.name, value)?;
    }
    Ok(record)
}

fn parse_scalar(field: &FieldDef, raw: &str) -> Result<SqlValue, MappingError> {
    if raw.is_empty() && field.nullable {
        return Ok(SqlValue::Null);
    }

    let fail = |expected: &'static str| MappingError::Conversion {
        field: field.name.to_string(),
        value: raw.to_string(),
        expected,
    };

    match field.kind {
        FieldKind::Integer => raw
            .parse::<i32>()
            .map(SqlValue::from)
            .map_err(|_| fail("integer")),
        FieldKind::Long => raw
            .parse::<i64>()
            .map(SqlValue::from)
            .map_err(|_| fail("long")),
        FieldKind::Float => raw
            .parse::<f32>()
            .map(SqlValue::from)
            .map_err(|_| fail("float")),
        FieldKind::Boolean => match raw.to_ascii_lowercase().as_str() {
            "true" => Ok(SqlValue::Boolean(true)),
            "false" => Ok(SqlValue::Boolean(false)),
            _ => Err(fail("boolean")),
        },
        FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(SqlValue::Date)
            .map_err(|_| fail("date (YYYY-MM-DD)")),
        FieldKind::Enumerated | FieldKind::Text => Ok(SqlValue::Text(raw.to_string())),
    }
}

/// Build a record positionally from one delimited (CSV) row.
///
/// `field_order[i]` names the field that `raw[i]` populates. Values are
/// trimmed; an empty value on a nullable field becomes NULL. Fields not named
/// in `field_order` keep their default.
pub fn from_delimited_row<E: Entity>(
    field_order: &[&str],
    raw: &[&str],
) -> Result<E, MappingError> {
    if raw.len() != field_order.len() {
        return Err(MappingError::FieldCount {
            expected: field_order.len(),
            found: raw.len(),
        });
    }

    let descriptor = describe::<E>()?;
    let mut record = E::default();
    for (name, value) in field_order.iter().zip(raw) {
        let field = descriptor
            .field(name.trim())
            .ok_or_else(|| MappingError::UnknownField {
                entity: descriptor.entity(),
                field: name.to_string(),
            })?;
        let value = parse_scalar(field, value.trim())?;
        record.set(field.name, value)?;
    }
    Ok(record)
}
