//! Row-to-record mapping.
//!
//! Each record type lists its columns once in an [`Entity`] descriptor table.
//! [`extract`] walks that table, looks every column up by name in the
//! current row, and hands the raw value to the column's setter. Columns in
//! the row that the table does not mention are ignored.

use rusqlite::types::ValueRef;
use rusqlite::{Row, Statement};

use super::params::SemanticType;
use super::DbError;

/// One mapped column: its name in the result set, its semantic type, and
/// how to store the converted value on the record.
pub struct Column<T> {
    pub name: &'static str,
    pub kind: SemanticType,
    pub assign: fn(&mut T, ValueRef<'_>) -> Result<(), String>,
}

/// A record that can be built from a single result row.
pub trait Entity: Default + Sized + 'static {
    /// Used in error messages.
    const NAME: &'static str;
    const COLUMNS: &'static [Column<Self>];
}

/// Build a `T` from `row`, failing if any descriptor column is missing from
/// the result set or holds a value that cannot be converted.
pub fn extract<T: Entity>(row: &Row<'_>) -> Result<T, DbError> {
    let stmt: &Statement<'_> = row.as_ref();
    let mut record = T::default();

    for column in T::COLUMNS {
        let error = |reason: String| DbError::Extraction {
            entity: T::NAME,
            column: column.name,
            kind: column.kind,
            reason,
        };

        let index = stmt
            .column_index(column.name)
            .map_err(|_| error("column not found in result set".to_string()))?;
        let value = row.get_ref(index)?;
        (column.assign)(&mut record, value).map_err(error)?;
    }

    Ok(record)
}
