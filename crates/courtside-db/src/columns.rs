//! Conversions between domain integers and `INTEGER` columns.
//!
//! Domain counters are `u32`; `PostgreSQL` has no unsigned types, so every
//! counter is stored as `INTEGER` with a `CHECK (... >= 0)` constraint.

use crate::error::DbError;

/// Bind-side conversion. Values above `i32::MAX` are rejected rather than
/// wrapped.
pub(crate) fn to_column(value: u32, column: &str) -> Result<i32, DbError> {
    i32::try_from(value).map_err(|e| DbError::Decode(format!("{column} = {value}: {e}")))
}

/// Row-side conversion. Negative values mean the row bypassed the schema.
pub(crate) fn from_column(value: i32, column: &str) -> Result<u32, DbError> {
    u32::try_from(value).map_err(|e| DbError::Decode(format!("{column} = {value}: {e}")))
}

pub(crate) fn to_column_opt(value: Option<u32>, column: &str) -> Result<Option<i32>, DbError> {
    value.map(|v| to_column(v, column)).transpose()
}

pub(crate) fn from_column_opt(value: Option<i32>, column: &str) -> Result<Option<u32>, DbError> {
    value.map(|v| from_column(v, column)).transpose()
}
