//! Typed parameter binding.
//!
//! Every value that goes into a statement passes through [`SqlScalar`], which
//! turns it into a [`SqlParam`]. Absent values become `SqlParam::Null(kind)`
//! carrying the semantic type of the column they were meant for, so optional
//! and required fields share a single bind path. Supporting a new scalar
//! type means implementing [`SqlScalar`] for it; call sites stay unchanged.

use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use rusqlite::types::{ToSql, ToSqlOutput, Value, ValueRef};
use rusqlite::Statement;

use super::DbError;

/// Fractional digits kept for every fixed-point decimal.
pub const DECIMAL_SCALE: i64 = 2;

/// Total digits a `DECIMAL(7,2)` column holds.
pub const DECIMAL_PRECISION: u64 = 7;

/// The logical kind of a value, independent of SQLite's storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Text,
    Decimal,
    Integer,
}

impl SemanticType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Decimal => "decimal",
            Self::Integer => "integer",
        }
    }
}

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value ready to be bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Decimal(BigDecimal),
    Integer(i64),
    Null(SemanticType),
}

impl ToSql for SqlParam {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Text(text) => ToSqlOutput::Borrowed(ValueRef::Text(text.as_bytes())),
            Self::Decimal(decimal) => ToSqlOutput::Owned(Value::Text(decimal.to_string())),
            Self::Integer(int) => ToSqlOutput::Owned(Value::Integer(*int)),
            Self::Null(_) => ToSqlOutput::Owned(Value::Null),
        })
    }
}

/// A Rust type that maps onto one [`SemanticType`] in both directions.
///
/// `from_column` returns a plain reason string; the row extractor adds the
/// entity and column names when it turns that into a [`DbError`].
pub trait SqlScalar: Sized {
    const KIND: SemanticType;

    fn to_param(&self) -> SqlParam;

    fn from_column(value: ValueRef<'_>) -> Result<Self, String>;
}

impl SqlScalar for String {
    const KIND: SemanticType = SemanticType::Text;

    fn to_param(&self) -> SqlParam {
        SqlParam::Text(self.clone())
    }

    fn from_column(value: ValueRef<'_>) -> Result<Self, String> {
        match value {
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(str::to_owned)
                .map_err(|e| e.to_string()),
            other => Err(unexpected(Self::KIND, other)),
        }
    }
}

impl SqlScalar for i64 {
    const KIND: SemanticType = SemanticType::Integer;

    fn to_param(&self) -> SqlParam {
        SqlParam::Integer(*self)
    }

    fn from_column(value: ValueRef<'_>) -> Result<Self, String> {
        match value {
            ValueRef::Integer(int) => Ok(int),
            other => Err(unexpected(Self::KIND, other)),
        }
    }
}

impl SqlScalar for i32 {
    const KIND: SemanticType = SemanticType::Integer;

    fn to_param(&self) -> SqlParam {
        SqlParam::Integer(i64::from(*self))
    }

    fn from_column(value: ValueRef<'_>) -> Result<Self, String> {
        let int = i64::from_column(value)?;
        i32::try_from(int).map_err(|_| format!("{int} does not fit in a 32-bit integer"))
    }
}

impl SqlScalar for BigDecimal {
    const KIND: SemanticType = SemanticType::Decimal;

    fn to_param(&self) -> SqlParam {
        SqlParam::Decimal(normalize_scale(self))
    }

    // DECIMAL columns have NUMERIC affinity, so SQLite may hand the value
    // back as INTEGER, REAL or TEXT depending on what it could convert.
    fn from_column(value: ValueRef<'_>) -> Result<Self, String> {
        let decimal = match value {
            ValueRef::Integer(int) => BigDecimal::from(int),
            ValueRef::Real(real) => {
                BigDecimal::from_str(&real.to_string()).map_err(|e| e.to_string())?
            }
            ValueRef::Text(bytes) => {
                let text = std::str::from_utf8(bytes).map_err(|e| e.to_string())?;
                BigDecimal::from_str(text.trim()).map_err(|e| e.to_string())?
            }
            other => return Err(unexpected(Self::KIND, other)),
        };
        Ok(normalize_scale(&decimal))
    }
}

impl<T: SqlScalar> SqlScalar for Option<T> {
    const KIND: SemanticType = T::KIND;

    fn to_param(&self) -> SqlParam {
        match self {
            Some(value) => value.to_param(),
            None => SqlParam::Null(T::KIND),
        }
    }

    fn from_column(value: ValueRef<'_>) -> Result<Self, String> {
        match value {
            ValueRef::Null => Ok(None),
            other => T::from_column(other).map(Some),
        }
    }
}

fn unexpected(kind: SemanticType, value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Null => format!("unexpected NULL for {kind} column"),
        other => format!("expected {kind}, found {}", other.data_type()),
    }
}

/// Bind `value` to the 1-based placeholder `index` of `stmt`.
pub fn set_parameter<T: SqlScalar>(
    stmt: &mut Statement<'_>,
    index: usize,
    value: &T,
) -> Result<(), DbError> {
    let param = value.to_param();
    match &param {
        SqlParam::Null(kind) => tracing::trace!(index, %kind, "binding NULL parameter"),
        SqlParam::Decimal(decimal) => {
            check_precision(decimal).map_err(|reason| DbError::Binding {
                field: "decimal number",
                value: decimal.to_string(),
                reason,
            })?;
        }
        _ => {}
    }
    stmt.raw_bind_parameter(index, param)?;
    Ok(())
}

/// Round to exactly [`DECIMAL_SCALE`] fractional digits, half-up.
pub fn normalize_scale(value: &BigDecimal) -> BigDecimal {
    value.with_scale_round(DECIMAL_SCALE, RoundingMode::HalfUp)
}

// SQLite stores out-of-range values as REAL, so they must not reach a bind.
fn check_precision(value: &BigDecimal) -> Result<(), String> {
    if normalize_scale(value).digits() > DECIMAL_PRECISION {
        return Err(format!(
            "more than {} integer digits",
            DECIMAL_PRECISION - DECIMAL_SCALE as u64
        ));
    }
    Ok(())
}

/// Parse user-entered text as a fixed-point decimal with two fractional digits.
///
/// Values that would lose precision at that scale are rejected rather than
/// rounded, since the user typed something the column cannot hold.
pub fn parse_decimal(input: &str) -> Result<BigDecimal, DbError> {
    let invalid = |reason: String| DbError::Binding {
        field: "decimal number",
        value: input.to_string(),
        reason,
    };

    let decimal = BigDecimal::from_str(input.trim()).map_err(|e| invalid(e.to_string()))?;
    let scaled = decimal.with_scale(DECIMAL_SCALE);
    if scaled != decimal {
        return Err(invalid(format!(
            "more than {DECIMAL_SCALE} fractional digits"
        )));
    }
    check_precision(&scaled).map_err(invalid)?;
    Ok(scaled)
}

/// Parse user-entered text as an integer of the caller's width.
pub fn parse_integer<T>(input: &str) -> Result<T, DbError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    input.trim().parse::<T>().map_err(|e| DbError::Binding {
        field: "number",
        value: input.to_string(),
        reason: e.to_string(),
    })
}
