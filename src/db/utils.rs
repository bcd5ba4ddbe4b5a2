use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::{
    Decimal,
    prelude::{FromPrimitive, ToPrimitive},
};
use sqlx::{Row, sqlite::SqliteRow};

/// Decimal places kept when a value goes into a REAL column. Crypto
/// quantities need more than the usual four.
const STORED_DP: u32 = 8;

pub fn to_real(value: Decimal) -> Option<f64> {
    value.round_dp(STORED_DP).to_f64()
}

pub fn to_optional_real(value: Option<Decimal>) -> Option<f64> {
    value.and_then(to_real)
}

pub fn parse_string_from_row(row: &SqliteRow, column: &str) -> Result<String> {
    row.try_get::<String, _>(column)
        .with_context(|| format!("Failed to parse String from column '{}'", column))
}

pub fn parse_f64_from_row(row: &SqliteRow, column: &str) -> Result<f64> {
    let value: f64 = row
        .try_get(column)
        .with_context(|| format!("Failed to parse f64 from column '{}'", column))?;
    Ok(value)
}

pub fn parse_decimal_from_row(row: &SqliteRow, column: &str) -> Result<Decimal> {
    let value = parse_f64_from_row(row, column)?;
    Decimal::from_f64(value)
        .with_context(|| format!("Failed to convert f64 to Decimal for column '{}'", column))
}

pub fn parse_optional_decimal_from_row(row: &SqliteRow, column: &str) -> Result<Option<Decimal>> {
    let value: Option<f64> = row
        .try_get(column)
        .with_context(|| format!("Failed to parse optional f64 from column '{}'", column))?;
    value
        .map(|v| {
            Decimal::from_f64(v).with_context(|| {
                format!("Failed to convert f64 to Decimal for column '{}'", column)
            })
        })
        .transpose()
}

/// Reads a text column into any enum that parses from its stored name.
pub fn parse_enum_from_row<T>(row: &SqliteRow, column: &str) -> Result<T>
where
    T: FromStr,
{
    let value = parse_string_from_row(row, column)?;
    T::from_str(&value)
        .map_err(|_| anyhow::anyhow!("Unknown value '{}' in column '{}'", value, column))
}
