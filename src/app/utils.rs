use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

pub fn parse_decimal(field: &str, field_name: &str) -> Result<Decimal> {
    field
        .trim()
        .parse::<Decimal>()
        .with_context(|| format!("Failed to parse {} '{}'", field_name, field))
}

/// Empty fields are `None`.
pub fn parse_optional_decimal(field: &str, field_name: &str) -> Result<Option<Decimal>> {
    if field.trim().is_empty() {
        return Ok(None);
    }
    parse_decimal(field, field_name).map(Some)
}

/// Accepts `0.25`, `25%` and `25 %` alike, always returning a fraction.
pub fn parse_weight(field: &str, field_name: &str) -> Result<Decimal> {
    let trimmed = field.trim();
    match trimmed.strip_suffix('%') {
        Some(percent) => Ok(parse_decimal(percent, field_name)? / Decimal::ONE_HUNDRED),
        None => parse_decimal(trimmed, field_name),
    }
}

pub fn parse_enum<T>(field: &str, field_name: &str) -> Result<T>
where
    T: FromStr,
{
    T::from_str(field.trim())
        .map_err(|_| anyhow::anyhow!("Unknown {} '{}'", field_name, field))
}
