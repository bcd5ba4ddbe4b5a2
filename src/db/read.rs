use std::collections::BTreeMap;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use sqlx::{Pool, Sqlite};
use tracing::warn;

use crate::models::{Asset, Category, CurrencyDomain, PurchaseInstruction};

use super::utils::{
    parse_decimal_from_row, parse_enum_from_row, parse_optional_decimal_from_row,
    parse_string_from_row,
};

pub const CONTRIBUTION_KEY: &str = "contribution";
pub const EXCHANGE_RATE_KEY: &str = "exchange_rate";

/// Loads the category set in configured order. Each category is valued at
/// the sum of its holdings; foreign holdings are converted with
/// `exchange_rate` and valued at zero when the rate is unusable.
pub async fn fetch_categories(
    connection: &Pool<Sqlite>,
    exchange_rate: Decimal,
) -> Result<Vec<Category>> {
    let rows = sqlx::query(
        r#"
        SELECT
            c.id,
            c.name,
            c.target_weight,
            c.currency_domain,
            c.unit_policy,
            COALESCE(SUM(a.current_value), 0.0) AS holdings_value
        FROM categories c
        LEFT JOIN assets a ON a.category_id = c.id
        GROUP BY c.id
        ORDER BY c.position
        "#,
    )
    .fetch_all(connection)
    .await
    .with_context(|| "Failed to load categories")?;

    let mut categories = Vec::with_capacity(rows.len());

    for row in rows {
        let id = parse_string_from_row(&row, "id")?;
        let currency_domain: CurrencyDomain = parse_enum_from_row(&row, "currency_domain")?;
        let holdings_value = parse_decimal_from_row(&row, "holdings_value")?;

        let current_value = match currency_domain {
            CurrencyDomain::Local => holdings_value,
            CurrencyDomain::Foreign if exchange_rate > Decimal::ZERO => {
                holdings_value * exchange_rate
            }
            CurrencyDomain::Foreign => {
                warn!(
                    "Exchange rate {} is unusable, valuing category '{}' at zero",
                    exchange_rate, id
                );
                Decimal::ZERO
            }
        };

        categories.push(Category::new(
            id,
            parse_string_from_row(&row, "name")?,
            parse_decimal_from_row(&row, "target_weight")?,
            current_value,
            currency_domain,
            parse_enum_from_row(&row, "unit_policy")?,
        ));
    }

    Ok(categories)
}

pub async fn fetch_assets(connection: &Pool<Sqlite>) -> Result<Vec<Asset>> {
    let rows = sqlx::query(
        r#"
        SELECT a.category_id, a.ticker, a.current_quantity, a.current_value,
               a.quoted_price, a.target_weight
        FROM assets a
        JOIN categories c ON c.id = a.category_id
        ORDER BY c.position, a.position
        "#,
    )
    .fetch_all(connection)
    .await
    .with_context(|| "Failed to load assets")?;

    rows.iter()
        .map(|row| {
            Ok(Asset::new(
                parse_string_from_row(row, "ticker")?,
                parse_string_from_row(row, "category_id")?,
                parse_optional_decimal_from_row(row, "current_quantity")?,
                parse_decimal_from_row(row, "current_value")?,
                parse_optional_decimal_from_row(row, "quoted_price")?,
                parse_decimal_from_row(row, "target_weight")?,
            ))
        })
        .collect()
}

pub async fn fetch_run_input(connection: &Pool<Sqlite>, key: &str) -> Result<Option<Decimal>> {
    let row = sqlx::query("SELECT value FROM run_inputs WHERE key = ?")
        .bind(key)
        .fetch_optional(connection)
        .await
        .with_context(|| format!("Failed to read run input '{}'", key))?;

    match row {
        Some(row) => parse_optional_decimal_from_row(&row, "value"),
        None => Ok(None),
    }
}

pub async fn fetch_category_allocations(
    connection: &Pool<Sqlite>,
) -> Result<BTreeMap<String, Decimal>> {
    let rows = sqlx::query("SELECT category_id, allocated_amount FROM category_allocations")
        .fetch_all(connection)
        .await
        .with_context(|| "Failed to load category allocations")?;

    rows.iter()
        .map(|row| {
            Ok((
                parse_string_from_row(row, "category_id")?,
                parse_decimal_from_row(row, "allocated_amount")?,
            ))
        })
        .collect()
}

pub async fn fetch_purchase_instructions(
    connection: &Pool<Sqlite>,
) -> Result<BTreeMap<String, Vec<PurchaseInstruction>>> {
    let rows = sqlx::query(
        r#"
        SELECT category_id, ticker, quantity, allocated_amount, allocated_currency, resulting_total
        FROM purchase_instructions
        ORDER BY category_id, position
        "#,
    )
    .fetch_all(connection)
    .await
    .with_context(|| "Failed to load purchase instructions")?;

    let mut purchases: BTreeMap<String, Vec<PurchaseInstruction>> = BTreeMap::new();

    for row in rows {
        let category_id = parse_string_from_row(&row, "category_id")?;
        let instruction = PurchaseInstruction::new(
            parse_string_from_row(&row, "ticker")?,
            parse_optional_decimal_from_row(&row, "quantity")?,
            parse_decimal_from_row(&row, "allocated_amount")?,
            parse_enum_from_row(&row, "allocated_currency")?,
            parse_decimal_from_row(&row, "resulting_total")?,
        );
        purchases.entry(category_id).or_default().push(instruction);
    }

    Ok(purchases)
}
