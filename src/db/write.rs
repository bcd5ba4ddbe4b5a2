use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::Sqlite;

use crate::models::{Asset, Category, PurchaseInstruction};

use super::utils::{to_optional_real, to_real};

pub async fn upsert_category(
    category: &Category,
    position: i64,
    tx: &mut sqlx::Transaction<'_, Sqlite>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO categories
        (id, name, target_weight, currency_domain, unit_policy, position)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            target_weight = excluded.target_weight,
            currency_domain = excluded.currency_domain,
            unit_policy = excluded.unit_policy,
            position = excluded.position
        "#,
    )
    .bind(category.id())
    .bind(category.name())
    .bind(to_real(*category.target_weight()))
    .bind(category.currency_domain().to_string())
    .bind(category.unit_policy().to_string())
    .bind(position)
    .execute(&mut **tx)
    .await
    .with_context(|| format!("Failed to save category '{}'", category.id()))?;

    Ok(())
}

pub async fn upsert_asset(
    asset: &Asset,
    position: i64,
    tx: &mut sqlx::Transaction<'_, Sqlite>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO assets
        (category_id, ticker, current_quantity, current_value, quoted_price, target_weight, position, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(category_id, ticker) DO UPDATE SET
            current_quantity = excluded.current_quantity,
            current_value = excluded.current_value,
            quoted_price = excluded.quoted_price,
            target_weight = excluded.target_weight,
            position = excluded.position,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(asset.category_id())
    .bind(asset.ticker())
    .bind(to_optional_real(*asset.current_quantity()))
    .bind(to_real(*asset.current_value()))
    .bind(to_optional_real(*asset.quoted_price()))
    .bind(to_real(*asset.target_weight()))
    .bind(position)
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .with_context(|| format!("Failed to save asset '{}'", asset.ticker()))?;

    Ok(())
}

pub async fn set_run_input(
    key: &str,
    value: Option<Decimal>,
    tx: &mut sqlx::Transaction<'_, Sqlite>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO run_inputs (key, value, updated_at)
        VALUES (?, ?, ?)
        ON CONFLICT(key) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(to_optional_real(value))
    .bind(Utc::now())
    .execute(&mut **tx)
    .await
    .with_context(|| format!("Failed to store run input '{}'", key))?;

    Ok(())
}

pub async fn insert_category_allocations(
    allocations: &BTreeMap<String, Decimal>,
    tx: &mut sqlx::Transaction<'_, Sqlite>,
) -> Result<()> {
    let calculated_at = Utc::now();

    for (category_id, amount) in allocations {
        sqlx::query(
            r#"
            INSERT OR REPLACE INTO category_allocations
            (category_id, allocated_amount, calculated_at)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(category_id)
        .bind(to_real(*amount))
        .bind(calculated_at)
        .execute(&mut **tx)
        .await
        .with_context(|| format!("Failed to store allocation for '{}'", category_id))?;
    }

    Ok(())
}

pub async fn insert_purchase_instructions(
    purchases: &BTreeMap<String, Vec<PurchaseInstruction>>,
    tx: &mut sqlx::Transaction<'_, Sqlite>,
) -> Result<()> {
    let calculated_at = Utc::now();

    for (category_id, instructions) in purchases {
        for (position, instruction) in instructions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT OR REPLACE INTO purchase_instructions
                (category_id, ticker, position, quantity, allocated_amount,
                 allocated_currency, resulting_total, calculated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(category_id)
            .bind(instruction.ticker())
            .bind(position as i64)
            .bind(to_optional_real(*instruction.quantity()))
            .bind(to_real(*instruction.allocated_amount()))
            .bind(instruction.allocated_currency().to_string())
            .bind(to_real(*instruction.resulting_total()))
            .bind(calculated_at)
            .execute(&mut **tx)
            .await
            .with_context(|| {
                format!(
                    "Failed to store purchase of '{}' in '{}'",
                    instruction.ticker(),
                    category_id
                )
            })?;
        }
    }

    Ok(())
}

pub async fn clear_allocation_state(tx: &mut sqlx::Transaction<'_, Sqlite>) -> Result<()> {
    sqlx::query("DELETE FROM purchase_instructions")
        .execute(&mut **tx)
        .await?;
    sqlx::query("DELETE FROM category_allocations")
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Folds every stored instruction into its holding.
///
/// Continuous holdings grow by the allocated amount. Discrete holdings grow
/// by the purchased quantity and are revalued at their quoted price.
pub async fn apply_purchases_to_holdings(tx: &mut sqlx::Transaction<'_, Sqlite>) -> Result<u64> {
    let now = Utc::now();

    let continuous = sqlx::query(
        r#"
        UPDATE assets
        SET current_value = current_value + (
                SELECT p.allocated_amount FROM purchase_instructions p
                WHERE p.category_id = assets.category_id AND p.ticker = assets.ticker
            ),
            updated_at = ?
        WHERE EXISTS (
            SELECT 1 FROM purchase_instructions p
            WHERE p.category_id = assets.category_id
              AND p.ticker = assets.ticker
              AND p.quantity IS NULL
              AND p.allocated_amount > 0
        )
        "#,
    )
    .bind(now)
    .execute(&mut **tx)
    .await
    .with_context(|| "Failed to apply continuous purchases")?
    .rows_affected();

    let discrete = sqlx::query(
        r#"
        UPDATE assets
        SET current_quantity = COALESCE(current_quantity, 0) + (
                SELECT p.quantity FROM purchase_instructions p
                WHERE p.category_id = assets.category_id AND p.ticker = assets.ticker
            ),
            current_value = CASE
                WHEN quoted_price IS NULL THEN current_value
                ELSE (COALESCE(current_quantity, 0) + (
                    SELECT p.quantity FROM purchase_instructions p
                    WHERE p.category_id = assets.category_id AND p.ticker = assets.ticker
                )) * quoted_price
            END,
            updated_at = ?
        WHERE EXISTS (
            SELECT 1 FROM purchase_instructions p
            WHERE p.category_id = assets.category_id
              AND p.ticker = assets.ticker
              AND p.quantity > 0
        )
        "#,
    )
    .bind(now)
    .execute(&mut **tx)
    .await
    .with_context(|| "Failed to apply discrete purchases")?
    .rows_affected();

    Ok(continuous + discrete)
}
