use std::collections::HashMap;

use anyhow::{Context, Error, Result};
use csv::Reader;
use derive_getters::Getters;
use rust_decimal::Decimal;
use tracing::warn;

use crate::{
    db::SqliteStore,
    models::{Asset, Category, CurrencyDomain, UnitPolicy},
};

use super::utils::{parse_enum, parse_optional_decimal, parse_weight};

const CATEGORY_COLUMNS: usize = 5;
const ASSET_COLUMNS: usize = 6;

#[derive(Clone, Debug, Getters)]
pub struct ImportSummary {
    categories: usize,
    assets: usize,
}

/// Reads `id,name,target_weight,currency_domain,unit_policy` rows.
pub fn read_categories(path: &str) -> Result<Vec<Category>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file at path: {}", path))?;
    let mut categories: Vec<Category> = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let rec =
            record.with_context(|| format!("Failed to read CSV record at row {}", row_idx + 1))?;

        if rec.len() < CATEGORY_COLUMNS {
            return Err(Error::msg(format!(
                "Invalid category CSV at row {}: expected {} columns, found {}",
                row_idx + 1,
                CATEGORY_COLUMNS,
                rec.len()
            )));
        }

        let id = rec[0].trim().to_string();
        if id.is_empty() {
            return Err(Error::msg(format!("Empty category id at row {}", row_idx + 1)));
        }
        if categories.iter().any(|c| *c.id() == id) {
            return Err(Error::msg(format!(
                "Duplicate category '{}' at row {}",
                id,
                row_idx + 1
            )));
        }

        let target_weight = parse_weight(&rec[2], "target weight")
            .with_context(|| format!("Category row {}", row_idx + 1))?;
        let currency_domain: CurrencyDomain = parse_enum(&rec[3], "currency domain")
            .with_context(|| format!("Category row {}", row_idx + 1))?;
        let unit_policy: UnitPolicy = parse_enum(&rec[4], "unit policy")
            .with_context(|| format!("Category row {}", row_idx + 1))?;

        categories.push(Category::new(
            id,
            rec[1].trim().to_string(),
            target_weight,
            Decimal::ZERO,
            currency_domain,
            unit_policy,
        ));
    }

    let total_weight: Decimal = categories.iter().map(|c| *c.target_weight()).sum();
    if total_weight > Decimal::ONE {
        warn!(
            "Category target weights add up to {}, more than 100%",
            total_weight
        );
    }

    Ok(categories)
}

/// Reads `category_id,ticker,quantity,current_value,quoted_price,target_weight`
/// rows. An empty value on a priced holding is derived from quantity × price.
pub fn read_assets(path: &str, categories: &[Category]) -> Result<Vec<Asset>> {
    let mut reader = Reader::from_path(path)
        .with_context(|| format!("Failed to open CSV file at path: {}", path))?;
    let mut assets: Vec<Asset> = Vec::new();

    for (row_idx, record) in reader.records().enumerate() {
        let rec =
            record.with_context(|| format!("Failed to read CSV record at row {}", row_idx + 1))?;

        if rec.len() < ASSET_COLUMNS {
            return Err(Error::msg(format!(
                "Invalid asset CSV at row {}: expected {} columns, found {}",
                row_idx + 1,
                ASSET_COLUMNS,
                rec.len()
            )));
        }

        let category_id = rec[0].trim().to_string();
        if !categories.iter().any(|c| *c.id() == category_id) {
            return Err(Error::msg(format!(
                "Unknown category '{}' at row {}",
                category_id,
                row_idx + 1
            )));
        }

        let ticker = rec[1].trim().to_string();
        if ticker.is_empty() {
            warn!("Skipping asset without ticker at row {}", row_idx + 1);
            continue;
        }

        if assets
            .iter()
            .any(|a| *a.category_id() == category_id && *a.ticker() == ticker)
        {
            return Err(Error::msg(format!(
                "Duplicate asset '{}' in category '{}' at row {}",
                ticker,
                category_id,
                row_idx + 1
            )));
        }

        let row_context = || format!("Asset '{}' at row {}", ticker, row_idx + 1);
        let quantity = parse_optional_decimal(&rec[2], "quantity").with_context(row_context)?;
        let current_value =
            parse_optional_decimal(&rec[3], "current value").with_context(row_context)?;
        let quoted_price =
            parse_optional_decimal(&rec[4], "quoted price").with_context(row_context)?;
        let target_weight = parse_weight(&rec[5], "target weight").with_context(row_context)?;

        if quantity.is_some_and(|q| q < Decimal::ZERO) {
            return Err(Error::msg(format!("Negative quantity. {}", row_context())));
        }

        let current_value = match (current_value, quantity, quoted_price) {
            (Some(value), _, _) => value,
            (None, Some(quantity), Some(price)) => quantity * price,
            _ => Decimal::ZERO,
        };

        assets.push(Asset::new(
            ticker,
            category_id,
            quantity,
            current_value,
            quoted_price,
            target_weight,
        ));
    }

    let mut weight_by_category: HashMap<&str, Decimal> = HashMap::new();
    for asset in &assets {
        *weight_by_category.entry(asset.category_id().as_str()).or_default() += *asset.target_weight();
    }
    for (category_id, total) in weight_by_category {
        if total > Decimal::ONE {
            warn!(
                "Asset target weights in '{}' add up to {}, more than 100%",
                category_id, total
            );
        }
    }

    Ok(assets)
}

pub async fn import_portfolio(
    store: &SqliteStore,
    categories_path: &str,
    assets_path: &str,
) -> Result<ImportSummary> {
    let categories = read_categories(categories_path)?;
    let assets = read_assets(assets_path, &categories)?;

    store.save_portfolio(&categories, &assets).await?;

    Ok(ImportSummary {
        categories: categories.len(),
        assets: assets.len(),
    })
}
