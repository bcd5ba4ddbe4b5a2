use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{
    Pool, Sqlite,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
};
use tracing::{debug, info};

use crate::{
    app::ports::{AllocationSink, HoldingsLedger, PortfolioSource},
    models::{Asset, Category, PortfolioSnapshot, PurchaseInstruction},
};

use super::{init, read, write};

/// SQLite-backed holdings, run inputs and the last computed plan.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    connection: Pool<Sqlite>,
}

impl SqliteStore {
    pub fn new(connection: Pool<Sqlite>) -> Self {
        Self { connection }
    }

    /// Opens (creating if needed) the database file and makes sure the
    /// schema exists.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create database directory {}", parent.display())
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let connection = SqlitePool::connect_with(options)
            .await
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        init::create_schema(&connection).await?;
        debug!("Opened store at {}", path.display());

        Ok(Self::new(connection))
    }

    /// A private in-memory database; one connection so every query sees the
    /// same data.
    pub async fn in_memory() -> Result<Self> {
        let connection = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .with_context(|| "Failed to open in-memory database")?;

        init::create_schema(&connection).await?;

        Ok(Self::new(connection))
    }

    /// Replaces the category set and holdings with the given ones, keeping
    /// their order.
    pub async fn save_portfolio(&self, categories: &[Category], assets: &[Asset]) -> Result<()> {
        let mut tx = self.connection.begin().await?;

        write::clear_allocation_state(&mut tx).await?;
        sqlx::query("DELETE FROM assets").execute(&mut *tx).await?;
        sqlx::query("DELETE FROM categories")
            .execute(&mut *tx)
            .await?;

        for (position, category) in categories.iter().enumerate() {
            write::upsert_category(category, position as i64, &mut tx).await?;
        }
        for (position, asset) in assets.iter().enumerate() {
            write::upsert_asset(asset, position as i64, &mut tx).await?;
        }

        tx.commit().await?;
        info!(
            "Saved {} categories and {} assets",
            categories.len(),
            assets.len()
        );

        Ok(())
    }

    pub async fn set_contribution_amount(&self, amount: Option<Decimal>) -> Result<()> {
        let mut tx = self.connection.begin().await?;
        write::set_run_input(read::CONTRIBUTION_KEY, amount, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn set_exchange_rate(&self, rate: Decimal) -> Result<()> {
        let mut tx = self.connection.begin().await?;
        write::set_run_input(read::EXCHANGE_RATE_KEY, Some(rate), &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        let rate = self.fetch_exchange_rate().await?;
        read::fetch_categories(&self.connection, rate).await
    }

    pub async fn assets(&self) -> Result<Vec<Asset>> {
        read::fetch_assets(&self.connection).await
    }

    pub async fn category_allocations(&self) -> Result<BTreeMap<String, Decimal>> {
        read::fetch_category_allocations(&self.connection).await
    }

    pub async fn purchase_instructions(&self) -> Result<BTreeMap<String, Vec<PurchaseInstruction>>> {
        read::fetch_purchase_instructions(&self.connection).await
    }
}

#[async_trait]
impl PortfolioSource for SqliteStore {
    async fn fetch_portfolio_snapshot(&self) -> Result<PortfolioSnapshot> {
        let categories = self.categories().await?;
        let mut assets_by_category: BTreeMap<String, Vec<Asset>> = BTreeMap::new();

        for asset in self.assets().await? {
            assets_by_category
                .entry(asset.category_id().clone())
                .or_default()
                .push(asset);
        }

        Ok(PortfolioSnapshot::new(categories, assets_by_category))
    }

    async fn fetch_contribution_amount(&self) -> Result<Decimal> {
        Ok(read::fetch_run_input(&self.connection, read::CONTRIBUTION_KEY)
            .await?
            .unwrap_or(Decimal::ZERO))
    }

    async fn fetch_exchange_rate(&self) -> Result<Decimal> {
        Ok(read::fetch_run_input(&self.connection, read::EXCHANGE_RATE_KEY)
            .await?
            .unwrap_or(Decimal::ZERO))
    }
}

#[async_trait]
impl AllocationSink for SqliteStore {
    async fn apply_category_allocations(
        &self,
        allocations: &BTreeMap<String, Decimal>,
    ) -> Result<()> {
        let mut tx = self.connection.begin().await?;
        write::insert_category_allocations(allocations, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn apply_purchase_instructions(
        &self,
        purchases: &BTreeMap<String, Vec<PurchaseInstruction>>,
    ) -> Result<()> {
        let mut tx = self.connection.begin().await?;
        write::insert_purchase_instructions(purchases, &mut tx).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn reset_allocation_state(&self) -> Result<()> {
        let mut tx = self.connection.begin().await?;
        write::clear_allocation_state(&mut tx).await?;
        tx.commit().await?;
        Ok(())
    }
}

#[async_trait]
impl HoldingsLedger for SqliteStore {
    async fn commit_purchases(&self) -> Result<u64> {
        let mut tx = self.connection.begin().await?;

        let updated = write::apply_purchases_to_holdings(&mut tx).await?;
        write::clear_allocation_state(&mut tx).await?;
        write::set_run_input(read::CONTRIBUTION_KEY, None, &mut tx).await?;

        tx.commit().await?;
        info!("Committed purchases into {} holdings", updated);

        Ok(updated)
    }
}
