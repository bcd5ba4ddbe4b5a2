//! The contract between the allocation engine and whatever holds the
//! portfolio. Any host (the SQLite store, a spreadsheet bridge, a web
//! handler) can sit behind these traits.

use std::collections::BTreeMap;

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::models::{PortfolioSnapshot, PurchaseInstruction};

#[async_trait]
pub trait PortfolioSource: Send + Sync {
    async fn fetch_portfolio_snapshot(&self) -> Result<PortfolioSnapshot>;

    /// Zero when no contribution has been entered.
    async fn fetch_contribution_amount(&self) -> Result<Decimal>;

    /// Zero when no rate has been entered.
    async fn fetch_exchange_rate(&self) -> Result<Decimal>;
}

#[async_trait]
pub trait AllocationSink: Send + Sync {
    async fn apply_category_allocations(
        &self,
        allocations: &BTreeMap<String, Decimal>,
    ) -> Result<()>;

    async fn apply_purchase_instructions(
        &self,
        purchases: &BTreeMap<String, Vec<PurchaseInstruction>>,
    ) -> Result<()>;

    /// Clears every stored allocation and purchase. Safe to call repeatedly.
    async fn reset_allocation_state(&self) -> Result<()>;
}

/// Bookkeeping step that turns the last plan into actual holdings.
#[async_trait]
pub trait HoldingsLedger: Send + Sync {
    /// Returns the number of holdings that changed.
    async fn commit_purchases(&self) -> Result<u64>;
}
