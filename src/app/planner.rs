use anyhow::{Result, anyhow};
use rust_decimal::Decimal;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::{
    engine::{EngineError, Rebalancer},
    models::AllocationPlan,
};

use super::ports::{AllocationSink, HoldingsLedger, PortfolioSource};

#[derive(Clone, Debug)]
pub enum PlanOutcome {
    /// A plan was computed and written to the sink.
    Planned(AllocationPlan),
    /// The contribution was not positive, so previous results were cleared.
    Reset,
}

/// Runs the engine against a store and writes the result back.
///
/// Only one run at a time: a second call while one is in flight is refused
/// rather than queued.
pub struct Planner<S> {
    store: S,
    rebalancer: Rebalancer,
    in_flight: Mutex<()>,
}

impl<S> Planner<S>
where
    S: PortfolioSource + AllocationSink,
{
    pub fn new(store: S, rebalancer: Rebalancer) -> Self {
        Self {
            store,
            rebalancer,
            in_flight: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Plans the stored contribution, or resets when it is not positive.
    pub async fn estimate(&self) -> Result<PlanOutcome> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| anyhow!("A calculation is already running"))?;

        let contribution = self.store.fetch_contribution_amount().await?;
        if contribution <= Decimal::ZERO {
            info!("Contribution is {}, clearing previous results", contribution);
            self.store.reset_allocation_state().await?;
            return Ok(PlanOutcome::Reset);
        }

        let exchange_rate = self.store.fetch_exchange_rate().await?;
        let snapshot = self.store.fetch_portfolio_snapshot().await?;

        let plan = match self.rebalancer.plan(&snapshot, contribution, exchange_rate) {
            Ok(plan) => plan,
            Err(EngineError::InvalidContribution(amount)) => {
                warn!("Contribution {} refused, clearing previous results", amount);
                self.store.reset_allocation_state().await?;
                return Ok(PlanOutcome::Reset);
            }
            Err(err @ EngineError::InconsistentRates(_)) => {
                // The stored contribution may already be newer than the stored plan.
                self.store.reset_allocation_state().await?;
                return Err(anyhow::Error::new(err).context(
                    "Allocation aborted; set a positive exchange rate with --rate or --fetch-rate",
                ));
            }
        };

        self.store.reset_allocation_state().await?;
        self.store
            .apply_category_allocations(plan.category_allocations())
            .await?;
        self.store
            .apply_purchase_instructions(plan.purchases())
            .await?;

        Ok(PlanOutcome::Planned(plan))
    }

    pub async fn reset(&self) -> Result<()> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| anyhow!("A calculation is already running"))?;

        self.store.reset_allocation_state().await
    }
}

impl<S> Planner<S>
where
    S: PortfolioSource + AllocationSink + HoldingsLedger,
{
    /// Moves the stored purchases into holdings and clears the plan.
    pub async fn commit(&self) -> Result<u64> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| anyhow!("A calculation is already running"))?;

        self.store.commit_purchases().await
    }
}
