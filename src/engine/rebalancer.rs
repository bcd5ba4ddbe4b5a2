use derive_getters::Getters;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, info, warn};

use crate::models::{
    AllocationPlan, Asset, Category, Deficit, PlanNotice, PortfolioSnapshot, PurchaseInstruction,
    UnitPolicy,
};

use super::{
    AllocationOutcome, CurrencyConverter, EngineError, PurchaseAllocator, category_deficits,
    normalize_contribution, scan_asset_deficits,
};

pub const DEFAULT_MIN_FOREIGN_TICKET: Decimal = dec!(15);

#[derive(Clone, Debug, Getters, PartialEq)]
pub struct EngineConfig {
    /// Smallest foreign-currency order the engine will instruct. Amounts at
    /// or below it are dropped.
    min_foreign_ticket: Decimal,
    /// Plan local categories even when the exchange rate is unusable.
    continue_on_rate_error: bool,
}

impl EngineConfig {
    pub fn new(min_foreign_ticket: Decimal, continue_on_rate_error: bool) -> Self {
        Self {
            min_foreign_ticket,
            continue_on_rate_error,
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_FOREIGN_TICKET, false)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Rebalancer {
    config: EngineConfig,
}

impl Rebalancer {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Computes how to spend `contribution` across the snapshot.
    ///
    /// Fails only for a non-positive contribution, or a non-positive rate
    /// when `continue_on_rate_error` is off. Everything else that prevents a
    /// purchase is reported as a notice on the plan.
    pub fn plan(
        &self,
        snapshot: &PortfolioSnapshot,
        contribution: Decimal,
        exchange_rate: Decimal,
    ) -> Result<AllocationPlan, EngineError> {
        if contribution <= Decimal::ZERO {
            return Err(EngineError::InvalidContribution(contribution));
        }

        let converter = match CurrencyConverter::new(exchange_rate) {
            Ok(converter) => Some(converter),
            Err(err) if self.config.continue_on_rate_error => {
                warn!("{}; planning local categories only", err);
                None
            }
            Err(err) => return Err(err),
        };

        let mut plan = AllocationPlan::new(contribution, exchange_rate);
        let categories = snapshot.categories();

        let deficits = category_deficits(categories, contribution);
        debug!(?deficits, "category deficits");

        let candidates: Vec<Deficit> = categories
            .iter()
            .zip(deficits)
            .filter(|(category, _)| {
                if converter.is_none() && needs_exchange_rate(category) {
                    plan.add_notice(PlanNotice::ForeignCategorySkipped {
                        category_id: category.id().clone(),
                    });
                    return false;
                }
                true
            })
            .map(|(_, deficit)| deficit)
            .collect();

        let allocations = normalize_contribution(&candidates, contribution);
        if allocations.is_empty() {
            info!("portfolio is at or above target in every category");
            plan.add_notice(PlanNotice::NoDeficit {
                scope: "portfolio".to_string(),
            });
            return Ok(plan);
        }

        let converter = converter.unwrap_or_else(CurrencyConverter::parity);

        for allocation in allocations {
            let Some(category) = snapshot.category(allocation.subject_id()) else {
                continue;
            };
            let amount = *allocation.amount();
            plan.set_category_allocation(category.id(), amount);

            let instructions = self.plan_category(
                category,
                snapshot.assets_for(category.id()),
                amount,
                &converter,
                &mut plan,
            );
            plan.set_purchases(category.id(), instructions);
        }

        info!(
            contribution = %contribution,
            categories = plan.category_allocations().len(),
            instructions = plan.instruction_count(),
            "allocation plan ready"
        );

        Ok(plan)
    }

    fn plan_category(
        &self,
        category: &Category,
        assets: &[Asset],
        allocated: Decimal,
        converter: &CurrencyConverter,
        plan: &mut AllocationPlan,
    ) -> Vec<PurchaseInstruction> {
        let asset_deficits = scan_asset_deficits(category, assets, allocated, converter);
        let deficits: Vec<Deficit> = asset_deficits.iter().map(|a| a.to_deficit()).collect();
        let shares = normalize_contribution(&deficits, allocated);

        if shares.is_empty() {
            plan.add_notice(PlanNotice::NoDeficit {
                scope: category.id().clone(),
            });
            return Vec::new();
        }

        let allocator = PurchaseAllocator::new(
            *category.unit_policy(),
            converter,
            self.config.min_foreign_ticket,
        );

        let mut instructions = Vec::new();
        // Every scanned deficit is positive, so shares line up with it by position.
        for (asset, share) in asset_deficits.iter().zip(shares) {
            match allocator.allocate(asset, *share.amount()) {
                AllocationOutcome::Purchase(instruction) => instructions.push(instruction),
                AllocationOutcome::Skipped(notice) => {
                    debug!(category = %category.id(), %notice, "no purchase");
                    plan.add_notice(notice);
                }
                AllocationOutcome::Empty => {}
            }
        }

        instructions
    }
}

fn needs_exchange_rate(category: &Category) -> bool {
    category.is_foreign() || *category.unit_policy() == UnitPolicy::DiscreteForeign
}
