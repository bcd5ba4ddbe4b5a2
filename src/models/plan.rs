use std::{collections::BTreeMap, fmt};

use derive_getters::Getters;
use rust_decimal::Decimal;
use serde::Serialize;

use super::PurchaseInstruction;

/// Result of one calculation run.
#[derive(Clone, Debug, Getters, PartialEq, Serialize)]
pub struct AllocationPlan {
    contribution: Decimal,
    exchange_rate: Decimal,
    category_allocations: BTreeMap<String, Decimal>,
    purchases: BTreeMap<String, Vec<PurchaseInstruction>>,
    notices: Vec<PlanNotice>,
}

impl AllocationPlan {
    pub fn new(contribution: Decimal, exchange_rate: Decimal) -> Self {
        Self {
            contribution,
            exchange_rate,
            category_allocations: BTreeMap::new(),
            purchases: BTreeMap::new(),
            notices: Vec::new(),
        }
    }

    pub fn set_category_allocation(&mut self, category_id: &str, amount: Decimal) {
        self.category_allocations
            .insert(category_id.to_string(), amount);
    }

    pub fn set_purchases(&mut self, category_id: &str, instructions: Vec<PurchaseInstruction>) {
        if !instructions.is_empty() {
            self.purchases.insert(category_id.to_string(), instructions);
        }
    }

    pub fn add_notice(&mut self, notice: PlanNotice) {
        self.notices.push(notice);
    }

    pub fn purchases_for(&self, category_id: &str) -> &[PurchaseInstruction] {
        self.purchases
            .get(category_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn instruction_count(&self) -> usize {
        self.purchases.values().map(Vec::len).sum()
    }

    pub fn total_allocated(&self) -> Decimal {
        self.category_allocations.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.category_allocations.is_empty() && self.purchases.is_empty()
    }
}

/// Why a subject ended up without an instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanNotice {
    /// Nothing in the scope sits below its target.
    NoDeficit { scope: String },
    /// A discrete asset has a deficit but no usable price.
    MissingPrice { ticker: String },
    /// Foreign amount did not exceed the minimum ticket.
    BelowMinimumTicket {
        ticker: String,
        foreign_amount: Decimal,
    },
    /// Local amount could not buy a single share.
    BelowOneShare { ticker: String, allocated: Decimal },
    /// The exchange rate was unusable and the run continued without this category.
    ForeignCategorySkipped { category_id: String },
}

impl fmt::Display for PlanNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanNotice::NoDeficit { scope } => {
                write!(f, "{}: already at or above target", scope)
            }
            PlanNotice::MissingPrice { ticker } => {
                write!(f, "{}: no quoted price, skipped", ticker)
            }
            PlanNotice::BelowMinimumTicket {
                ticker,
                foreign_amount,
            } => write!(
                f,
                "{}: {:.2} is below the minimum foreign ticket",
                ticker, foreign_amount
            ),
            PlanNotice::BelowOneShare { ticker, allocated } => {
                write!(f, "{}: {:.2} does not buy one share", ticker, allocated)
            }
            PlanNotice::ForeignCategorySkipped { category_id } => {
                write!(f, "{}: skipped, exchange rate unusable", category_id)
            }
        }
    }
}
