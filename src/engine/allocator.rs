use rust_decimal::Decimal;

use crate::models::{AssetDeficit, CurrencyDomain, PlanNotice, PurchaseInstruction, UnitPolicy};

use super::CurrencyConverter;

#[derive(Clone, Debug, PartialEq)]
pub enum AllocationOutcome {
    Purchase(PurchaseInstruction),
    Skipped(PlanNotice),
    /// Nothing to buy and nothing worth reporting (zero amount, zero division).
    Empty,
}

/// Turns an asset's share of its category allocation into a purchase under
/// the category's unit policy.
#[derive(Clone, Copy, Debug)]
pub struct PurchaseAllocator<'a> {
    policy: UnitPolicy,
    converter: &'a CurrencyConverter,
    min_foreign_ticket: Decimal,
}

impl<'a> PurchaseAllocator<'a> {
    pub fn new(
        policy: UnitPolicy,
        converter: &'a CurrencyConverter,
        min_foreign_ticket: Decimal,
    ) -> Self {
        Self {
            policy,
            converter,
            min_foreign_ticket,
        }
    }

    /// `amount` is in local currency.
    pub fn allocate(&self, asset: &AssetDeficit, amount: Decimal) -> AllocationOutcome {
        if amount <= Decimal::ZERO {
            return AllocationOutcome::Empty;
        }

        match self.policy {
            UnitPolicy::Continuous => self.continuous(asset, amount),
            UnitPolicy::DiscreteLocal => self.discrete_local(asset, amount),
            UnitPolicy::DiscreteForeign => self.discrete_foreign(asset, amount),
        }
    }

    fn continuous(&self, asset: &AssetDeficit, amount: Decimal) -> AllocationOutcome {
        AllocationOutcome::Purchase(PurchaseInstruction::new(
            asset.ticker().clone(),
            None,
            amount,
            CurrencyDomain::Local,
            *asset.local_value() + amount,
        ))
    }

    fn discrete_local(&self, asset: &AssetDeficit, amount: Decimal) -> AllocationOutcome {
        let Some(price) = usable_price(asset) else {
            return missing_price(asset);
        };
        let Some(units) = amount.checked_div(price) else {
            return AllocationOutcome::Empty;
        };

        // Whole shares only; the leftover below one share is dropped.
        let quantity = units.floor();
        if quantity < Decimal::ONE {
            return AllocationOutcome::Skipped(PlanNotice::BelowOneShare {
                ticker: asset.ticker().clone(),
                allocated: amount,
            });
        }

        AllocationOutcome::Purchase(PurchaseInstruction::new(
            asset.ticker().clone(),
            Some(quantity),
            quantity * price,
            CurrencyDomain::Local,
            current_quantity(asset) + quantity,
        ))
    }

    fn discrete_foreign(&self, asset: &AssetDeficit, amount: Decimal) -> AllocationOutcome {
        let Some(price) = usable_price(asset) else {
            return missing_price(asset);
        };
        let Some(foreign_amount) = self.converter.to_foreign(amount) else {
            return AllocationOutcome::Empty;
        };

        if foreign_amount <= self.min_foreign_ticket {
            return AllocationOutcome::Skipped(PlanNotice::BelowMinimumTicket {
                ticker: asset.ticker().clone(),
                foreign_amount,
            });
        }

        // Fractional units are allowed here, no truncation.
        let Some(quantity) = foreign_amount.checked_div(price) else {
            return AllocationOutcome::Empty;
        };

        AllocationOutcome::Purchase(PurchaseInstruction::new(
            asset.ticker().clone(),
            Some(quantity),
            foreign_amount,
            CurrencyDomain::Foreign,
            current_quantity(asset) + quantity,
        ))
    }
}

fn usable_price(asset: &AssetDeficit) -> Option<Decimal> {
    asset.quoted_price().filter(|price| *price > Decimal::ZERO)
}

fn current_quantity(asset: &AssetDeficit) -> Decimal {
    asset.current_quantity().unwrap_or(Decimal::ZERO)
}

fn missing_price(asset: &AssetDeficit) -> AllocationOutcome {
    AllocationOutcome::Skipped(PlanNotice::MissingPrice {
        ticker: asset.ticker().clone(),
    })
}
