use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::Deficit;

/// A subject's share of a contribution.
#[derive(Clone, Debug, Getters, new, PartialEq, Serialize)]
pub struct Allocation {
    subject_id: String,
    amount: Decimal,
}

/// Splits `amount` across subjects in proportion to their positive deficits.
///
/// Non-positive deficits are clamped to zero and left out of the result, so
/// the output keeps input order but only lists subjects that receive money.
/// An empty result means nothing was below target.
pub fn normalize_contribution(deficits: &[Deficit], amount: Decimal) -> Vec<Allocation> {
    let total: Decimal = deficits
        .iter()
        .map(|d| (*d.amount()).max(Decimal::ZERO))
        .sum();

    if total <= Decimal::ZERO {
        return Vec::new();
    }

    deficits
        .iter()
        .filter(|d| *d.amount() > Decimal::ZERO)
        .filter_map(|d| {
            let share = d.amount().checked_div(total)?;
            Some(Allocation::new(d.subject_id().clone(), share * amount))
        })
        .collect()
}
