use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// A macro asset class with a target share of the whole portfolio.
///
/// `current_value` is always expressed in local currency, whatever the
/// category's own currency domain is.
#[derive(Clone, Debug, Deserialize, Getters, new, PartialEq, Serialize)]
pub struct Category {
    id: String,
    name: String,
    target_weight: Decimal,
    current_value: Decimal,
    currency_domain: CurrencyDomain,
    unit_policy: UnitPolicy,
}

impl Category {
    pub fn is_foreign(&self) -> bool {
        self.currency_domain == CurrencyDomain::Foreign
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum CurrencyDomain {
    Local,
    Foreign,
}

/// How an amount of money turns into something that can be bought.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumString, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitPolicy {
    /// Any amount of money can be invested (fixed income).
    Continuous,
    /// Whole shares only, priced in local currency.
    DiscreteLocal,
    /// Fractional units priced in foreign currency, gated by a minimum ticket.
    DiscreteForeign,
}
