use rust_decimal::Decimal;

use crate::models::CurrencyDomain;

use super::EngineError;

/// Converts between local and foreign currency with a single rate, given as
/// local units per one foreign unit. The rate is fixed for a whole run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurrencyConverter {
    rate: Decimal,
}

impl CurrencyConverter {
    pub fn new(rate: Decimal) -> Result<Self, EngineError> {
        if rate <= Decimal::ZERO {
            return Err(EngineError::InconsistentRates(rate));
        }
        Ok(Self { rate })
    }

    /// A 1:1 converter, only valid for categories that never leave local currency.
    pub fn parity() -> Self {
        Self { rate: Decimal::ONE }
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn to_local(&self, foreign_amount: Decimal) -> Decimal {
        foreign_amount * self.rate
    }

    pub fn to_foreign(&self, local_amount: Decimal) -> Option<Decimal> {
        local_amount.checked_div(self.rate)
    }

    /// Expresses an amount held in `domain` in local currency.
    pub fn local_value(&self, domain: CurrencyDomain, amount: Decimal) -> Decimal {
        match domain {
            CurrencyDomain::Local => amount,
            CurrencyDomain::Foreign => self.to_local(amount),
        }
    }
}
