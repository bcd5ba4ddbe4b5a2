use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("contribution must be positive, got {0}")]
    InvalidContribution(Decimal),

    #[error("exchange rate must be positive, got {0}")]
    InconsistentRates(Decimal),
}
