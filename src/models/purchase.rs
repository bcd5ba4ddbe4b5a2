use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::CurrencyDomain;

/// What to buy of one asset in this run.
///
/// `quantity` is `None` for continuous instruments, where the amount is the
/// purchase. `resulting_total` is the holding after the purchase: a quantity
/// for discrete instruments, a value for continuous ones.
#[derive(Clone, Debug, Deserialize, Getters, new, PartialEq, Serialize)]
pub struct PurchaseInstruction {
    ticker: String,
    quantity: Option<Decimal>,
    allocated_amount: Decimal,
    allocated_currency: CurrencyDomain,
    resulting_total: Decimal,
}
