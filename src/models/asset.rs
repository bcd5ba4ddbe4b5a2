use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single holding inside a category.
///
/// `current_value` and `quoted_price` are in the currency of the owning
/// category. `current_quantity` is absent for continuous instruments.
#[derive(Clone, Debug, Deserialize, Getters, new, PartialEq, Serialize)]
pub struct Asset {
    ticker: String,
    category_id: String,
    current_quantity: Option<Decimal>,
    current_value: Decimal,
    quoted_price: Option<Decimal>,
    target_weight: Decimal,
}
