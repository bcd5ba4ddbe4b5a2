use derive_getters::Getters;
use derive_new::new;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Clone, Debug, Getters, new, PartialEq, Serialize)]
pub struct Deficit {
    subject_id: String,
    amount: Decimal,
}

/// An asset that sits below its target, with what the allocator needs to
/// size a purchase. `local_value` is the current value in local currency.
#[derive(Clone, Debug, Getters, new, PartialEq, Serialize)]
pub struct AssetDeficit {
    ticker: String,
    current_quantity: Option<Decimal>,
    local_value: Decimal,
    quoted_price: Option<Decimal>,
    deficit: Decimal,
}

impl AssetDeficit {
    pub fn to_deficit(&self) -> Deficit {
        Deficit::new(self.ticker.clone(), self.deficit)
    }
}
