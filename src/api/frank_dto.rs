use std::collections::BTreeMap;

use chrono::NaiveDate;
use derive_getters::Getters;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Body of Frankfurter's `latest` endpoint. Rates are quoted for `amount`
/// units of `base`, not always for one.
#[derive(Debug, Deserialize, Getters)]
pub struct ExchangeQuoteDto {
    amount: Decimal,
    base: String,
    date: NaiveDate,
    rates: BTreeMap<String, Decimal>,
}
