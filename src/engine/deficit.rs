use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{Asset, AssetDeficit, Category, Deficit};

use super::CurrencyConverter;

/// How far each category sits below its target weight once `contribution`
/// has been added to the whole portfolio.
///
/// The future total is portfolio-wide, so the deficits depend on each other.
/// Values may be negative for categories above target.
pub fn category_deficits(categories: &[Category], contribution: Decimal) -> Vec<Deficit> {
    let current_total: Decimal = categories.iter().map(|c| *c.current_value()).sum();
    let future_total = current_total + contribution;

    categories
        .iter()
        .map(|category| {
            let amount = match category.current_value().checked_div(future_total) {
                Some(current_weight) => *category.target_weight() - current_weight,
                None => Decimal::ZERO,
            };
            Deficit::new(category.id().clone(), amount)
        })
        .collect()
}

/// Lists the assets of `category` that would still be below target after the
/// category receives `allocated`.
///
/// Assets without a target weight are not candidates. Assets at or above
/// target are left out entirely.
pub fn scan_asset_deficits(
    category: &Category,
    assets: &[Asset],
    allocated: Decimal,
    converter: &CurrencyConverter,
) -> Vec<AssetDeficit> {
    let domain = *category.currency_domain();
    let local_total: Decimal = assets
        .iter()
        .map(|a| converter.local_value(domain, *a.current_value()))
        .sum();
    let future_total = local_total + allocated;

    let deficits: Vec<AssetDeficit> = assets
        .iter()
        .filter(|a| *a.target_weight() > Decimal::ZERO)
        .filter_map(|asset| {
            let local_value = converter.local_value(domain, *asset.current_value());
            let ideal_value = future_total * *asset.target_weight();
            let deficit = ideal_value - local_value;

            (deficit > Decimal::ZERO).then(|| {
                AssetDeficit::new(
                    asset.ticker().clone(),
                    *asset.current_quantity(),
                    local_value,
                    *asset.quoted_price(),
                    deficit,
                )
            })
        })
        .collect();

    debug!(
        category = %category.id(),
        future_total = %future_total,
        candidates = deficits.len(),
        "scanned asset deficits"
    );

    deficits
}
