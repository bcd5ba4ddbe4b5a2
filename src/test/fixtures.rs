use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{Asset, Category, CurrencyDomain, PortfolioSnapshot, UnitPolicy};

pub fn category(
    id: &str,
    target_weight: Decimal,
    current_value: Decimal,
    currency_domain: CurrencyDomain,
    unit_policy: UnitPolicy,
) -> Category {
    Category::new(
        id.to_string(),
        id.to_uppercase(),
        target_weight,
        current_value,
        currency_domain,
        unit_policy,
    )
}

pub fn local_category(id: &str, target_weight: Decimal, current_value: Decimal) -> Category {
    category(
        id,
        target_weight,
        current_value,
        CurrencyDomain::Local,
        UnitPolicy::DiscreteLocal,
    )
}

pub fn share(
    ticker: &str,
    category_id: &str,
    quantity: Decimal,
    price: Decimal,
    target_weight: Decimal,
) -> Asset {
    Asset::new(
        ticker.to_string(),
        category_id.to_string(),
        Some(quantity),
        quantity * price,
        Some(price),
        target_weight,
    )
}

pub fn bond(ticker: &str, category_id: &str, value: Decimal, target_weight: Decimal) -> Asset {
    Asset::new(
        ticker.to_string(),
        category_id.to_string(),
        None,
        value,
        None,
        target_weight,
    )
}

pub fn snapshot(categories: Vec<Category>, assets: Vec<Asset>) -> PortfolioSnapshot {
    let mut assets_by_category: BTreeMap<String, Vec<Asset>> = BTreeMap::new();
    for asset in assets {
        assets_by_category
            .entry(asset.category_id().clone())
            .or_default()
            .push(asset);
    }
    PortfolioSnapshot::new(categories, assets_by_category)
}

/// Fixed income, local equities and foreign equities.
///
/// With a contribution of 1000 at rate 5 the category split is 500 / 400 /
/// 100, and every category has something to buy.
pub fn three_category_portfolio() -> PortfolioSnapshot {
    snapshot(
        vec![
            category(
                "fixed_income",
                dec!(0.5),
                dec!(500),
                CurrencyDomain::Local,
                UnitPolicy::Continuous,
            ),
            category(
                "equities",
                dec!(0.3),
                dec!(200),
                CurrencyDomain::Local,
                UnitPolicy::DiscreteLocal,
            ),
            category(
                "stocks",
                dec!(0.2),
                dec!(300),
                CurrencyDomain::Foreign,
                UnitPolicy::DiscreteForeign,
            ),
        ],
        vec![
            bond("TESOURO", "fixed_income", dec!(500), dec!(1)),
            share("ITSA4", "equities", dec!(20), dec!(10), dec!(0.5)),
            share("WEGE3", "equities", dec!(0), dec!(40), dec!(0.5)),
            share("VOO", "stocks", dec!(0.1), dec!(500), dec!(0.5)),
            share("VNQ", "stocks", dec!(0.1), dec!(100), dec!(0.5)),
        ],
    )
}

pub fn assert_close(actual: Decimal, expected: Decimal) {
    let tolerance = dec!(0.000000001);
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {} to be within {} of {}",
        actual,
        tolerance,
        expected
    );
}
