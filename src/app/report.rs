use std::{collections::BTreeMap, fmt::Write};

use rust_decimal::Decimal;

use crate::models::{AllocationPlan, Category, CurrencyDomain, PurchaseInstruction};

/// Plain-text rendering of a plan for the terminal.
pub fn render_plan(plan: &AllocationPlan, categories: &[Category]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Contribution {:.2} at exchange rate {}",
        plan.contribution(),
        plan.exchange_rate()
    );
    out.push_str(&render_allocations(
        plan.category_allocations(),
        plan.purchases(),
        categories,
    ));

    if !plan.notices().is_empty() {
        let _ = writeln!(out, "\nNotes");
        for notice in plan.notices() {
            let _ = writeln!(out, "  - {}", notice);
        }
    }

    out
}

/// Renders stored allocations and purchases, grouped by category in
/// configured order.
pub fn render_allocations(
    allocations: &BTreeMap<String, Decimal>,
    purchases: &BTreeMap<String, Vec<PurchaseInstruction>>,
    categories: &[Category],
) -> String {
    let mut out = String::new();

    if allocations.is_empty() {
        let _ = writeln!(out, "No allocations.");
        return out;
    }

    for category in categories {
        let Some(amount) = allocations.get(category.id()) else {
            continue;
        };
        let _ = writeln!(
            out,
            "\n{} ({}): {:.2}",
            category.name(),
            category.id(),
            amount
        );

        let instructions = purchases.get(category.id()).map(Vec::as_slice).unwrap_or(&[]);
        if instructions.is_empty() {
            let _ = writeln!(out, "  nothing to buy");
            continue;
        }

        let _ = writeln!(
            out,
            "  {:<12} {:>14} {:>14} {:>16}",
            "Ticker", "Quantity", "Amount", "After purchase"
        );
        for instruction in instructions {
            let quantity = match instruction.quantity() {
                Some(quantity) => format_quantity(*quantity),
                None => "-".to_string(),
            };
            let currency = match instruction.allocated_currency() {
                CurrencyDomain::Local => "",
                CurrencyDomain::Foreign => " (fx)",
            };
            let _ = writeln!(
                out,
                "  {:<12} {:>14} {:>14} {:>16}",
                instruction.ticker(),
                quantity,
                format!("{:.2}{}", instruction.allocated_amount(), currency),
                format_quantity(*instruction.resulting_total()),
            );
        }
    }

    out
}

fn format_quantity(value: Decimal) -> String {
    if value.fract().is_zero() {
        format!("{}", value.trunc().normalize())
    } else {
        format!("{}", value.round_dp(6).normalize())
    }
}
