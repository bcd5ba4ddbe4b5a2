use anyhow::{Context, Result};
use reqwest::Client;
use rust_decimal::Decimal;
use tracing::info;

use super::{
    frank_dto::ExchangeQuoteDto,
    utils::{make_request, parse_response_object},
};

const BASE_URL: &str = "https://api.frankfurter.app";

/// Latest published rate, as `to_currency` units per one `from_currency`.
pub async fn get_latest_rate(
    from_currency: &str,
    to_currency: &str,
    client: &Client,
) -> Result<Decimal> {
    let endpoint = format!("latest?from={}&to={}", from_currency, to_currency);
    let res = make_request(client, BASE_URL, &endpoint)
        .await
        .with_context(|| format!("Frankfurter ({} -> {})", from_currency, to_currency))?;
    let quote = parse_response_object::<ExchangeQuoteDto>(
        res,
        &format!(
            "No exchange rate from {} to {}",
            from_currency, to_currency
        ),
    )?;

    let rate = rate_from_quote(&quote, to_currency)?;
    info!(
        "{} -> {} rate {} published {}",
        from_currency,
        to_currency,
        rate,
        quote.date()
    );

    Ok(rate)
}

/// Rate per single unit, even when the quote was made for another amount.
pub fn rate_from_quote(quote: &ExchangeQuoteDto, to_currency: &str) -> Result<Decimal> {
    let quoted = quote
        .rates()
        .get(to_currency)
        .with_context(|| format!("Quote for {} has no {} rate", quote.base(), to_currency))?;

    quoted
        .checked_div(*quote.amount())
        .with_context(|| format!("Quote for {} has a zero amount", quote.base()))
}
