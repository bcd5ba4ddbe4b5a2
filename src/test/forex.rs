#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::api::{frank::rate_from_quote, frank_dto::ExchangeQuoteDto, utils::parse_response_object};

    fn quote(amount: f64, rate: f64) -> ExchangeQuoteDto {
        let body = json!({
            "amount": amount,
            "base": "USD",
            "date": "2026-10-16",
            "rates": { "BRL": rate }
        });
        parse_response_object(body, "bad quote").unwrap()
    }

    #[test]
    fn unit_quote_is_used_as_is() {
        let quote = quote(1.0, 5.4321);

        assert_eq!(rate_from_quote(&quote, "BRL").unwrap(), dec!(5.4321));
        assert_eq!(quote.date().to_string(), "2026-10-16");
    }

    #[test]
    fn quote_for_larger_amount_is_scaled_down() {
        let quote = quote(10.0, 54.3);

        assert_eq!(rate_from_quote(&quote, "BRL").unwrap(), dec!(5.43));
    }

    #[test]
    fn missing_currency_is_an_error() {
        let quote = quote(1.0, 5.4321);

        let err = rate_from_quote(&quote, "EUR").unwrap_err();
        assert!(err.to_string().contains("no EUR rate"));
    }

    #[test]
    fn zero_amount_is_an_error() {
        let quote = quote(0.0, 5.4321);

        assert!(rate_from_quote(&quote, "BRL").is_err());
    }

    #[test]
    fn non_object_body_is_rejected() {
        let parsed = parse_response_object::<ExchangeQuoteDto>(json!([1, 2]), "bad quote");

        assert!(parsed.is_err());
    }
}
