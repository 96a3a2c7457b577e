//! Device locale to default currency mapping.

use crate::currency::Currency;

const REGION_CURRENCIES: &[(&str, &str)] = &[
    ("US", "USD"), ("CA", "CAD"), ("GB", "GBP"), ("AU", "AUD"), ("NZ", "NZD"),
    ("EU", "EUR"), ("DE", "EUR"), ("FR", "EUR"), ("IT", "EUR"), ("ES", "EUR"),
    ("NL", "EUR"), ("BE", "EUR"), ("AT", "EUR"), ("PT", "EUR"), ("IE", "EUR"),
    ("FI", "EUR"), ("GR", "EUR"), ("CH", "CHF"), ("JP", "JPY"), ("CN", "CNY"),
    ("IN", "INR"), ("GE", "GEL"), ("TR", "TRY"), ("AE", "AED"), ("SG", "SGD"),
    ("HK", "HKD"), ("SE", "SEK"), ("NO", "NOK"), ("DK", "DKK"), ("PL", "PLN"),
    ("RU", "RUB"), ("BR", "BRL"), ("MX", "MXN"), ("ZA", "ZAR"), ("KR", "KRW"),
    ("TH", "THB"),
];

/// Default currency for a locale tag such as `en-US` or `ka_GE.UTF-8`.
///
/// The region is the last `-`/`_` separated segment. Unknown regions and tags
/// without a region fall back to USD.
pub fn currency_for_locale(locale: &str) -> Currency {
    let tag = locale.split(['.', '@']).next().unwrap_or_default();
    let parts: Vec<&str> = tag.split(['-', '_']).collect();

    let region = if parts.len() > 1 {
        parts[parts.len() - 1].to_uppercase()
    } else {
        "US".to_string()
    };

    REGION_CURRENCIES
        .iter()
        .find(|(r, _)| *r == region)
        .map(|(_, code)| Currency::new(*code))
        .unwrap_or_else(Currency::usd)
}

/// Default currency for the process locale (`LC_ALL`, then `LANG`).
pub fn local_currency() -> Currency {
    let locale = std::env::var("LC_ALL")
        .ok()
        .filter(|v| !v.is_empty())
        .or_else(|| std::env::var("LANG").ok())
        .unwrap_or_else(|| "en-US".to_string());

    currency_for_locale(&locale)
}
