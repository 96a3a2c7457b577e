//! Currency codes and the built-in currency catalog.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Currency code (ISO 4217 for fiat, ticker for crypto and metals).
///
/// Codes are normalized to uppercase on construction and when deserialized.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Currency(String);

impl Currency {
    /// Create a new currency from code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().to_uppercase())
    }

    /// Get the currency code.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Currencies displayed without a fractional part.
    pub fn is_zero_decimal(&self) -> bool {
        matches!(self.0.as_str(), "JPY" | "KRW")
    }

    /// Catalog entry for this code, if the currency is known.
    pub fn info(&self) -> Option<&'static CurrencyInfo> {
        lookup(self.code())
    }

    /// Display symbol, falling back to the code for unknown currencies.
    pub fn symbol(&self) -> &str {
        self.info().map(|info| info.symbol).unwrap_or(self.code())
    }

    /// Catalog category, if the currency is known.
    pub fn category(&self) -> Option<CurrencyCategory> {
        self.info().map(|info| info.category)
    }

    /// Common currencies
    pub fn usd() -> Self {
        Self::new("USD")
    }

    pub fn eur() -> Self {
        Self::new("EUR")
    }

    pub fn gbp() -> Self {
        Self::new("GBP")
    }

    pub fn jpy() -> Self {
        Self::new("JPY")
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Currency {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Currency {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<Currency> for String {
    fn from(currency: Currency) -> Self {
        currency.0
    }
}

impl Borrow<str> for Currency {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Catalog grouping used for formatting and list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CurrencyCategory {
    Fiat,
    Crypto,
    Metal,
}

impl CurrencyCategory {
    /// Crypto and metals are quoted with extra precision.
    pub fn is_high_precision(&self) -> bool {
        matches!(self, CurrencyCategory::Crypto | CurrencyCategory::Metal)
    }
}

/// Static description of a catalog currency.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrencyInfo {
    pub code: &'static str,
    pub name: &'static str,
    pub symbol: &'static str,
    pub flag: &'static str,
    pub category: CurrencyCategory,
    /// Units per one USD used before the first refresh.
    pub seed_rate: f64,
}

impl CurrencyInfo {
    /// Owned currency code.
    pub fn currency(&self) -> Currency {
        Currency::new(self.code)
    }
}

macro_rules! entry {
    ($code:literal, $name:literal, $symbol:literal, $flag:literal, $category:ident, $rate:literal) => {
        CurrencyInfo {
            code: $code,
            name: $name,
            symbol: $symbol,
            flag: $flag,
            category: CurrencyCategory::$category,
            seed_rate: $rate,
        }
    };
}

/// Every currency the app knows how to display.
pub static CATALOG: &[CurrencyInfo] = &[
    entry!("USD", "United States Dollar", "$", "🇺🇸", Fiat, 1.0),
    entry!("EUR", "Euro", "€", "🇪🇺", Fiat, 0.92),
    entry!("GBP", "British Pound", "£", "🇬🇧", Fiat, 0.79),
    entry!("AUD", "Australian Dollar", "A$", "🇦🇺", Fiat, 1.53),
    entry!("CAD", "Canadian Dollar", "C$", "🇨🇦", Fiat, 1.36),
    entry!("CHF", "Swiss Franc", "Fr", "🇨🇭", Fiat, 0.88),
    entry!("CNY", "Chinese Yuan", "¥", "🇨🇳", Fiat, 7.24),
    entry!("JPY", "Japanese Yen", "¥", "🇯🇵", Fiat, 149.50),
    entry!("INR", "Indian Rupee", "₹", "🇮🇳", Fiat, 83.12),
    entry!("GEL", "Georgian Lari", "₾", "🇬🇪", Fiat, 2.67),
    entry!("TRY", "Turkish Lira", "₺", "🇹🇷", Fiat, 30.25),
    entry!("AED", "UAE Dirham", "د.إ", "🇦🇪", Fiat, 3.67),
    entry!("SGD", "Singapore Dollar", "S$", "🇸🇬", Fiat, 1.34),
    entry!("HKD", "Hong Kong Dollar", "HK$", "🇭🇰", Fiat, 7.82),
    entry!("NZD", "New Zealand Dollar", "NZ$", "🇳🇿", Fiat, 1.64),
    entry!("SEK", "Swedish Krona", "kr", "🇸🇪", Fiat, 10.45),
    entry!("NOK", "Norwegian Krone", "kr", "🇳🇴", Fiat, 10.62),
    entry!("DKK", "Danish Krone", "kr", "🇩🇰", Fiat, 6.87),
    entry!("PLN", "Polish Zloty", "zł", "🇵🇱", Fiat, 4.02),
    entry!("RUB", "Russian Ruble", "₽", "🇷🇺", Fiat, 89.50),
    entry!("BRL", "Brazilian Real", "R$", "🇧🇷", Fiat, 4.97),
    entry!("MXN", "Mexican Peso", "$", "🇲🇽", Fiat, 17.15),
    entry!("ZAR", "South African Rand", "R", "🇿🇦", Fiat, 18.75),
    entry!("KRW", "South Korean Won", "₩", "🇰🇷", Fiat, 1325.00),
    entry!("THB", "Thai Baht", "฿", "🇹🇭", Fiat, 35.20),
    entry!("BTC", "Bitcoin", "₿", "🪙", Crypto, 0.000024),
    entry!("ETH", "Ethereum", "Ξ", "🪙", Crypto, 0.00041),
    entry!("USDT", "Tether", "₮", "🪙", Crypto, 1.0),
    entry!("BNB", "Binance Coin", "BNB", "🪙", Crypto, 0.0033),
    entry!("XRP", "Ripple", "XRP", "🪙", Crypto, 1.85),
    entry!("ADA", "Cardano", "₳", "🪙", Crypto, 2.50),
    entry!("SOL", "Solana", "SOL", "🪙", Crypto, 0.0098),
    entry!("DOGE", "Dogecoin", "Ð", "🪙", Crypto, 12.50),
    entry!("XAU", "Gold (oz)", "Au", "🥇", Metal, 0.00049),
    entry!("XAG", "Silver (oz)", "Ag", "🥈", Metal, 0.043),
    entry!("XPT", "Platinum (oz)", "Pt", "⬜", Metal, 0.00105),
    entry!("XPD", "Palladium (oz)", "Pd", "⬜", Metal, 0.00098),
];

/// Find a catalog entry by code (case-insensitive).
pub fn lookup(code: &str) -> Option<&'static CurrencyInfo> {
    CATALOG
        .iter()
        .find(|info| info.code.eq_ignore_ascii_case(code))
}

/// Seed rates relative to USD, used until the first successful refresh.
pub fn seed_rates() -> Vec<(Currency, f64)> {
    CATALOG
        .iter()
        .map(|info| (info.currency(), info.seed_rate))
        .collect()
}

/// Filter the catalog for a picker list.
///
/// Matches `query` against code or name, case-insensitively. An empty query
/// matches everything. When `preferred` is in the result it is moved to the
/// front.
pub fn search(
    query: &str,
    category: Option<CurrencyCategory>,
    preferred: Option<&Currency>,
) -> Vec<&'static CurrencyInfo> {
    let query = query.trim().to_lowercase();

    let mut results: Vec<&'static CurrencyInfo> = CATALOG
        .iter()
        .filter(|info| category.map_or(true, |c| info.category == c))
        .filter(|info| {
            query.is_empty()
                || info.code.to_lowercase().contains(&query)
                || info.name.to_lowercase().contains(&query)
        })
        .collect();

    if let Some(preferred) = preferred {
        if let Some(idx) = results.iter().position(|info| info.code == preferred.code()) {
            let item = results.remove(idx);
            results.insert(0, item);
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_is_uppercased() {
        assert_eq!(Currency::new("eur").code(), "EUR");
        assert_eq!(Currency::from("gel"), Currency::new("GEL"));
    }

    #[test]
    fn test_deserialize_normalizes_case() {
        let currency: Currency = serde_json::from_str(r#""eur""#).unwrap();
        assert_eq!(currency, Currency::eur());
        assert_eq!(serde_json::to_string(&currency).unwrap(), r#""EUR""#);

        let rates: std::collections::BTreeMap<Currency, f64> =
            serde_json::from_str(r#"{"usd": 1.0, "gel": 2.7}"#).unwrap();
        assert_eq!(rates.get(&Currency::new("GEL")), Some(&2.7));
    }

    #[test]
    fn test_zero_decimal_currencies() {
        assert!(Currency::jpy().is_zero_decimal());
        assert!(Currency::new("KRW").is_zero_decimal());
        assert!(!Currency::usd().is_zero_decimal());
    }

    #[test]
    fn test_symbol_falls_back_to_code() {
        assert_eq!(Currency::eur().symbol(), "€");
        assert_eq!(Currency::new("ZZZ").symbol(), "ZZZ");
    }

    #[test]
    fn test_seed_rates_pin_usd() {
        let rates = seed_rates();
        let usd = rates.iter().find(|(c, _)| *c == Currency::usd()).unwrap();
        assert_eq!(usd.1, 1.0);
        assert_eq!(rates.len(), CATALOG.len());
        assert!(rates.iter().all(|(_, r)| *r > 0.0));
    }

    #[test]
    fn test_search_filters_and_prioritizes() {
        let fiat = search("", Some(CurrencyCategory::Fiat), Some(&Currency::new("GEL")));
        assert_eq!(fiat[0].code, "GEL");
        assert!(fiat.iter().all(|c| c.category == CurrencyCategory::Fiat));

        let krona = search("KRON", None, None);
        let codes: Vec<&str> = krona.iter().map(|c| c.code).collect();
        assert_eq!(codes, vec!["SEK", "NOK", "DKK"]);

        assert!(search("bit", Some(CurrencyCategory::Fiat), None).is_empty());
    }

    #[test]
    fn test_currency_serializes_as_plain_string() {
        let json = serde_json::to_string(&Currency::eur()).unwrap();
        assert_eq!(json, "\"EUR\"");
    }
}
