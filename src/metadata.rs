//! Static currency reference data: display names and symbols.

use crate::error::ConvertError;
use std::collections::BTreeMap;

/// Immutable reference data for one currency.
#[derive(Debug, Clone, PartialEq)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
}

/// Seed table of well-known ISO 4217 currencies. The set of codes here is
/// independent of whatever the rate provider returns; metadata lookups and
/// rate lookups fail separately for codes missing from their respective
/// tables.
const SEED: &[(&str, &str, &str)] = &[
    ("AED", "United Arab Emirates Dirham", "د.إ"),
    ("AUD", "Australian Dollar", "A$"),
    ("BRL", "Brazilian Real", "R$"),
    ("CAD", "Canadian Dollar", "C$"),
    ("CHF", "Swiss Franc", "CHF"),
    ("CNY", "Chinese Yuan", "¥"),
    ("CZK", "Czech Koruna", "Kč"),
    ("DKK", "Danish Krone", "kr"),
    ("EUR", "Euro", "€"),
    ("GBP", "British Pound Sterling", "£"),
    ("HKD", "Hong Kong Dollar", "HK$"),
    ("HUF", "Hungarian Forint", "Ft"),
    ("IDR", "Indonesian Rupiah", "Rp"),
    ("ILS", "Israeli New Shekel", "₪"),
    ("INR", "Indian Rupee", "₹"),
    ("JPY", "Japanese Yen", "¥"),
    ("KRW", "South Korean Won", "₩"),
    ("MXN", "Mexican Peso", "Mex$"),
    ("MYR", "Malaysian Ringgit", "RM"),
    ("NOK", "Norwegian Krone", "kr"),
    ("NZD", "New Zealand Dollar", "NZ$"),
    ("PHP", "Philippine Peso", "₱"),
    ("PLN", "Polish Zloty", "zł"),
    ("RUB", "Russian Ruble", "₽"),
    ("SEK", "Swedish Krona", "kr"),
    ("SGD", "Singapore Dollar", "S$"),
    ("THB", "Thai Baht", "฿"),
    ("TRY", "Turkish Lira", "₺"),
    ("USD", "United States Dollar", "$"),
    ("ZAR", "South African Rand", "R"),
];

/// Lookup of currency names and symbols by code. Loaded once at construction,
/// read-only afterwards, no network dependency.
pub struct CurrencyMetadata {
    currencies: BTreeMap<String, Currency>,
}

impl CurrencyMetadata {
    pub fn new() -> Self {
        let currencies = SEED
            .iter()
            .map(|(code, name, symbol)| {
                (
                    code.to_string(),
                    Currency {
                        code: code.to_string(),
                        name: name.to_string(),
                        symbol: symbol.to_string(),
                    },
                )
            })
            .collect();
        CurrencyMetadata { currencies }
    }

    /// All known currencies as `(code, display name)`, ascending by code for
    /// deterministic rendering.
    pub fn names(&self) -> Vec<(String, String)> {
        self.currencies
            .values()
            .map(|c| (c.code.clone(), c.name.clone()))
            .collect()
    }

    pub fn name(&self, code: &str) -> Result<&str, ConvertError> {
        self.get(code).map(|c| c.name.as_str())
    }

    pub fn symbol(&self, code: &str) -> Result<&str, ConvertError> {
        self.get(code).map(|c| c.symbol.as_str())
    }

    pub fn get(&self, code: &str) -> Result<&Currency, ConvertError> {
        self.currencies
            .get(code)
            .ok_or_else(|| ConvertError::UnknownCurrency(code.to_string()))
    }
}

impl Default for CurrencyMetadata {
    fn default() -> Self {
        Self::new()
    }
}
