//! Currency code extraction.

use super::patterns::{CURRENCY_LABEL, CURRENCY_TOKEN};
use super::FieldExtractor;

/// ISO 4217 codes accepted in settlement fields.
pub const VALID_CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "JPY", "CHF", "CAD", "AUD", "NZD", "CNY", "INR", "RUB", "BRL", "MXN",
    "SGD", "HKD", "KRW", "XAF", "XOF", "XPF", "CFA", "ZAR", "NGN", "KES", "EGP", "TND", "MAD",
    "AED", "SAR", "ILS", "THB", "MYR", "PHP", "IDR", "VND", "PKR", "BDT", "LKR",
];

pub fn is_valid_currency(code: &str) -> bool {
    VALID_CURRENCIES.contains(&code)
}

/// Currency extractor.
///
/// A `Currency:` / `Devise:` label line is searched first; otherwise the
/// first allowed three-letter uppercase token wins.
pub struct CurrencyExtractor;

impl CurrencyExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CurrencyExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CurrencyExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let labelled = text.lines().find_map(|line| {
            let label = CURRENCY_LABEL.find_iter(line).last()?;
            let tail = line[label.end()..].to_uppercase();
            CURRENCY_TOKEN
                .captures_iter(&tail)
                .map(|caps| caps[1].to_string())
                .find(|code| is_valid_currency(code))
        });

        labelled.or_else(|| self.extract_all(text).into_iter().next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CURRENCY_TOKEN
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .filter(|code| is_valid_currency(code))
            .collect()
    }
}
