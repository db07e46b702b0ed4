//! Amount extraction.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::AMOUNT_TOKEN;
use super::FieldExtractor;

/// Amount extractor.
///
/// Accepts `1,234,567.89`, `1 234 567.89` and `1234567.89`: digits with
/// optional comma or space grouping and exactly two fractional digits after a
/// `.`. Numbers touching other digits or separators are rejected.
pub struct AmountExtractor;

impl AmountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AmountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AmountExtractor {
    type Output = Decimal;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results = Vec::new();

        for caps in AMOUNT_TOKEN.captures_iter(text) {
            let Some(full) = caps.get(0) else { continue };
            if !is_isolated(text, full.start(), full.end()) {
                continue;
            }

            let integer_part = caps[1].replace([',', ' '], "");
            if let Ok(amount) = Decimal::from_str(&format!("{}.{}", integer_part, &caps[2])) {
                results.push(amount);
            }
        }

        results
    }
}

fn is_isolated(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    if matches!(before, Some(c) if c.is_ascii_digit() || c == '.' || c == ',') {
        return false;
    }

    let mut after = text[end..].chars();
    match after.next() {
        Some(c) if c.is_ascii_digit() => false,
        Some('.') | Some(',') => !after.next().is_some_and(|c| c.is_ascii_digit()),
        _ => true,
    }
}

/// Parse the SWIFT `:32A:` amount: integer digits and an optional comma
/// decimal part (`1234,5`, `1234,`, `1.234,56`). Scaled to two places.
pub fn parse_swift_amount(integer: &str, fraction: Option<&str>) -> Option<Decimal> {
    let integer: String = integer.chars().filter(char::is_ascii_digit).collect();
    if integer.is_empty() {
        return None;
    }

    let fraction = fraction.filter(|f| !f.is_empty()).unwrap_or("0");
    let mut amount = Decimal::from_str(&format!("{}.{}", integer, fraction)).ok()?;
    amount.rescale(2);
    Some(amount)
}
