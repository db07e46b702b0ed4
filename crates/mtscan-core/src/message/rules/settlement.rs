//! Value date, currency and amount of the `:32A:` field.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::amounts::{parse_swift_amount, AmountExtractor};
use super::currency::{is_valid_currency, CurrencyExtractor};
use super::dates::{date_from_header, date_from_settlement, parse_yymmdd};
use super::patterns::{AMOUNT_LABEL, SWIFT_SETTLEMENT};
use super::FieldExtractor;

/// Settlement details of a message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settlement {
    pub value_date: Option<NaiveDate>,
    pub currency: Option<String>,
    pub amount: Option<Decimal>,
}

impl Settlement {
    /// Parse a `:32A:` body.
    ///
    /// The compact SWIFT form (`240115XAF1500000,00`) is tried on each line
    /// first, then the printed form with `Date:`, `Currency: Devise:` and
    /// `Amount: Montant:` lines.
    pub fn parse(body: &str) -> Self {
        for line in body.lines() {
            if let Some(settlement) = Self::parse_compact(line) {
                return settlement;
            }
        }

        Self {
            value_date: date_from_settlement(body),
            currency: CurrencyExtractor::new().extract(body),
            amount: labelled_amount(body),
        }
    }

    /// Settlement details from message headers, for blocks without `:32A:`.
    pub fn from_headers(text: &str) -> Self {
        Self {
            value_date: date_from_header(text),
            currency: CurrencyExtractor::new().extract(text),
            amount: labelled_amount(text),
        }
    }

    fn parse_compact(line: &str) -> Option<Self> {
        let caps = SWIFT_SETTLEMENT.captures(line)?;
        let currency = caps[2].to_string();
        if !is_valid_currency(&currency) {
            return None;
        }

        Some(Self {
            value_date: parse_yymmdd(&caps[1]),
            currency: Some(currency),
            amount: parse_swift_amount(&caps[3], caps.get(4).map(|m| m.as_str())),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.value_date.is_none() && self.currency.is_none() && self.amount.is_none()
    }
}

/// Amount from an `Amount:` / `Montant:` line, else the first amount-shaped
/// token anywhere in `text`.
fn labelled_amount(text: &str) -> Option<Decimal> {
    let extractor = AmountExtractor::new();
    text.lines()
        .filter_map(|line| AMOUNT_LABEL.captures(line))
        .find_map(|caps| extractor.extract(&caps[1]))
        .or_else(|| extractor.extract(text))
}
