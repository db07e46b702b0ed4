//! Beneficiary account numbers (`:59:`).

use super::patterns::{ACCOUNT_ANY, ACCOUNT_LEADING};
use super::FieldExtractor;

/// Account extractor: two letters followed by 8 to 34 letters or digits,
/// preferably at the start of a line after an optional `/`.
///
/// Candidates without a digit are words, not accounts.
pub struct AccountExtractor;

impl AccountExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for AccountExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for AccountExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        text.lines()
            .filter_map(|line| ACCOUNT_LEADING.captures(line))
            .map(|caps| caps[1].to_string())
            .find(|account| is_account(account))
            .or_else(|| self.extract_all(text).into_iter().next())
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ACCOUNT_ANY
            .captures_iter(text)
            .map(|caps| caps[1].to_string())
            .filter(|account| is_account(account))
            .collect()
    }
}

fn is_account(candidate: &str) -> bool {
    candidate.chars().any(|c| c.is_ascii_digit())
}
