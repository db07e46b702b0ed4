//! Transaction reference extraction (`:20:`, `:21:`).

use super::patterns::{REFERENCE_TOKEN, TRANSACTION_REFERENCE};
use super::FieldExtractor;

/// Reference extractor working on a field body.
///
/// The value is the first whitespace-delimited token of the first line that
/// has one of reference shape (letters, digits, `/`, `_`, `-`), uppercased.
/// `/`-segmented forms such as `8101/0650/CM` are a single token.
pub struct ReferenceExtractor;

impl ReferenceExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ReferenceExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for ReferenceExtractor {
    type Output = String;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        text.lines()
            .filter_map(|line| {
                line.split_whitespace()
                    .find(|token| !token.ends_with(':'))
                    .map(str::to_uppercase)
                    .filter(|token| is_reference_token(token))
            })
            .collect()
    }
}

/// Whether `token` has the shape of a transaction reference.
pub fn is_reference_token(token: &str) -> bool {
    REFERENCE_TOKEN.is_match(token) && !token.chars().all(|c| matches!(c, '/' | '-' | '_'))
}

/// Reference from a `Transaction Reference: TOKEN` header line.
pub fn reference_from_header(text: &str) -> Option<String> {
    TRANSACTION_REFERENCE
        .captures(text)
        .map(|caps| caps[1].to_uppercase())
        .filter(|token| is_reference_token(token))
}
