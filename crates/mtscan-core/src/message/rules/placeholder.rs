//! Label and placeholder words printed in place of party data.

use std::collections::HashSet;

/// Built-in placeholder words, in normalised form.
pub const DEFAULT_PLACEHOLDERS: &[&str] = &[
    "IDENTIFIANT",
    "INSTITUTION",
    "IDENTIFIER",
    "CODE",
    "NAMEANDADDRESS",
    "PARTY",
    "IDENTIFIERCODE",
    "CODEDIDENTIFIANT",
    "PARTYIDENTIFIER",
    "NOMETADRESSE",
];

/// Normalise a candidate: ASCII letters and digits only, uppercased.
fn normalize(text: &str) -> String {
    text.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Immutable set of placeholder words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholders {
    words: HashSet<String>,
}

impl Placeholders {
    /// Built-in words plus `extra`.
    pub fn with_extra<S: AsRef<str>>(extra: &[S]) -> Self {
        let words = DEFAULT_PLACEHOLDERS
            .iter()
            .map(|w| w.to_string())
            .chain(extra.iter().map(|w| normalize(w.as_ref())))
            .filter(|w| !w.is_empty())
            .collect();

        Self { words }
    }

    /// Whether `candidate` equals a placeholder word, ignoring case,
    /// whitespace and punctuation.
    pub fn is_placeholder(&self, candidate: &str) -> bool {
        self.words.contains(&normalize(candidate))
    }

    /// Whether a line carries no party data: blank, a label ending in `:`,
    /// or nothing but placeholder words between `:` separators.
    pub fn is_label_line(&self, line: &str) -> bool {
        let line = line.trim();
        if line.is_empty() || line.ends_with(':') {
            return true;
        }

        line.split(':')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .all(|segment| self.is_placeholder(segment))
    }

    /// Whether `candidate` can be reported as a party name.
    pub fn is_valid_name(&self, candidate: &str) -> bool {
        !self.is_label_line(candidate) && candidate.chars().any(char::is_alphabetic)
    }
}

impl Default for Placeholders {
    fn default() -> Self {
        Self::with_extra::<&str>(&[])
    }
}
