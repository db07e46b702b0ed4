//! BIC codes and identifier-code captures.

use super::patterns::{BIC_EXACT, BIC_TOKEN, IDENTIFIER_CODE_LABEL};
use super::placeholder::Placeholders;

/// Whether `s` is an 8- or 11-character BIC.
pub fn looks_like_bic(s: &str) -> bool {
    BIC_EXACT.is_match(s)
}

/// BIC-shaped tokens of `text` that are not placeholder words
/// (`IDENTIFIANT` and `INSTITUTION` have the shape of an 11-character BIC).
pub fn bic_tokens<'t>(text: &'t str, placeholders: &'t Placeholders) -> impl Iterator<Item = &'t str> + 't {
    BIC_TOKEN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(move |token| !placeholders.is_placeholder(token))
}

/// Code following an `IdentifierCode:` / `Code d'identifiant:` label, on the
/// label line itself or either of the next two lines.
pub fn find_identifier_code(lines: &[&str], placeholders: &Placeholders) -> Option<String> {
    let (idx, tail) = lines.iter().enumerate().find_map(|(idx, line)| {
        IDENTIFIER_CODE_LABEL
            .find_iter(line)
            .last()
            .map(|label| (idx, &line[label.end()..]))
    })?;

    std::iter::once(tail)
        .chain(lines.iter().skip(idx + 1).take(2).copied())
        .find_map(|candidate| bic_tokens(candidate, placeholders).next().map(str::to_string))
}

/// Split a `CODE/Name` capture.
///
/// The part before the first `/` is a code only when it looks like a BIC;
/// otherwise the whole capture is a name.
pub fn split_code_name(raw: &str) -> (Option<String>, Option<String>) {
    let raw = raw.trim();
    if raw.is_empty() {
        return (None, None);
    }

    if let Some((code, name)) = raw.split_once('/') {
        let code = code.trim();
        if looks_like_bic(code) {
            let name = collapse(name);
            return (Some(code.to_string()), (!name.is_empty()).then_some(name));
        }
    }

    if looks_like_bic(raw) {
        (Some(raw.to_string()), None)
    } else {
        (None, Some(collapse(raw)))
    }
}

/// Join a code and a name into a `CODE/Name` capture.
pub fn join_code_name(code: Option<&str>, name: Option<&str>) -> Option<String> {
    match (code, name) {
        (Some(code), Some(name)) => Some(format!("{}/{}", code, name)),
        (Some(code), None) => Some(code.to_string()),
        (None, Some(name)) => Some(name.to_string()),
        (None, None) => None,
    }
}

pub(crate) fn collapse(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
