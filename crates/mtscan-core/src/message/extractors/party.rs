//! Ordering-party captures shared by the per-type extractors.

use super::ParsedBlock;
use crate::message::rules::bic::collapse;
use crate::message::rules::patterns::{HEADER_LINE, IDENTIFIER_CODE_LABEL, SENDER_LINE};
use crate::message::rules::{find_identifier_code, join_code_name, looks_like_bic, parse_tag_line, Field, Placeholders};

/// Lines after `Sender:` that may still hold the sender's name.
const SENDER_WINDOW: usize = 3;

/// Ordering-party value chosen by a strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyCandidate {
    /// `CODE/Name`, `CODE` or `Name`.
    pub value: String,
    /// Note for manual review when sources disagreed.
    pub review: Option<String>,
}

impl PartyCandidate {
    pub fn new(value: String) -> Self {
        Self { value, review: None }
    }
}

/// Code and name read from one source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartyParts {
    pub code: Option<String>,
    pub name: Option<String>,
}

impl PartyParts {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.name.is_none()
    }

    fn joined(&self) -> Option<String> {
        join_code_name(self.code.as_deref(), self.name.as_deref())
    }
}

/// Leading BIC of a line and the text after it.
///
/// An 8-letter word followed by more text is as likely a name as a code,
/// so a leading token only counts as a code when it stands alone, is
/// followed by `/`, has 11 characters or carries a digit.
fn leading_code<'l>(line: &'l str, placeholders: &Placeholders) -> Option<(&'l str, &'l str)> {
    let line = line.trim();
    let end = line
        .find(|c: char| c.is_whitespace() || c == '/')
        .unwrap_or(line.len());
    let (token, rest) = line.split_at(end);

    if !looks_like_bic(token) || placeholders.is_placeholder(token) {
        return None;
    }

    let standalone = rest.trim().is_empty() || rest.starts_with('/');
    if standalone || token.len() == 11 || token.chars().any(|c| c.is_ascii_digit()) {
        Some((token, rest.trim_start_matches('/').trim()))
    } else {
        None
    }
}

/// Readable part of a value line, or `None` for account, code or label lines.
fn name_candidate<'l>(line: &'l str, placeholders: &Placeholders) -> Option<&'l str> {
    let mut line = line.trim();
    if line.starts_with('/') || IDENTIFIER_CODE_LABEL.is_match(line) {
        return None;
    }
    if let Some(header) = HEADER_LINE.find(line) {
        line = line[header.end()..].trim();
        if line.starts_with('/') {
            return None;
        }
    }
    if let Some((_, rest)) = leading_code(line, placeholders) {
        line = rest;
    }

    placeholders.is_valid_name(line).then_some(line)
}

/// First readable name among `lines`.
pub(crate) fn first_name(lines: &[&str], placeholders: &Placeholders) -> Option<String> {
    lines
        .iter()
        .find_map(|line| name_candidate(line, placeholders))
        .map(collapse)
}

/// First leading code among `lines`.
fn first_code(lines: &[&str], placeholders: &Placeholders) -> Option<String> {
    lines
        .iter()
        .find_map(|line| leading_code(line, placeholders))
        .map(|(code, _)| code.to_string())
}

/// Code and name of a tagged institution field (`:52A:`, `:52D:`).
///
/// The code comes from an identifier-code label in the field, then one
/// elsewhere in `block` when given, then a code line of the field.
pub fn field_parts(
    field: &Field<'_>,
    block: Option<&ParsedBlock<'_>>,
    placeholders: &Placeholders,
) -> PartyParts {
    let lines = field.lines();
    let code = find_identifier_code(&lines, placeholders)
        .or_else(|| block.and_then(|b| find_identifier_code(b.lines(), placeholders)))
        .or_else(|| first_code(&lines, placeholders));

    PartyParts {
        code,
        name: first_name(&lines, placeholders),
    }
}

/// Incoming ordering institution from `:52A:` (or `:52D:`).
pub fn ordering_institution(block: &ParsedBlock<'_>, placeholders: &Placeholders) -> Option<PartyCandidate> {
    let field = block.fields().first_of(&["52A", "52D"])?;
    field_parts(field, Some(block), placeholders)
        .joined()
        .map(PartyCandidate::new)
}

/// Code and name printed on a `Sender:` line or the few lines below it.
pub fn sender_parts(block: &ParsedBlock<'_>, placeholders: &Placeholders) -> PartyParts {
    let lines = block.lines();
    let Some((idx, rest)) = lines.iter().enumerate().find_map(|(idx, line)| {
        SENDER_LINE
            .captures(line)
            .map(|caps| (idx, caps.get(1).map_or("", |m| m.as_str())))
    }) else {
        return PartyParts::default();
    };

    let following = lines
        .iter()
        .skip(idx + 1)
        .take(SENDER_WINDOW)
        .copied()
        .take_while(|line| parse_tag_line(line).is_none() && !HEADER_LINE.is_match(line));

    let mut parts = PartyParts::default();
    for line in std::iter::once(rest).chain(following) {
        let mut text = line.trim();
        if let Some((code, after)) = leading_code(text, placeholders) {
            parts.code.get_or_insert_with(|| code.to_string());
            text = after;
        }
        if placeholders.is_valid_name(text) && !looks_like_bic(text) {
            parts.name = Some(collapse(text));
            break;
        }
    }
    parts
}

fn same_name(a: &str, b: &str) -> bool {
    collapse(a).eq_ignore_ascii_case(&collapse(b))
}

/// Choose between the `Sender:` line and a tagged field for outgoing layouts.
///
/// The Sender name wins. A tagged field with no readable name (blank,
/// placeholder or code only) only contributes its code. When both carry
/// different names the candidate is flagged for review.
pub fn resolve_outgoing(sender: PartyParts, tagged: PartyParts, tag: &str) -> Option<PartyCandidate> {
    let code = sender.code.clone().or_else(|| tagged.code.clone());

    match (&sender.name, &tagged.name) {
        (Some(sender_name), tagged_name) => {
            let value = join_code_name(code.as_deref(), Some(sender_name.as_str()))?;
            let review = tagged_name
                .as_deref()
                .filter(|tagged_name| !same_name(sender_name, tagged_name))
                .map(|tagged_name| {
                    format!(
                        "ordering party: Sender line \"{}\" differs from :{}: \"{}\"",
                        sender_name, tag, tagged_name
                    )
                });
            Some(PartyCandidate { value, review })
        }
        (None, Some(tagged_name)) => {
            join_code_name(code.as_deref(), Some(tagged_name.as_str())).map(PartyCandidate::new)
        }
        (None, None) => code.map(PartyCandidate::new),
    }
}
