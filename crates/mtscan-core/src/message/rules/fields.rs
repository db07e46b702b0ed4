//! Tagged field blocks of a message.

use super::patterns::{SECTION_END, TAG_LINE};

/// One tagged field: the tag line remainder plus its continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field<'a> {
    /// Uppercased tag without delimiters (`20`, `52A`).
    pub tag: String,
    /// Whether the tag was written in the printed `F52A:` form.
    pub printed: bool,
    /// Text after the tag on the tag line.
    pub inline: &'a str,
    /// Following lines up to the next tag or section end.
    pub continuation: Vec<&'a str>,
}

impl<'a> Field<'a> {
    /// Value lines of the field.
    ///
    /// In the printed form the tag line usually carries a description
    /// (`F20: Transaction Reference Number`); such text, recognised by its
    /// lowercase letters, is not part of the value.
    pub fn lines(&self) -> Vec<&'a str> {
        let inline = self.inline.trim();
        let skip_inline =
            inline.is_empty() || (self.printed && inline.chars().any(|c| c.is_lowercase()));

        let mut lines = Vec::with_capacity(self.continuation.len() + 1);
        if !skip_inline {
            lines.push(self.inline);
        }
        lines.extend(self.continuation.iter().copied());
        lines
    }

    /// Value lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines().join("\n")
    }
}

/// Tag match on a single line: `(tag, printed, remainder)`.
pub fn parse_tag_line(line: &str) -> Option<(String, bool, &str)> {
    let caps = TAG_LINE.captures(line)?;
    let (tag, printed) = match (caps.get(1), caps.get(2)) {
        (Some(t), _) => (t.as_str(), false),
        (None, Some(t)) => (t.as_str(), true),
        (None, None) => return None,
    };
    let rest = caps.get(3).map_or("", |m| m.as_str());
    Some((tag.to_uppercase(), printed, rest))
}

/// All tagged fields of a block, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap<'a> {
    fields: Vec<Field<'a>>,
}

impl<'a> FieldMap<'a> {
    pub fn parse(lines: &[&'a str]) -> Self {
        let mut fields: Vec<Field<'a>> = Vec::new();
        let mut open = false;

        for &line in lines {
            if let Some((tag, printed, inline)) = parse_tag_line(line) {
                fields.push(Field {
                    tag,
                    printed,
                    inline,
                    continuation: Vec::new(),
                });
                open = true;
            } else if SECTION_END.is_match(line) {
                open = false;
            } else if open {
                if let Some(field) = fields.last_mut() {
                    field.continuation.push(line);
                }
            }
        }

        Self { fields }
    }

    /// First field with the given tag (case-insensitive).
    pub fn get(&self, tag: &str) -> Option<&Field<'a>> {
        self.fields.iter().find(|f| f.tag.eq_ignore_ascii_case(tag))
    }

    /// First field matching any of `tags`, in the order given.
    pub fn first_of(&self, tags: &[&str]) -> Option<&Field<'a>> {
        tags.iter().find_map(|tag| self.get(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field<'a>> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
