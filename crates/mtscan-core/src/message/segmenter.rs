//! Message segmentation: one document's text to message blocks.

use std::iter::{Enumerate, Peekable};
use std::str::Lines;

use regex::Regex;
use tracing::trace;

use super::rules::patterns::{
    IDENTIFIER_HEADER, MESSAGE_COUNTER, REFERENCE_TAG_LINE, SENDER_LINE, SEPARATOR_LINE, UMI_HEADER,
    UNDERSCORE_RULE,
};
use crate::models::Direction;

/// Contiguous span of source lines believed to hold one message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBlock<'a> {
    lines: Vec<&'a str>,
    start_line: usize,
    direction: Direction,
    opens_with_boundary: bool,
}

impl<'a> MessageBlock<'a> {
    pub fn lines(&self) -> &[&'a str] {
        &self.lines
    }

    /// Block text, lines joined with `\n`.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// First line number (1-based).
    pub fn start_line(&self) -> usize {
        self.start_line
    }

    /// Last line number (1-based, inclusive).
    pub fn end_line(&self) -> usize {
        self.start_line + self.lines.len().saturating_sub(1)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// True when nothing but blank lines follows the boundary line.
    pub fn is_empty(&self) -> bool {
        let skip = usize::from(self.opens_with_boundary);
        self.lines.iter().skip(skip).all(|line| line.trim().is_empty())
    }
}

/// What a boundary pattern must show before it is used to split a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    /// The marker occurs on at least two lines.
    Repeated,
    /// Splitting on the marker leaves at least two blocks with content
    /// besides the marker line itself.
    Divides,
}

struct Boundary {
    pattern: &'static Regex,
    rule: Rule,
}

impl Boundary {
    fn repeated(pattern: &'static Regex) -> Self {
        Self {
            pattern,
            rule: Rule::Repeated,
        }
    }

    fn divides(pattern: &'static Regex) -> Self {
        Self {
            pattern,
            rule: Rule::Divides,
        }
    }

    fn applies(&self, text: &str) -> bool {
        match self.rule {
            Rule::Repeated => text.lines().filter(|line| self.pattern.is_match(line)).take(2).count() == 2,
            Rule::Divides => {
                let mut blocks = 0;
                let mut has_content = false;
                for line in text.lines() {
                    if self.pattern.is_match(line) {
                        blocks += usize::from(has_content);
                        has_content = false;
                    } else if !line.trim().is_empty() {
                        has_content = true;
                    }
                }
                blocks + usize::from(has_content) >= 2
            }
        }
    }
}

/// Boundary patterns in order of preference for each layout.
///
/// Explicit headers come first. Both layouts fall back to `:20:` tags, then
/// `***`/`---` separator lines, then underscore page rules.
fn boundary_candidates(direction: Direction) -> &'static [Boundary] {
    lazy_static::lazy_static! {
        static ref INCOMING: Vec<Boundary> = vec![
            Boundary::repeated(&MESSAGE_COUNTER),
            Boundary::repeated(&IDENTIFIER_HEADER),
            Boundary::repeated(&UMI_HEADER),
            Boundary::repeated(&REFERENCE_TAG_LINE),
            Boundary::divides(&SEPARATOR_LINE),
            Boundary::divides(&UNDERSCORE_RULE),
        ];
        static ref OUTGOING: Vec<Boundary> = vec![
            Boundary::repeated(&MESSAGE_COUNTER),
            Boundary::repeated(&IDENTIFIER_HEADER),
            Boundary::repeated(&SENDER_LINE),
            Boundary::repeated(&UMI_HEADER),
            Boundary::repeated(&REFERENCE_TAG_LINE),
            Boundary::divides(&SEPARATOR_LINE),
            Boundary::divides(&UNDERSCORE_RULE),
        ];
    }

    match direction {
        Direction::Incoming => INCOMING.as_slice(),
        Direction::Outgoing => OUTGOING.as_slice(),
    }
}

/// First boundary pattern that applies to `text`.
///
/// A single header does not split the document: a one-message export
/// often prints its header once after some preamble.
fn select_boundary(text: &str, direction: Direction) -> Option<&'static Regex> {
    boundary_candidates(direction)
        .iter()
        .find(|boundary| boundary.applies(text))
        .map(|boundary| boundary.pattern)
}

/// Lazy, finite sequence of blocks in source order.
///
/// Concatenating the blocks' lines yields the document's lines unchanged.
pub struct Segments<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
    boundary: Option<&'static Regex>,
    direction: Direction,
}

impl<'a> Segments<'a> {
    fn is_boundary(&self, line: &str) -> bool {
        self.boundary.is_some_and(|pattern| pattern.is_match(line))
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = MessageBlock<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, first) = self.lines.next()?;
        let opens_with_boundary = self.is_boundary(first);
        let mut lines = vec![first];

        while let Some(&(_, line)) = self.lines.peek() {
            if self.is_boundary(line) {
                break;
            }
            lines.push(line);
            self.lines.next();
        }

        trace!("Block at line {} with {} lines", idx + 1, lines.len());

        Some(MessageBlock {
            lines,
            start_line: idx + 1,
            direction: self.direction,
            opens_with_boundary,
        })
    }
}

/// Split a document into message blocks.
///
/// Both layouts split on `Message N` counters, then `Identifier: fin.NNN`
/// headers. Outgoing layouts then try `Sender:` lines, which incoming layouts
/// never split on. `Unique Message Identifier` lines follow, then the `:20:`
/// tag and separator-line fallbacks. The boundary line opens
/// the new block. A document where no boundary applies is a single block.
pub fn segment(text: &str, direction: Direction) -> Segments<'_> {
    Segments {
        lines: text.lines().enumerate().peekable(),
        boundary: select_boundary(text, direction),
        direction,
    }
}
