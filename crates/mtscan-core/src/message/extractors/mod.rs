//! Per-type field extractors.
//!
//! Every extractor fills the shared fields (references, settlement, receiver)
//! the same way. The ordering party depends on both the message type and the
//! document direction and is looked up in [`party_strategy`].

mod mt103;
mod mt202;
mod mt910;
pub mod party;

pub use mt103::Mt103Extractor;
pub use mt202::Mt202Extractor;
pub use mt910::Mt910Extractor;
pub use party::PartyCandidate;

use tracing::warn;

use super::rules::patterns::RECEIVER_LINE;
use super::rules::{
    bic_tokens, reference_from_header, FieldExtractor, FieldMap, Placeholders,
    ReferenceExtractor, Settlement,
};
use super::segmenter::MessageBlock;
use crate::models::{BlockRef, Direction, ExtractedRecord, ExtractionConfig, MessageType};

/// A message block with its tagged fields parsed.
#[derive(Debug, Clone)]
pub struct ParsedBlock<'a> {
    block: MessageBlock<'a>,
    fields: FieldMap<'a>,
    text: String,
}

impl<'a> ParsedBlock<'a> {
    pub fn new(block: MessageBlock<'a>) -> Self {
        let fields = FieldMap::parse(block.lines());
        let text = block.text();
        Self { block, fields, text }
    }

    pub fn fields(&self) -> &FieldMap<'a> {
        &self.fields
    }

    pub fn lines(&self) -> &[&'a str] {
        self.block.lines()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn direction(&self) -> Direction {
        self.block.direction()
    }
}

/// Rules shared by all extractors of one pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'c> {
    pub placeholders: &'c Placeholders,
    pub config: &'c ExtractionConfig,
}

/// Trait for message extractors, one per message type.
pub trait MessageExtractor: Send + Sync {
    fn message_type(&self) -> MessageType;

    /// Extract a record. Absent fields stay empty; this never fails.
    fn extract(
        &self,
        block: &ParsedBlock<'_>,
        ctx: &ExtractContext<'_>,
        source: BlockRef,
    ) -> ExtractedRecord;

    /// Reason to drop the message from the output, if any.
    ///
    /// Checked on the raw block before any enrichment.
    fn exclusion(&self, _block: &ParsedBlock<'_>, _ctx: &ExtractContext<'_>) -> Option<String> {
        None
    }
}

static MT202: Mt202Extractor = Mt202Extractor;
static MT103: Mt103Extractor = Mt103Extractor;
static MT910: Mt910Extractor = Mt910Extractor;

/// Extractor for a classified type; `None` for [`MessageType::Unknown`].
pub fn extractor_for(message_type: MessageType) -> Option<&'static dyn MessageExtractor> {
    match message_type {
        MessageType::Mt202 => Some(&MT202),
        MessageType::Mt103 => Some(&MT103),
        MessageType::Mt910 => Some(&MT910),
        MessageType::Unknown => None,
    }
}

/// Ordering-party strategy: block text to a `CODE/Name` candidate.
pub type PartyStrategy = fn(&ParsedBlock<'_>, &Placeholders) -> Option<PartyCandidate>;

const PARTY_STRATEGIES: &[(MessageType, Direction, PartyStrategy)] = &[
    (MessageType::Mt202, Direction::Incoming, party::ordering_institution),
    (MessageType::Mt202, Direction::Outgoing, mt202::ordering_party_outgoing),
    (MessageType::Mt103, Direction::Incoming, mt103::ordering_party_incoming),
    (MessageType::Mt103, Direction::Outgoing, mt103::ordering_party_outgoing),
    (MessageType::Mt910, Direction::Incoming, party::ordering_institution),
    (MessageType::Mt910, Direction::Outgoing, party::ordering_institution),
];

/// Strategy for a (type, direction) pair.
pub fn party_strategy(message_type: MessageType, direction: Direction) -> Option<PartyStrategy> {
    PARTY_STRATEGIES
        .iter()
        .find(|(t, d, _)| *t == message_type && *d == direction)
        .map(|(_, _, strategy)| *strategy)
}

/// Fill the fields every message type carries.
pub(crate) fn read_common_fields(block: &ParsedBlock<'_>, ctx: &ExtractContext<'_>, record: &mut ExtractedRecord) {
    let references = ReferenceExtractor::new();
    let fields = block.fields();

    record.reference = fields
        .get("20")
        .and_then(|f| references.extract(&f.text()))
        .or_else(|| reference_from_header(block.text()));

    record.related_reference = fields.get("21").and_then(|f| references.extract(&f.text()));

    let mut settlement = fields
        .get("32A")
        .map(|f| Settlement::parse(&f.text()))
        .unwrap_or_default();
    if settlement.value_date.is_none() || settlement.currency.is_none() || settlement.amount.is_none() {
        let headers = Settlement::from_headers(block.text());
        settlement.value_date = settlement.value_date.or(headers.value_date);
        settlement.currency = settlement.currency.or(headers.currency);
        settlement.amount = settlement.amount.or(headers.amount);
    }
    record.value_date = settlement.value_date;
    record.currency = settlement.currency;
    record.amount = settlement.amount;

    record.bank_code = receiver_code(block, ctx.placeholders);
}

/// Apply the ordering-party strategy for the record's type and direction.
pub(crate) fn read_ordering_party(block: &ParsedBlock<'_>, ctx: &ExtractContext<'_>, record: &mut ExtractedRecord) {
    let Some(strategy) = party_strategy(record.message_type, record.direction) else {
        return;
    };

    if let Some(candidate) = strategy(block, ctx.placeholders) {
        record.ordering_party = Some(candidate.value);
        if let Some(review) = candidate.review {
            warn!("{}: {}", record.source, review);
            record.warn(review);
        }
    }
}

/// Receiver BIC from a `Receiver:` header, on the header line or the next two.
fn receiver_code(block: &ParsedBlock<'_>, placeholders: &Placeholders) -> Option<String> {
    let lines = block.lines();
    let (idx, rest) = lines.iter().enumerate().find_map(|(idx, line)| {
        RECEIVER_LINE
            .captures(line)
            .map(|caps| (idx, caps.get(1).map_or("", |m| m.as_str())))
    })?;

    std::iter::once(rest)
        .chain(lines.iter().skip(idx + 1).take(2).copied())
        .find_map(|line| bic_tokens(line, placeholders).next().map(str::to_string))
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::message::segmenter::segment;

    pub fn parse(text: &str, direction: Direction) -> ParsedBlock<'_> {
        ParsedBlock::new(segment(text, direction).next().unwrap())
    }

    pub fn source() -> BlockRef {
        BlockRef {
            document: "test.txt".to_string(),
            index: 1,
            start_line: 1,
            end_line: 1,
        }
    }

    pub fn run(text: &str, direction: Direction, message_type: MessageType) -> ExtractedRecord {
        let placeholders = Placeholders::default();
        let config = ExtractionConfig::default();
        let ctx = ExtractContext {
            placeholders: &placeholders,
            config: &config,
        };
        let block = parse(text, direction);
        extractor_for(message_type)
            .unwrap()
            .extract(&block, &ctx, source())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::run;
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_strategy_table_covers_known_types() {
        for message_type in [MessageType::Mt202, MessageType::Mt103, MessageType::Mt910] {
            for direction in [Direction::Incoming, Direction::Outgoing] {
                assert!(party_strategy(message_type, direction).is_some());
            }
        }
        assert!(party_strategy(MessageType::Unknown, Direction::Incoming).is_none());

        for message_type in [MessageType::Mt202, MessageType::Mt103, MessageType::Mt910] {
            assert_eq!(extractor_for(message_type).unwrap().message_type(), message_type);
        }
        assert!(extractor_for(MessageType::Unknown).is_none());
    }

    #[test]
    fn test_common_fields() {
        let text = "Identifier: fin.202\n\
                    Receiver: SGCMCMCXXXX\n\
                    :20:8101/0650/CM\n\
                    :21:NONREF\n\
                    :32A:240115XAF1500000,00\n";
        let record = run(text, Direction::Incoming, MessageType::Mt202);

        assert_eq!(record.reference.as_deref(), Some("8101/0650/CM"));
        assert_eq!(record.related_reference.as_deref(), Some("NONREF"));
        assert_eq!(record.value_date, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(record.currency.as_deref(), Some("XAF"));
        assert_eq!(record.amount, Some(Decimal::from_str("1500000.00").unwrap()));
        assert_eq!(record.bank_code.as_deref(), Some("SGCMCMCXXXX"));
    }

    #[test]
    fn test_reference_header_fallback() {
        let text = "Transaction Reference: FT24015ABCD\nIdentifier: fin.910";
        let record = run(text, Direction::Incoming, MessageType::Mt910);
        assert_eq!(record.reference.as_deref(), Some("FT24015ABCD"));
    }
}
