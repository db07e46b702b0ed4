//! Records produced by the extraction pipeline.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// SWIFT message category recognised by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    /// General financial institution transfer.
    #[serde(rename = "MT202")]
    Mt202,
    /// Single customer credit transfer.
    #[serde(rename = "MT103")]
    Mt103,
    /// Confirmation of credit.
    #[serde(rename = "MT910")]
    Mt910,
    /// No recognised type token in the block.
    #[serde(rename = "UNKNOWN")]
    Unknown,
}

impl MessageType {
    /// Map the three-digit series number (`"202"`) to a type.
    pub fn from_series(series: &str) -> Self {
        match series {
            "202" => Self::Mt202,
            "103" => Self::Mt103,
            "910" => Self::Mt910,
            _ => Self::Unknown,
        }
    }

    /// The series number, if known.
    pub fn series(&self) -> Option<&'static str> {
        match self {
            Self::Mt202 => Some("202"),
            Self::Mt103 => Some("103"),
            Self::Mt910 => Some("910"),
            Self::Unknown => None,
        }
    }

    /// Whether records of this type are reported.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.series() {
            Some(series) => write!(f, "MT{}", series),
            None => write!(f, "UNKNOWN"),
        }
    }
}

/// Layout of the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Messages received by the institution.
    #[default]
    Incoming,
    /// Messages sent by the institution.
    Outgoing,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Incoming => write!(f, "incoming"),
            Direction::Outgoing => write!(f, "outgoing"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "incoming" | "in" | "entrant" => Ok(Direction::Incoming),
            "outgoing" | "out" | "sortant" => Ok(Direction::Outgoing),
            other => Err(format!("unknown direction: {}", other)),
        }
    }
}

/// Locator of the block a record was extracted from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlockRef {
    /// Document name (file name or caller-supplied label).
    pub document: String,
    /// 1-based position of the block among the document's blocks.
    pub index: usize,
    /// First line of the block (1-based).
    pub start_line: usize,
    /// Last line of the block (1-based, inclusive).
    pub end_line: usize,
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "message {} of {} (lines {}-{})",
            self.index, self.document, self.start_line, self.end_line
        )
    }
}

/// Structured output of one message block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    /// Classified message type.
    pub message_type: MessageType,

    /// Type suffix such as `COV` in `fin.202.COV`.
    pub variant: Option<String>,

    /// Direction of the document the block came from.
    pub direction: Direction,

    /// Where the block sits in its document.
    pub source: BlockRef,

    /// Transaction reference (`:20:`).
    pub reference: Option<String>,

    /// Related reference (`:21:`).
    pub related_reference: Option<String>,

    /// Value date.
    pub value_date: Option<NaiveDate>,

    /// Settled amount, two fractional digits.
    pub amount: Option<Decimal>,

    /// ISO 4217 currency code.
    pub currency: Option<String>,

    /// Receiver BIC taken from the message header.
    pub bank_code: Option<String>,

    /// Raw ordering-party capture, possibly `CODE/Name`.
    pub ordering_party: Option<String>,

    /// Ordering-party BIC.
    pub ordering_party_code: Option<String>,

    /// Ordering-party name, resolved through the directory when possible.
    pub ordering_party_name: Option<String>,

    /// Beneficiary identifier (name, account or BIC).
    pub beneficiary: Option<String>,

    /// Beneficiary BIC awaiting resolution.
    pub beneficiary_code: Option<String>,

    /// ISO3 country of the ordering party.
    pub country: Option<String>,

    /// Notes for manual review.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl ExtractedRecord {
    /// Create an empty record for a classified block.
    pub fn new(message_type: MessageType, direction: Direction, source: BlockRef) -> Self {
        Self {
            message_type,
            variant: None,
            direction,
            source,
            reference: None,
            related_reference: None,
            value_date: None,
            amount: None,
            currency: None,
            bank_code: None,
            ordering_party: None,
            ordering_party_code: None,
            ordering_party_name: None,
            beneficiary: None,
            beneficiary_code: None,
            country: None,
            warnings: Vec::new(),
        }
    }

    /// Label in the `fin.NNN[.VARIANT]` form used by reports.
    pub fn type_label(&self) -> String {
        match (self.message_type.series(), &self.variant) {
            (Some(series), Some(variant)) => format!("fin.{}.{}", series, variant),
            (Some(series), None) => format!("fin.{}", series),
            (None, _) => "unknown".to_string(),
        }
    }

    /// Add a review note unless the same note is already present.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        if !self.warnings.contains(&message) {
            self.warnings.push(message);
        }
    }
}

/// BIC codes that could not be turned into bank names.
///
/// `unmapped` holds codes seen in the text but absent from the directory;
/// `empty` holds locators of records whose ordering-party code was blank.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MissingCodesReport {
    pub unmapped: BTreeSet<String>,
    pub empty: BTreeSet<String>,
}

impl MissingCodesReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_unmapped(&mut self, code: impl Into<String>) {
        self.unmapped.insert(code.into());
    }

    pub fn record_empty(&mut self, marker: impl Into<String>) {
        self.empty.insert(marker.into());
    }

    /// Union with another report.
    pub fn merge(&mut self, other: &MissingCodesReport) {
        self.unmapped.extend(other.unmapped.iter().cloned());
        self.empty.extend(other.empty.iter().cloned());
    }

    pub fn is_empty(&self) -> bool {
        self.unmapped.is_empty() && self.empty.is_empty()
    }
}

/// Block counts for one document, kept for auditability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DocumentStats {
    /// Blocks produced by the segmenter.
    pub blocks: usize,
    /// Blocks without interior content, dropped before classification.
    pub discarded_empty: usize,
    /// Blocks with no recognised type.
    pub unknown: usize,
    /// Blocks removed by an exclusion rule.
    pub excluded: usize,
    /// Records emitted.
    pub records: usize,
}

impl DocumentStats {
    fn add(&mut self, other: &DocumentStats) {
        self.blocks += other.blocks;
        self.discarded_empty += other.discarded_empty;
        self.unknown += other.unknown;
        self.excluded += other.excluded;
        self.records += other.records;
    }
}

/// Everything extracted from one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub source: String,
    pub direction: Direction,
    pub records: Vec<ExtractedRecord>,
    pub missing: MissingCodesReport,
    pub stats: DocumentStats,
}

impl DocumentReport {
    /// Keep only the records whose value date is `date`.
    pub fn retain_date(&mut self, date: NaiveDate) {
        self.records.retain(|r| r.value_date == Some(date));
        self.stats.records = self.records.len();
    }
}

/// Aggregation of several document reports.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub documents: usize,
    pub records: Vec<ExtractedRecord>,
    pub missing: MissingCodesReport,
    pub stats: DocumentStats,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a document: records are concatenated, missing codes unioned.
    pub fn merge(&mut self, report: DocumentReport) {
        self.documents += 1;
        self.stats.add(&report.stats);
        self.missing.merge(&report.missing);
        self.records.extend(report.records);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(index: usize) -> BlockRef {
        BlockRef {
            document: "all.pdf".to_string(),
            index,
            start_line: 1,
            end_line: 10,
        }
    }

    #[test]
    fn test_type_label() {
        let mut record = ExtractedRecord::new(MessageType::Mt202, Direction::Incoming, block(1));
        assert_eq!(record.type_label(), "fin.202");

        record.variant = Some("COV".to_string());
        assert_eq!(record.type_label(), "fin.202.COV");
    }

    #[test]
    fn test_direction_from_str() {
        assert_eq!("Outgoing".parse::<Direction>(), Ok(Direction::Outgoing));
        assert_eq!("in".parse::<Direction>(), Ok(Direction::Incoming));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_block_ref_display() {
        assert_eq!(block(3).to_string(), "message 3 of all.pdf (lines 1-10)");
    }

    #[test]
    fn test_batch_merge_unions_missing_codes() {
        let mut first = MissingCodesReport::new();
        first.record_unmapped("AAAACMCX");
        first.record_empty("message 1 of a.pdf (lines 1-4)");

        let mut second = MissingCodesReport::new();
        second.record_unmapped("AAAACMCX");
        second.record_unmapped("BBBBGAGA");

        let doc = |source: &str, missing: MissingCodesReport, index| DocumentReport {
            source: source.to_string(),
            direction: Direction::Incoming,
            records: vec![ExtractedRecord::new(MessageType::Mt103, Direction::Incoming, block(index))],
            missing,
            stats: DocumentStats {
                blocks: 1,
                records: 1,
                ..Default::default()
            },
        };

        let mut batch = BatchReport::new();
        batch.merge(doc("a.pdf", first, 1));
        batch.merge(doc("b.pdf", second, 2));

        assert_eq!(batch.documents, 2);
        assert_eq!(batch.records.len(), 2);
        assert_eq!(batch.records[1].source.index, 2);
        assert_eq!(batch.stats.records, 2);
        assert_eq!(
            batch.missing.unmapped.iter().cloned().collect::<Vec<_>>(),
            vec!["AAAACMCX".to_string(), "BBBBGAGA".to_string()]
        );
        assert_eq!(batch.missing.empty.len(), 1);
    }

    #[test]
    fn test_warn_deduplicates() {
        let mut record = ExtractedRecord::new(MessageType::Mt910, Direction::Incoming, block(1));
        record.warn("check party");
        record.warn("check party");
        assert_eq!(record.warnings.len(), 1);
    }
}
