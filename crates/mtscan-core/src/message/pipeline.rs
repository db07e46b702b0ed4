//! Pipeline orchestration: one document's text to a [`DocumentReport`].

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use super::classifier::classify;
use super::enricher::Enricher;
use super::extractors::{extractor_for, ExtractContext, ParsedBlock};
use super::rules::Placeholders;
use super::segmenter::segment;
use crate::directory::BicDirectory;
use crate::models::{BlockRef, Direction, DocumentReport, DocumentStats, ExtractionConfig, MissingCodesReport};
use crate::Result;

/// Segments, classifies, extracts and enriches the messages of a document.
///
/// Blocks are handled strictly in source order. The directory snapshot is
/// taken once per document, so a concurrent reload never changes the table
/// halfway through a document.
pub struct Pipeline {
    directory: Arc<BicDirectory>,
    config: ExtractionConfig,
    placeholders: Placeholders,
}

impl Pipeline {
    pub fn new(directory: Arc<BicDirectory>, config: ExtractionConfig) -> Self {
        let placeholders = Placeholders::with_extra(&config.extra_placeholder_words);
        Self {
            directory,
            config,
            placeholders,
        }
    }

    pub fn directory(&self) -> &Arc<BicDirectory> {
        &self.directory
    }

    /// Process one document.
    ///
    /// Fails only when the BIC directory cannot be loaded; every other
    /// problem is reported in the records, the missing codes or the stats.
    pub fn process_document(&self, source: &str, text: &str, direction: Direction) -> Result<DocumentReport> {
        let start = Instant::now();
        let snapshot = self.directory.snapshot()?;
        let enricher = Enricher::new(&snapshot);
        let ctx = ExtractContext {
            placeholders: &self.placeholders,
            config: &self.config,
        };

        let mut records = Vec::new();
        let mut missing = MissingCodesReport::new();
        let mut stats = DocumentStats::default();

        for (idx, block) in segment(text, direction).enumerate() {
            stats.blocks += 1;
            let locator = BlockRef {
                document: source.to_string(),
                index: idx + 1,
                start_line: block.start_line(),
                end_line: block.end_line(),
            };

            if block.is_empty() {
                debug!("{}: discarded empty block", locator);
                stats.discarded_empty += 1;
                continue;
            }

            let block = ParsedBlock::new(block);
            let classification = classify(block.text());
            let Some(extractor) = extractor_for(classification.message_type) else {
                debug!("{}: no known message type", locator);
                stats.unknown += 1;
                continue;
            };

            if let Some(reason) = extractor.exclusion(&block, &ctx) {
                debug!("{}: excluded, {}", locator, reason);
                stats.excluded += 1;
                continue;
            }

            let mut record = extractor.extract(&block, &ctx, locator);
            record.variant = classification.variant;
            enricher.enrich(&mut record, &mut missing);
            records.push(record);
        }

        stats.records = records.len();
        info!(
            "{}: {} records from {} blocks ({} empty, {} unknown, {} excluded), {} unmapped codes, {}ms",
            source,
            stats.records,
            stats.blocks,
            stats.discarded_empty,
            stats.unknown,
            stats.excluded,
            missing.unmapped.len(),
            start.elapsed().as_millis()
        );

        Ok(DocumentReport {
            source: source.to_string(),
            direction,
            records,
            missing,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::{BicEntry, BicSource, CsvBicSource, MemoryBicSource};
    use crate::error::{DirectoryError, MtscanError};
    use crate::models::MessageType;
    use pretty_assertions::assert_eq;

    const INCOMING: &str = "\
Relevé des messages reçus
Message 1
Identifier: fin.202
Receiver: BEACCMCXXXX
:20:8101/0650/CM
:21:NONREF
:32A:240115XAF1500000,00
:52A:IdentifierCode: Code d'identifiant:
SGCMCMCX
:58A:BEACCMCX
Message 2
Identifier: fin.910
:20:BEAC240115001
:32A:240115XAF25000000,
:50A:IdentifierCode:
BEACCMCX091
:52A:CCEICMCX
Message 3

Message 4
Identifier: fin.950
:20:STATEMENT
Message 5
Identifier: fin.103
:20:FT2401500001
:32A:240116EUR12500,50
:52A:ECOCCMCX
:59:/CM2110005000010123456789
";

    fn pipeline(entries: Vec<BicEntry>) -> Pipeline {
        let directory = BicDirectory::new(MemoryBicSource::new(entries));
        Pipeline::new(Arc::new(directory), ExtractionConfig::default())
    }

    fn entries() -> Vec<BicEntry> {
        vec![
            BicEntry::new("SGCMCMCX", "SOCIETE GENERALE CAMEROUN", Some("CMR")),
            BicEntry::new("CCEICMCX", "AFRILAND FIRST BANK", Some("CMR")),
        ]
    }

    #[test]
    fn test_document_report() {
        let report = pipeline(entries())
            .process_document("recus.pdf", INCOMING, Direction::Incoming)
            .unwrap();

        assert_eq!(
            report.stats,
            DocumentStats {
                blocks: 6,
                discarded_empty: 1,
                unknown: 2,
                excluded: 1,
                records: 2,
            }
        );

        let mt202 = &report.records[0];
        assert_eq!(mt202.message_type, MessageType::Mt202);
        assert_eq!(mt202.reference.as_deref(), Some("8101/0650/CM"));
        assert_eq!(mt202.ordering_party_name.as_deref(), Some("SOCIETE GENERALE CAMEROUN"));
        assert_eq!(mt202.country.as_deref(), Some("CMR"));
        assert_eq!(mt202.bank_code.as_deref(), Some("BEACCMCXXXX"));
        assert_eq!(mt202.source.index, 2);

        let mt103 = &report.records[1];
        assert_eq!(mt103.ordering_party_code.as_deref(), Some("ECOCCMCX"));
        assert_eq!(mt103.beneficiary.as_deref(), Some("CM2110005000010123456789"));

        assert!(report.missing.unmapped.contains("ECOCCMCX"));
        assert!(report.missing.empty.is_empty());
    }

    #[test]
    fn test_excluded_mt910_has_no_record() {
        let report = pipeline(entries())
            .process_document("recus.pdf", INCOMING, Direction::Incoming)
            .unwrap();

        assert!(report.records.iter().all(|r| r.message_type != MessageType::Mt910));
        assert!(report.records.iter().all(|r| r.reference.as_deref() != Some("BEAC240115001")));
    }

    #[test]
    fn test_outgoing_counters_keep_messages_apart() {
        let text = "\
Message 1
Identifier: fin.202
Sender: ACCESS BANK CAMEROON
:20:REF1
:32A:240115XAF900000,00
:52D:
:58A:SGCMCMCX
Message 2
Identifier: fin.103
Sender: ACCESS BANK CAMEROON
:20:REF2
:32A:240115XAF120000,00
:50F:/CM2110005000010
/34/ACCESS BANK CAMEROON
";
        let report = pipeline(entries())
            .process_document("emis.pdf", text, Direction::Outgoing)
            .unwrap();

        assert_eq!(
            report.stats,
            DocumentStats {
                blocks: 2,
                discarded_empty: 0,
                unknown: 0,
                excluded: 0,
                records: 2,
            }
        );

        let types: Vec<_> = report.records.iter().map(|r| r.message_type).collect();
        assert_eq!(types, vec![MessageType::Mt202, MessageType::Mt103]);
        let refs: Vec<_> = report.records.iter().map(|r| r.reference.as_deref()).collect();
        assert_eq!(refs, vec![Some("REF1"), Some("REF2")]);

        for record in &report.records {
            assert_eq!(record.ordering_party_name.as_deref(), Some("ACCESS BANK CAMEROON"));
        }
        assert_eq!(report.records[0].beneficiary.as_deref(), Some("SOCIETE GENERALE CAMEROUN"));
    }

    #[test]
    fn test_headerless_export_splits_on_reference_tags() {
        let text = "\
Releve des messages
:20:REF001
Message Type: MT202
:52A:SGCMCMCX
:20:REF002
Message Type: MT202
:52A:CCEICMCX
";
        let report = pipeline(entries())
            .process_document("export.txt", text, Direction::Incoming)
            .unwrap();

        assert_eq!(report.stats.blocks, 3);
        assert_eq!(report.stats.unknown, 1);
        let parties: Vec<_> = report
            .records
            .iter()
            .map(|r| (r.reference.as_deref(), r.ordering_party_name.as_deref()))
            .collect();
        assert_eq!(
            parties,
            vec![
                (Some("REF001"), Some("SOCIETE GENERALE CAMEROUN")),
                (Some("REF002"), Some("AFRILAND FIRST BANK")),
            ]
        );
    }

    #[test]
    fn test_cov_variant_is_kept() {
        let text = "Identifier: fin.202.COV\n:20:COV1\n:52A:SGCMCMCX\n";
        let report = pipeline(entries())
            .process_document("cov.txt", text, Direction::Incoming)
            .unwrap();
        assert_eq!(report.records[0].type_label(), "fin.202.COV");
    }

    #[test]
    fn test_reload_makes_new_code_visible() {
        let source = Arc::new(MemoryBicSource::new(entries()));
        let directory = Arc::new(BicDirectory::new(Arc::clone(&source)));
        let pipeline = Pipeline::new(Arc::clone(&directory), ExtractionConfig::default());
        let text = "Identifier: fin.202\n:20:R1\n:52A:ECOCCMCX\n";

        let before = pipeline.process_document("a.txt", text, Direction::Incoming).unwrap();
        assert_eq!(before.records[0].ordering_party_name, None);
        assert!(before.missing.unmapped.contains("ECOCCMCX"));

        source.insert(BicEntry::new("ECOCCMCX", "ECOBANK CAMEROUN", Some("CMR")));
        let stale = pipeline.process_document("a.txt", text, Direction::Incoming).unwrap();
        assert_eq!(stale.records[0].ordering_party_name, None);

        directory.invalidate_and_reload();
        let after = pipeline.process_document("a.txt", text, Direction::Incoming).unwrap();
        assert_eq!(after.records[0].ordering_party_name.as_deref(), Some("ECOBANK CAMEROUN"));
        assert!(after.missing.is_empty());
    }

    #[test]
    fn test_unreadable_directory_is_an_error() {
        let source = CsvBicSource::new("/nonexistent/bic_codes.csv");
        assert!(source.load().is_err());

        let pipeline = Pipeline::new(Arc::new(BicDirectory::new(source)), ExtractionConfig::default());
        let err = pipeline
            .process_document("a.txt", INCOMING, Direction::Incoming)
            .unwrap_err();
        assert!(matches!(err, MtscanError::Directory(DirectoryError::Io { .. })));
    }
}
