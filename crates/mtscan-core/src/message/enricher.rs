//! Post-processing of extracted records against the BIC directory.

use tracing::debug;

use super::rules::split_code_name;
use crate::directory::{normalize_code, BicEntry, DirectorySnapshot};
use crate::models::{Direction, ExtractedRecord, MessageType, MissingCodesReport};

/// Splits party captures and resolves codes through one directory snapshot.
pub struct Enricher<'d> {
    snapshot: &'d DirectorySnapshot,
}

impl<'d> Enricher<'d> {
    pub fn new(snapshot: &'d DirectorySnapshot) -> Self {
        Self { snapshot }
    }

    /// Resolve a code: exact match, then its 8-character institution code,
    /// then the `XXX` branch of an 8-character code, then any other branch
    /// of the same institution.
    pub fn resolve(&self, code: &str) -> Option<&'d BicEntry> {
        let code = normalize_code(code);
        let snapshot = self.snapshot;

        snapshot
            .get(&code)
            .or_else(|| match code.len() {
                11 => code.get(..8).and_then(|bic8| snapshot.get(bic8)),
                8 => snapshot.get(&format!("{}XXX", code)),
                _ => None,
            })
            .or_else(|| snapshot.institution(&code))
    }

    /// ISO3 country of a code, taken from its institution (BIC8) entry.
    pub fn country_for(&self, code: &str) -> Option<String> {
        let code = normalize_code(code);
        let institution = code
            .get(..8)
            .and_then(|bic8| self.snapshot.get(bic8))
            .or_else(|| self.snapshot.institution(&code));

        institution
            .and_then(|entry| entry.country.clone())
            .or_else(|| self.resolve(&code).and_then(|entry| entry.country.clone()))
    }

    /// Enrich a record in place, recording what could not be resolved.
    ///
    /// Running this twice leaves both the record and `missing` unchanged.
    pub fn enrich(&self, record: &mut ExtractedRecord, missing: &mut MissingCodesReport) {
        if record.ordering_party_code.is_none() && record.ordering_party_name.is_none() {
            if let Some(raw) = record.ordering_party.as_deref() {
                let (code, name) = split_code_name(raw);
                record.ordering_party_code = code;
                record.ordering_party_name = name;
            }
        }

        match record.ordering_party_code.clone() {
            Some(code) => {
                match self.resolve(&code) {
                    Some(entry) => record.ordering_party_name = Some(entry.name.clone()),
                    None => {
                        debug!("{}: code {} not in directory", record.source, code);
                        missing.record_unmapped(code.as_str());
                    }
                }
                if record.country.is_none() || record.message_type == MessageType::Mt910 {
                    if let Some(country) = self.country_for(&code) {
                        record.country = Some(country);
                    }
                }
            }
            // Outgoing layouts often name the sender without a code.
            None if record.direction == Direction::Incoming || record.ordering_party_name.is_none() => {
                missing.record_empty(record.source.to_string());
            }
            None => {}
        }

        match record.message_type {
            MessageType::Mt202 if record.direction == Direction::Outgoing => self.resolve_beneficiary(record, missing),
            MessageType::Mt910 if record.beneficiary.is_none() => {
                record.beneficiary = record
                    .ordering_party_name
                    .clone()
                    .or_else(|| record.ordering_party_code.clone());
            }
            _ => {}
        }
    }

    /// Outgoing MT202: beneficiary bank name from `:58A:`, or the bare code.
    fn resolve_beneficiary(&self, record: &mut ExtractedRecord, missing: &mut MissingCodesReport) {
        let Some(code) = record.beneficiary_code.as_deref() else {
            return;
        };

        match self.resolve(code) {
            Some(entry) => record.beneficiary = Some(entry.name.clone()),
            None => {
                missing.record_unmapped(code);
                record.beneficiary.get_or_insert_with(|| code.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BlockRef;
    use pretty_assertions::assert_eq;

    fn snapshot() -> DirectorySnapshot {
        DirectorySnapshot::new(
            1,
            vec![
                BicEntry::new("SGCMCMCX", "SOCIETE GENERALE CAMEROUN", Some("CMR")),
                BicEntry::new("BEACCMCXXXX", "BANQUE DES ETATS DE L'AFRIQUE CENTRALE", Some("CMR")),
                BicEntry::new("CCEIGAGLXXX", "AFRILAND FIRST BANK GABON", None),
            ],
        )
    }

    fn record(message_type: MessageType, direction: Direction, party: Option<&str>) -> ExtractedRecord {
        let source = BlockRef {
            document: "releve.pdf".to_string(),
            index: 3,
            start_line: 40,
            end_line: 58,
        };
        let mut record = ExtractedRecord::new(message_type, direction, source);
        record.ordering_party = party.map(str::to_string);
        record
    }

    #[test]
    fn test_resolves_code_and_country() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);
        let mut missing = MissingCodesReport::new();
        let mut rec = record(MessageType::Mt202, Direction::Incoming, Some("SGCMCMCXXXX/SG CAMEROUN"));

        enricher.enrich(&mut rec, &mut missing);

        assert_eq!(rec.ordering_party_code.as_deref(), Some("SGCMCMCXXXX"));
        assert_eq!(rec.ordering_party_name.as_deref(), Some("SOCIETE GENERALE CAMEROUN"));
        assert_eq!(rec.country.as_deref(), Some("CMR"));
        assert!(missing.is_empty());
    }

    #[test]
    fn test_eight_character_code_finds_xxx_branch() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);
        assert_eq!(enricher.resolve("beaccmcx").map(|e| e.code.as_str()), Some("BEACCMCXXXX"));
        assert_eq!(enricher.resolve("CCEIGAGL").map(|e| e.country.clone()), Some(None));
        assert!(enricher.resolve("ECOCCMCX").is_none());
    }

    #[test]
    fn test_branch_only_table_resolves_by_institution() {
        let snapshot = DirectorySnapshot::new(1, vec![BicEntry::new("BEACCMCX100", "BEAC SIEGE", Some("CMR"))]);
        let enricher = Enricher::new(&snapshot);
        let mut missing = MissingCodesReport::new();

        for party in ["BEACCMCX", "BEACCMCX091"] {
            let mut rec = record(MessageType::Mt202, Direction::Incoming, Some(party));
            enricher.enrich(&mut rec, &mut missing);

            assert_eq!(rec.ordering_party_name.as_deref(), Some("BEAC SIEGE"));
            assert_eq!(rec.country.as_deref(), Some("CMR"));
        }
        assert!(missing.is_empty());
    }

    #[test]
    fn test_non_ascii_code_is_unresolved() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);
        assert!(enricher.resolve("AAAAAAAÉÉ").is_none());
        assert_eq!(enricher.country_for("AAAAAAAÉÉ"), None);
    }

    #[test]
    fn test_unmapped_and_empty_codes() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);
        let mut missing = MissingCodesReport::new();

        let mut unknown = record(MessageType::Mt103, Direction::Incoming, Some("ECOCCMCX/ECOBANK"));
        enricher.enrich(&mut unknown, &mut missing);
        assert_eq!(unknown.ordering_party_name.as_deref(), Some("ECOBANK"));

        let mut blank = record(MessageType::Mt103, Direction::Incoming, None);
        enricher.enrich(&mut blank, &mut missing);

        assert_eq!(missing.unmapped.iter().collect::<Vec<_>>(), vec!["ECOCCMCX"]);
        assert_eq!(
            missing.empty.iter().collect::<Vec<_>>(),
            vec!["message 3 of releve.pdf (lines 40-58)"]
        );
    }

    #[test]
    fn test_outgoing_name_without_code_is_not_empty() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);
        let mut missing = MissingCodesReport::new();
        let mut rec = record(MessageType::Mt202, Direction::Outgoing, Some("ACCESS BANK CAMEROON"));

        enricher.enrich(&mut rec, &mut missing);

        assert_eq!(rec.ordering_party_name.as_deref(), Some("ACCESS BANK CAMEROON"));
        assert!(missing.empty.is_empty());
    }

    #[test]
    fn test_outgoing_beneficiary_resolution() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);
        let mut missing = MissingCodesReport::new();

        let mut known = record(MessageType::Mt202, Direction::Outgoing, Some("ACCESS BANK"));
        known.beneficiary_code = Some("BEACCMCX".to_string());
        enricher.enrich(&mut known, &mut missing);
        assert_eq!(known.beneficiary.as_deref(), Some("BANQUE DES ETATS DE L'AFRIQUE CENTRALE"));

        let mut unknown = record(MessageType::Mt202, Direction::Outgoing, Some("ACCESS BANK"));
        unknown.beneficiary_code = Some("CITIUS33".to_string());
        enricher.enrich(&mut unknown, &mut missing);
        assert_eq!(unknown.beneficiary.as_deref(), Some("CITIUS33"));
        assert!(missing.unmapped.contains("CITIUS33"));
    }

    #[test]
    fn test_mt910_beneficiary_is_ordering_party() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);
        let mut missing = MissingCodesReport::new();
        let mut rec = record(MessageType::Mt910, Direction::Incoming, Some("SGCMCMCX"));
        rec.country = Some("FRA".to_string());

        enricher.enrich(&mut rec, &mut missing);

        assert_eq!(rec.beneficiary.as_deref(), Some("SOCIETE GENERALE CAMEROUN"));
        assert_eq!(rec.country.as_deref(), Some("CMR"));
    }

    #[test]
    fn test_enrichment_is_idempotent() {
        let snapshot = snapshot();
        let enricher = Enricher::new(&snapshot);

        for party in [Some("SGCMCMCX/SG"), Some("ECOCCMCX"), Some("ACCESS BANK"), None] {
            for direction in [Direction::Incoming, Direction::Outgoing] {
                let mut missing = MissingCodesReport::new();
                let mut rec = record(MessageType::Mt202, direction, party);
                rec.beneficiary_code = Some("CITIUS33".to_string());

                enricher.enrich(&mut rec, &mut missing);
                let (once, missing_once) = (rec.clone(), missing.clone());
                enricher.enrich(&mut rec, &mut missing);

                assert_eq!(rec, once);
                assert_eq!(missing, missing_once);
            }
        }
    }
}
