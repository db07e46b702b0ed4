//! MT103 single customer credit transfer.

use super::party::{self, first_name, resolve_outgoing, sender_parts, PartyCandidate, PartyParts};
use super::{read_common_fields, read_ordering_party, ExtractContext, MessageExtractor, ParsedBlock};
use crate::message::rules::bic::collapse;
use crate::message::rules::patterns::{NAME_SUBFIELD, SUBFIELD_LINE};
use crate::message::rules::{AccountExtractor, Field, FieldExtractor, Placeholders};
use crate::models::{BlockRef, Direction, ExtractedRecord, MessageType};

const ORDERING_CUSTOMER_TAGS: &[&str] = &["50F", "50K", "50A"];
const BENEFICIARY_TAGS: &[&str] = &["59", "59F", "59A"];
const INTERMEDIARY_TAGS: &[&str] = &["53A", "54A", "57A"];

/// Extractor for MT103.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mt103Extractor;

impl MessageExtractor for Mt103Extractor {
    fn message_type(&self) -> MessageType {
        MessageType::Mt103
    }

    fn extract(&self, block: &ParsedBlock<'_>, ctx: &ExtractContext<'_>, source: BlockRef) -> ExtractedRecord {
        let mut record = ExtractedRecord::new(self.message_type(), block.direction(), source);
        read_common_fields(block, ctx, &mut record);
        read_ordering_party(block, ctx, &mut record);

        if record.direction == Direction::Incoming {
            record.beneficiary = block
                .fields()
                .first_of(BENEFICIARY_TAGS)
                .and_then(|field| AccountExtractor::new().extract(&field.text()));
        }

        record
    }

    /// Transfers routed through a configured intermediary are not reported.
    fn exclusion(&self, block: &ParsedBlock<'_>, ctx: &ExtractContext<'_>) -> Option<String> {
        INTERMEDIARY_TAGS.iter().find_map(|tag| {
            let body = block.fields().get(tag)?.text().to_uppercase();
            ctx.config
                .excluded_intermediary_patterns
                .iter()
                .find(|pattern| !pattern.trim().is_empty() && body.contains(&pattern.to_uppercase()))
                .map(|pattern| format!(":{}: routes through {}", tag, pattern))
        })
    }
}

/// Ordering customer name from `:50F:`.
///
/// The name follows a `/34/` or `/NAME/` marker and continues until the
/// next structured sub-field, skipping blank and placeholder lines. Without
/// a marker the first readable line is used.
pub fn name_from_50f(field: &Field<'_>, placeholders: &Placeholders) -> Option<String> {
    let lines = field.lines();
    let marker = lines.iter().enumerate().find_map(|(idx, line)| {
        NAME_SUBFIELD
            .captures(line)
            .map(|caps| (idx, caps.get(1).map_or("", |m| m.as_str())))
    });
    let Some((idx, head)) = marker else {
        return first_name(&lines, placeholders);
    };

    let parts: Vec<String> = std::iter::once(head)
        .chain(
            lines
                .iter()
                .skip(idx + 1)
                .copied()
                .take_while(|line| !SUBFIELD_LINE.is_match(line)),
        )
        .map(str::trim)
        .filter(|line| placeholders.is_valid_name(line))
        .map(collapse)
        .collect();

    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Name of the ordering customer in whichever `:50x:` field is present.
fn ordering_customer_name(block: &ParsedBlock<'_>, placeholders: &Placeholders) -> Option<String> {
    let field = block.fields().first_of(ORDERING_CUSTOMER_TAGS)?;
    if field.tag == "50F" {
        name_from_50f(field, placeholders)
    } else {
        first_name(&field.lines(), placeholders)
    }
}

/// Incoming: ordering institution, else the ordering customer's name.
pub(crate) fn ordering_party_incoming(block: &ParsedBlock<'_>, placeholders: &Placeholders) -> Option<PartyCandidate> {
    party::ordering_institution(block, placeholders)
        .or_else(|| ordering_customer_name(block, placeholders).map(PartyCandidate::new))
}

/// Outgoing: `Sender:` line against the `:50F:` name.
pub(crate) fn ordering_party_outgoing(block: &ParsedBlock<'_>, placeholders: &Placeholders) -> Option<PartyCandidate> {
    let sender = sender_parts(block, placeholders);
    let tagged = PartyParts {
        code: None,
        name: block
            .fields()
            .get("50F")
            .and_then(|field| name_from_50f(field, placeholders)),
    };

    if sender.is_empty() && tagged.is_empty() {
        return ordering_party_incoming(block, placeholders);
    }
    resolve_outgoing(sender, tagged, "50F")
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{parse, run};
    use super::*;
    use crate::models::ExtractionConfig;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_50f_name_spans_lines() {
        let text = "Identifier: fin.103\n\
                    :20:PAY0001\n\
                    :50F:/CM2110005000010\n\
                    /34/MINISTERE DES FINANCES\n\
                    DU CAMEROUN\n\
                    2/AVENUE DU 20 MAI\n\
                    :59:/FR7630006000011234567890189\n";
        let record = run(text, Direction::Outgoing, MessageType::Mt103);
        assert_eq!(
            record.ordering_party.as_deref(),
            Some("MINISTERE DES FINANCES DU CAMEROUN")
        );
        assert_eq!(record.beneficiary, None);
    }

    #[test]
    fn test_50f_skips_placeholders() {
        let text = ":50F:/NAME/\nNAME AND ADDRESS\nCAMTEL SA\n:59:X";
        let block = parse(text, Direction::Outgoing);
        let field = block.fields().get("50F").unwrap();
        assert_eq!(name_from_50f(field, &Placeholders::default()).as_deref(), Some("CAMTEL SA"));
    }

    #[test]
    fn test_placeholder_only_name_stays_empty() {
        let text = ":50F:/34/IDENTIFIANT\n:59:X";
        let block = parse(text, Direction::Outgoing);
        let field = block.fields().get("50F").unwrap();
        assert_eq!(name_from_50f(field, &Placeholders::default()), None);
    }

    #[test]
    fn test_incoming_falls_back_to_50k_and_reads_account() {
        let text = "Identifier: fin.103\n\
                    :20:FT2401500001\n\
                    :50K:/0001234\n\
                    SOCIETE ANONYME DES BRASSERIES\n\
                    :59:/CM2110005000010123456789\n\
                    ETS KAMGA\n";
        let record = run(text, Direction::Incoming, MessageType::Mt103);
        assert_eq!(record.ordering_party.as_deref(), Some("SOCIETE ANONYME DES BRASSERIES"));
        assert_eq!(record.beneficiary.as_deref(), Some("CM2110005000010123456789"));
    }

    #[test]
    fn test_intermediary_exclusion() {
        let config = ExtractionConfig::default();
        let placeholders = Placeholders::default();
        let ctx = ExtractContext {
            placeholders: &placeholders,
            config: &config,
        };

        let routed = parse(":20:X1\n:57A:BANQUE DE FRANCE PARIS\n:59:Y", Direction::Incoming);
        let reason = Mt103Extractor.exclusion(&routed, &ctx).unwrap();
        assert!(reason.contains(":57A:"));

        let direct = parse(":20:X1\n:57A:SGCMCMCX\n:59:Y", Direction::Incoming);
        assert_eq!(Mt103Extractor.exclusion(&direct, &ctx), None);
    }
}
