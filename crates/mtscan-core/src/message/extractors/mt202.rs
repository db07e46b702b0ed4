//! MT202 general financial institution transfer.

use super::party::{self, field_parts, resolve_outgoing, sender_parts, PartyCandidate};
use super::{read_common_fields, read_ordering_party, ExtractContext, MessageExtractor, ParsedBlock};
use crate::message::rules::Placeholders;
use crate::models::{BlockRef, Direction, ExtractedRecord, MessageType};

/// Extractor for MT202 and MT202 COV.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mt202Extractor;

impl MessageExtractor for Mt202Extractor {
    fn message_type(&self) -> MessageType {
        MessageType::Mt202
    }

    fn extract(&self, block: &ParsedBlock<'_>, ctx: &ExtractContext<'_>, source: BlockRef) -> ExtractedRecord {
        let mut record = ExtractedRecord::new(self.message_type(), block.direction(), source);
        read_common_fields(block, ctx, &mut record);
        read_ordering_party(block, ctx, &mut record);

        // Incoming transfers report no beneficiary.
        if record.direction == Direction::Outgoing {
            record.beneficiary_code = block
                .fields()
                .get("58A")
                .and_then(|field| field_parts(field, None, ctx.placeholders).code);
        }

        record
    }
}

/// Outgoing ordering party: `Sender:` line against `:52D:`, falling back to
/// `:52A:` when neither is present.
pub(crate) fn ordering_party_outgoing(block: &ParsedBlock<'_>, placeholders: &Placeholders) -> Option<PartyCandidate> {
    let sender = sender_parts(block, placeholders);
    let tagged = block
        .fields()
        .get("52D")
        .map(|field| field_parts(field, None, placeholders))
        .unwrap_or_default();

    if sender.is_empty() && tagged.is_empty() {
        return party::ordering_institution(block, placeholders);
    }
    resolve_outgoing(sender, tagged, "52D")
}
