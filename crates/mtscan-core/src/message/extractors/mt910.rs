//! MT910 confirmation of credit.

use super::{read_common_fields, read_ordering_party, ExtractContext, MessageExtractor, ParsedBlock};
use crate::directory::normalize_code;
use crate::message::rules::{bic_tokens, find_identifier_code};
use crate::models::{BlockRef, ExtractedRecord, MessageType};

const APPLICANT_TAGS: &[&str] = &["50A", "50F", "50K"];

/// Extractor for MT910.
///
/// The beneficiary of a credit confirmation is the ordering institution
/// itself; it is filled in once that party has been resolved.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mt910Extractor;

impl MessageExtractor for Mt910Extractor {
    fn message_type(&self) -> MessageType {
        MessageType::Mt910
    }

    fn extract(&self, block: &ParsedBlock<'_>, ctx: &ExtractContext<'_>, source: BlockRef) -> ExtractedRecord {
        let mut record = ExtractedRecord::new(self.message_type(), block.direction(), source);
        read_common_fields(block, ctx, &mut record);
        read_ordering_party(block, ctx, &mut record);
        record
    }

    /// Credits ordered by a reserved applicant are internal transfers.
    fn exclusion(&self, block: &ParsedBlock<'_>, ctx: &ExtractContext<'_>) -> Option<String> {
        let field = block.fields().first_of(APPLICANT_TAGS)?;
        let lines = field.lines();
        let code = find_identifier_code(&lines, ctx.placeholders)
            .or_else(|| bic_tokens(&field.text(), ctx.placeholders).next().map(str::to_string))?;
        let code = normalize_code(&code);

        ctx.config
            .excluded_applicant_codes
            .iter()
            .any(|excluded| normalize_code(excluded) == code)
            .then(|| format!("applicant :{}: is reserved code {}", field.tag, code))
    }
}
