//! Rule-based field extractors for SWIFT message text.

pub mod account;
pub mod amounts;
pub mod bic;
pub mod currency;
pub mod dates;
pub mod fields;
pub mod patterns;
pub mod placeholder;
pub mod reference;
pub mod settlement;

pub use account::AccountExtractor;
pub use amounts::{parse_swift_amount, AmountExtractor};
pub use bic::{bic_tokens, find_identifier_code, join_code_name, looks_like_bic, split_code_name};
pub use currency::{is_valid_currency, CurrencyExtractor, VALID_CURRENCIES};
pub use dates::{date_from_header, date_from_settlement, parse_yymmdd};
pub use fields::{parse_tag_line, Field, FieldMap};
pub use placeholder::{Placeholders, DEFAULT_PLACEHOLDERS};
pub use reference::{is_reference_token, reference_from_header, ReferenceExtractor};
pub use settlement::Settlement;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}
