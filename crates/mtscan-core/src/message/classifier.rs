//! Message type classification.

use super::rules::patterns::{IDENTIFIER_FIN, MT_INLINE};
use crate::models::MessageType;

/// Categorical classification of a block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub message_type: MessageType,
    /// Type suffix such as `COV` in `fin.202.COV`.
    pub variant: Option<String>,
}

impl Classification {
    fn unknown() -> Self {
        Self {
            message_type: MessageType::Unknown,
            variant: None,
        }
    }
}

/// Classify a block by its message-type token.
///
/// An `Identifier: fin.NNN[.VARIANT]` header is authoritative; otherwise the
/// first inline `MT NNN` / `fin.NNN` token decides. Series other than 202,
/// 103 and 910 are unknown.
pub fn classify(text: &str) -> Classification {
    if let Some(caps) = IDENTIFIER_FIN.captures(text) {
        let message_type = MessageType::from_series(&caps[1]);
        if !message_type.is_known() {
            return Classification::unknown();
        }
        return Classification {
            message_type,
            variant: caps.get(2).map(|m| m.as_str().to_uppercase()),
        };
    }

    match MT_INLINE.captures(text) {
        Some(caps) => Classification {
            message_type: MessageType::from_series(&caps[1]),
            variant: None,
        },
        None => Classification::unknown(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifier_header() {
        let c = classify("Message 1\nIdentifier: fin.910\n:20:X");
        assert_eq!(c.message_type, MessageType::Mt910);
        assert_eq!(c.variant, None);
    }

    #[test]
    fn test_cov_variant() {
        let c = classify("Identifier: fin.202.COV\nSender: X");
        assert_eq!(c.message_type, MessageType::Mt202);
        assert_eq!(c.variant.as_deref(), Some("COV"));
    }

    #[test]
    fn test_inline_tokens() {
        assert_eq!(classify("SWIFT MT103 single customer").message_type, MessageType::Mt103);
        assert_eq!(classify("type: MT-202").message_type, MessageType::Mt202);
        assert_eq!(classify("FIN 910").message_type, MessageType::Mt910);
    }

    #[test]
    fn test_header_wins_over_inline_token() {
        let c = classify("Related MT103 payment\nIdentifier: fin.202");
        assert_eq!(c.message_type, MessageType::Mt202);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("Identifier: fin.950").message_type, MessageType::Unknown);
        assert_eq!(classify("MT940 statement").message_type, MessageType::Unknown);
        assert_eq!(classify("no type here").message_type, MessageType::Unknown);
        assert!(!classify("MINISTERE DES FINANCES 2024").message_type.is_known());
    }
}
