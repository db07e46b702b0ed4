//! Common regex patterns for SWIFT message text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Tag lines: `:20:VALUE` or printed `F20: Transaction Reference Number`
    pub static ref TAG_LINE: Regex = Regex::new(
        r"^\s*(?::(\d{2}[A-Za-z]?):|F(\d{2}[A-Za-z]?)\s*:)\s*(.*)$"
    ).unwrap();

    pub static ref SECTION_END: Regex = Regex::new(
        r"(?i)^\s*(?:Block\s*5|Message\s+Trailer|End\s+of\s+Message)\b"
    ).unwrap();

    // Segment boundaries
    pub static ref MESSAGE_COUNTER: Regex = Regex::new(
        r"(?i)^\s*Message\s+(?:N[°º]\s*)?\d+\b"
    ).unwrap();

    pub static ref IDENTIFIER_HEADER: Regex = Regex::new(
        r"(?i)^\s*(?:Identifier|Identifiant)\s*:?\s*fin\.\d{3}"
    ).unwrap();

    pub static ref UMI_HEADER: Regex = Regex::new(
        r"(?i)^\s*(?:Unique\s+Message\s+Identifier|Message\s+Identifier|UMI)\b"
    ).unwrap();

    pub static ref SENDER_LINE: Regex = Regex::new(
        r"(?i)^\s*Sender\s*:\s*(.*)$"
    ).unwrap();

    pub static ref REFERENCE_TAG_LINE: Regex = Regex::new(
        r"(?i)^\s*(?::20:|F20\b)"
    ).unwrap();

    // `***` / `---` rules between messages
    pub static ref SEPARATOR_LINE: Regex = Regex::new(
        r"^\s*(?:\*{3,}|-{3,})\s*$"
    ).unwrap();

    pub static ref UNDERSCORE_RULE: Regex = Regex::new(
        r"^\s*_{5,}\s*$"
    ).unwrap();

    pub static ref RECEIVER_LINE: Regex = Regex::new(
        r"(?i)^\s*Receiver(?:\s+Institution)?\s*(?::\s*(.*))?$"
    ).unwrap();

    // Message type tokens
    pub static ref IDENTIFIER_FIN: Regex = Regex::new(
        r"(?i)(?:Identifier|Identifiant)\s*[:\s]*fin\.(\d{3})(?:\.([A-Z0-9]+))?"
    ).unwrap();

    pub static ref MT_INLINE: Regex = Regex::new(
        r"(?i)\b(?:MT|FIN)[\s\-_.:/]*(\d{3})\b"
    ).unwrap();

    // References
    pub static ref REFERENCE_TOKEN: Regex = Regex::new(
        r"^[A-Z0-9/_\-]{3,}$"
    ).unwrap();

    pub static ref TRANSACTION_REFERENCE: Regex = Regex::new(
        r"(?i:Transaction\s+Reference)\s*:\s*([A-Za-z0-9/_\-]{3,})"
    ).unwrap();

    // Amounts: `.` decimal point, `,` or space grouping
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"(\d{1,3}(?:[, ]\d{3})+|\d+)\.(\d{2})"
    ).unwrap();

    pub static ref AMOUNT_LABEL: Regex = Regex::new(
        r"(?i)^\s*(?:Amount|Montant)\s*[:\-]\s*(.*)$"
    ).unwrap();

    // `:32A:` compact form: YYMMDD + currency + amount with comma decimal
    pub static ref SWIFT_SETTLEMENT: Regex = Regex::new(
        r"^\s*(\d{6})\s*([A-Z]{3})\s*(\d[\d.]*)(?:,(\d*))?\s*$"
    ).unwrap();

    // Dates
    pub static ref DATE_LABEL: Regex = Regex::new(
        r"(?i)\bDate\s*[:\s]\s*(\d{6})\b"
    ).unwrap();

    pub static ref YYMMDD: Regex = Regex::new(
        r"\b(\d{6})\b"
    ).unwrap();

    pub static ref VALUE_DATE_HEADER: Regex = Regex::new(
        r"(?i)Value\s+Date\s*[:\s]*([0-3]?\d)[/\-]([01]?\d)[/\-](\d{4}|\d{2})\b"
    ).unwrap();

    // Currencies
    pub static ref CURRENCY_LABEL: Regex = Regex::new(
        r"(?i)\b(?:Currency|Devise)\b"
    ).unwrap();

    pub static ref CURRENCY_TOKEN: Regex = Regex::new(
        r"\b([A-Z]{3})\b"
    ).unwrap();

    // Institutions and accounts
    pub static ref BIC_TOKEN: Regex = Regex::new(
        r"\b([A-Z]{6}[A-Z0-9]{2}(?:[A-Z0-9]{3})?)\b"
    ).unwrap();

    pub static ref BIC_EXACT: Regex = Regex::new(
        r"^[A-Z]{6}[A-Z0-9]{2}(?:[A-Z0-9]{3})?$"
    ).unwrap();

    pub static ref IDENTIFIER_CODE_LABEL: Regex = Regex::new(
        r"(?i)(?:IdentifierCode|Identifier\s+Code|Code\s+d'identifiant|Code\s+d\s+identifiant)\s*[:\-]?"
    ).unwrap();

    pub static ref ACCOUNT_LEADING: Regex = Regex::new(
        r"^\s*/?([A-Z]{2}[0-9A-Z]{8,34})\b"
    ).unwrap();

    pub static ref ACCOUNT_ANY: Regex = Regex::new(
        r"/?\b([A-Z]{2}[0-9A-Z]{8,34})\b"
    ).unwrap();

    // `:50F:` name sub-field and other structured sub-fields
    pub static ref NAME_SUBFIELD: Regex = Regex::new(
        r"(?i)^\s*/(?:34|NAME)/?\s*(.*)$"
    ).unwrap();

    pub static ref SUBFIELD_LINE: Regex = Regex::new(
        r"^\s*(?:/[A-Za-z0-9]+/|\d/)"
    ).unwrap();

    // `Word: ...` header lines of the printed layout
    pub static ref HEADER_LINE: Regex = Regex::new(
        r"^\s*[A-Za-z][A-Za-z \-']{1,40}:"
    ).unwrap();
}
