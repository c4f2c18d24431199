//! Common regex patterns for cell text extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Closed annotation groups: "(2024)", "(FY 2024-25)", "[10]"
    pub static ref ANNOTATION: Regex = Regex::new(
        r"\([^)]*\)|\[[^\]]*\]"
    ).unwrap();

    // Footnote/reference markers only
    pub static ref FOOTNOTE: Regex = Regex::new(
        r"\[[^\]]*\]"
    ).unwrap();

    // Decimal magnitude with a unit word: "5.7 million", "1,200 thousand"
    pub static ref SCALED_MAGNITUDE: Regex = Regex::new(
        r"(?i)(\d{1,3}(?:,\d{3})+|\d+)(?:\.(\d+))?\s*(thousand|million|billion)\b"
    ).unwrap();

    // Year inside a parenthesized annotation, optionally fiscal: "(2024)", "(FY 2024-25)"
    pub static ref ANNOTATED_YEAR: Regex = Regex::new(
        r"(?i)\(\s*(?:FY\s*)?(\d{4})\b"
    ).unwrap();

    // First run of exactly four digits
    pub static ref STANDALONE_YEAR: Regex = Regex::new(
        r"(?:^|\D)(\d{4})(?:\D|$)"
    ).unwrap();

    // Relative article link: "/wiki/Krak%C3%B3w#History"
    pub static ref WIKI_LINK: Regex = Regex::new(
        r"^/wiki/([^?#]+)"
    ).unwrap();

    // Wikibase timestamp: "+2020-01-01T00:00:00Z"
    pub static ref SIGNED_TIMESTAMP: Regex = Regex::new(
        r"^([+-])(\d{4,})-(\d{2})-(\d{2})"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(
        r"\s+"
    ).unwrap();
}
