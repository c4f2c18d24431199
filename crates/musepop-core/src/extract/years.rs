//! Year extraction, inline (annotation) and dedicated-column variants.

use super::FieldExtractor;
use super::patterns::{ANNOTATED_YEAR, STANDALONE_YEAR};

/// Year from a parenthesized annotation inside a magnitude cell.
pub struct AnnotatedYearExtractor;

/// Year from a dedicated year column.
pub struct ColumnYearExtractor;

impl FieldExtractor for AnnotatedYearExtractor {
    type Output = i32;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        extract_year(text)
    }
}

impl FieldExtractor for ColumnYearExtractor {
    type Output = i32;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        extract_standalone_year(text)
    }
}

/// `"5.7 million (FY 2024-25)"` -> 2024, `"8,900,000 (2024)"` -> 2024.
///
/// Returns `None` when the text has no parenthesized year annotation.
pub fn extract_year(raw: &str) -> Option<i32> {
    ANNOTATED_YEAR
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
}

/// First run of exactly four digits: `"2024[3]"` -> 2024, `"2023–24"` -> 2023.
pub fn extract_standalone_year(raw: &str) -> Option<i32> {
    STANDALONE_YEAR
        .captures(raw)
        .and_then(|caps| caps[1].parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_annotated_year() {
        assert_eq!(extract_year("5.7 million (FY 2024-25)"), Some(2024));
        assert_eq!(extract_year("8,900,000 (2024)"), Some(2024));
        assert_eq!(extract_year("4,603,025 (2024) [10]"), Some(2024));
        assert_eq!(extract_year("3,000,000 ( fy2023 )"), Some(2023));
    }

    #[test]
    fn test_annotated_year_requires_parentheses() {
        assert_eq!(extract_year("8,900,000 2024"), None);
        assert_eq!(extract_year("8,900,000 [2024]"), None);
        assert_eq!(extract_year(""), None);
    }

    #[test]
    fn test_standalone_year() {
        assert_eq!(extract_standalone_year("2024"), Some(2024));
        assert_eq!(extract_standalone_year("2024[3]"), Some(2024));
        assert_eq!(extract_standalone_year("2023–24"), Some(2023));
        assert_eq!(extract_standalone_year("FY 2022/23"), Some(2022));
        assert_eq!(extract_standalone_year("123456"), None);
        assert_eq!(extract_standalone_year("n/a"), None);
    }

    #[test]
    fn test_extractors_agree_with_functions() {
        assert_eq!(AnnotatedYearExtractor.extract("1 (2019)"), Some(2019));
        assert_eq!(ColumnYearExtractor.extract("2019"), Some(2019));
    }
}
