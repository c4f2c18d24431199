//! Magnitude extraction for ranking cells.

use super::FieldExtractor;
use super::patterns::{ANNOTATION, SCALED_MAGNITUDE};

/// Visitor-count extractor.
pub struct MagnitudeExtractor;

impl MagnitudeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MagnitudeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MagnitudeExtractor {
    type Output = u64;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        extract_integer(text)
    }
}

/// Extract the primary integer from a cell such as `"4,603,025 (2024) [10]"`
/// or `"5.7 million (FY 2024-25)"`.
///
/// Annotation groups are removed first so years and reference markers
/// never leak into the number.
pub fn extract_integer(raw: &str) -> Option<u64> {
    let segment = primary_segment(raw);

    if let Some(scaled) = parse_scaled(&segment) {
        return Some(scaled);
    }

    let digits: String = segment.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// Text with annotation groups removed and cut at any unterminated opener.
fn primary_segment(raw: &str) -> String {
    let stripped = ANNOTATION.replace_all(raw, " ");
    match stripped.find(['(', '[']) {
        Some(pos) => stripped[..pos].to_string(),
        None => stripped.into_owned(),
    }
}

/// "5.7 million" -> 5_700_000, using integer arithmetic only.
fn parse_scaled(segment: &str) -> Option<u64> {
    let caps = SCALED_MAGNITUDE.captures(segment)?;

    let scale: u128 = match caps[3].to_ascii_lowercase().as_str() {
        "thousand" => 1_000,
        "million" => 1_000_000,
        "billion" => 1_000_000_000,
        _ => return None,
    };

    let whole: u128 = caps[1].replace(',', "").parse().ok()?;
    let mut value = whole.checked_mul(scale)?;

    if let Some(frac) = caps.get(2) {
        let frac = frac.as_str();
        // Digits past the scale's precision cannot change the integer result
        let kept = &frac[..frac.len().min(9)];
        let numerator: u128 = kept.parse().ok()?;
        let denominator = 10u128.pow(kept.len() as u32);
        value = value.checked_add(numerator * scale / denominator)?;
    }

    u64::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_annotations_do_not_concatenate() {
        assert_eq!(extract_integer("4,603,025 (2024) [10]"), Some(4_603_025));
        assert_eq!(extract_integer("8,900,000[3]"), Some(8_900_000));
    }

    #[test]
    fn test_scaled_million() {
        assert_eq!(extract_integer("5.7 million (FY 2024-25)"), Some(5_700_000));
        assert_eq!(extract_integer("4.1 Million"), Some(4_100_000));
        assert_eq!(extract_integer("3 million"), Some(3_000_000));
        assert_eq!(extract_integer("1.25 billion"), Some(1_250_000_000));
        assert_eq!(extract_integer("850 thousand"), Some(850_000));
    }

    #[test]
    fn test_scale_word_inside_annotation_is_ignored() {
        // "million" only counts in the primary segment
        assert_eq!(extract_integer("2,100,000 (up 1.2 million)"), Some(2_100_000));
    }

    #[test]
    fn test_plain_and_spaced_numbers() {
        assert_eq!(extract_integer("8,900,000"), Some(8_900_000));
        assert_eq!(extract_integer("2 160 000"), Some(2_160_000));
        assert_eq!(extract_integer("2\u{a0}160\u{a0}000"), Some(2_160_000));
    }

    #[test]
    fn test_unterminated_annotation_truncates() {
        assert_eq!(extract_integer("3,100,000 (est. 2023"), Some(3_100_000));
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(extract_integer(""), None);
        assert_eq!(extract_integer("n/a"), None);
        assert_eq!(extract_integer("(2024)"), None);
    }

    #[test]
    fn test_overflow_is_absorbed() {
        assert_eq!(extract_integer("99999999999999999999999"), None);
    }

    #[test]
    fn test_extractor_trait() {
        let extractor = MagnitudeExtractor::new();
        assert_eq!(extractor.extract("6,770,000"), Some(6_770_000));
    }
}
