//! Canonical group identifiers from links and display text.

use percent_encoding::percent_decode_str;

use super::patterns::{ANNOTATION, WIKI_LINK};

/// Decode the article segment of a relative link.
///
/// `"/wiki/Krak%C3%B3w"` -> `"Kraków"`. Query strings and fragments are
/// dropped. Returns `None` for absent or non-article links and for
/// sequences that do not decode to UTF-8.
pub fn decode_link_target(href: Option<&str>) -> Option<String> {
    let caps = WIKI_LINK.captures(href?.trim())?;
    let decoded = percent_decode_str(&caps[1]).decode_utf8().ok()?;
    let decoded = decoded.trim();
    if decoded.is_empty() {
        None
    } else {
        Some(decoded.to_string())
    }
}

/// Join identifier from display text: `"Washington, D.C. [a]"` -> `"Washington"`,
/// `"New York City"` -> `"New_York_City"`.
pub fn slugify_group(text: &str) -> Option<String> {
    let stripped = ANNOTATION.replace_all(text, "");
    let head = stripped.split(',').next().unwrap_or_default().trim();
    if head.is_empty() {
        return None;
    }
    Some(head.split_whitespace().collect::<Vec<_>>().join("_"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_multibyte() {
        assert_eq!(
            decode_link_target(Some("/wiki/Krak%C3%B3w")),
            Some("Kraków".to_string())
        );
        assert_eq!(
            decode_link_target(Some("/wiki/S%C3%A3o_Paulo")),
            Some("São_Paulo".to_string())
        );
    }

    #[test]
    fn test_decode_plain_and_punctuated() {
        assert_eq!(decode_link_target(Some("/wiki/Paris")), Some("Paris".to_string()));
        assert_eq!(
            decode_link_target(Some("/wiki/Washington,_D.C.")),
            Some("Washington,_D.C.".to_string())
        );
    }

    #[test]
    fn test_decode_drops_fragment_and_query() {
        assert_eq!(
            decode_link_target(Some("/wiki/London#Culture")),
            Some("London".to_string())
        );
        assert_eq!(
            decode_link_target(Some("/wiki/Rome?oldid=1")),
            Some("Rome".to_string())
        );
    }

    #[test]
    fn test_decode_rejects_non_article_links() {
        assert_eq!(decode_link_target(None), None);
        assert_eq!(decode_link_target(Some("")), None);
        assert_eq!(decode_link_target(Some("https://example.org/wiki/Paris")), None);
        assert_eq!(
            decode_link_target(Some("/w/index.php?title=Nowhere&action=edit&redlink=1")),
            None
        );
        assert_eq!(decode_link_target(Some("/wiki/%FF%FE")), None);
    }

    #[test]
    fn test_slugify_group() {
        assert_eq!(slugify_group("New York City"), Some("New_York_City".to_string()));
        assert_eq!(slugify_group("Washington, D.C."), Some("Washington".to_string()));
        assert_eq!(slugify_group(" Paris [12] "), Some("Paris".to_string()));
        assert_eq!(slugify_group("Vatican City (Holy See)"), Some("Vatican_City".to_string()));
        assert_eq!(slugify_group("  "), None);
        assert_eq!(slugify_group("[1]"), None);
    }
}
