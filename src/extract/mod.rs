//! HTML extraction: feed entries and embedded route streams.
//!
//! Extraction is synchronous and pure over a parsed document; all fetching
//! happens elsewhere. Mandatory-field lookups go through [`select_one`] so
//! the "exactly one" cardinality rule is enforced in a single place.

pub mod feed;
pub mod stream;

use scraper::{ElementRef, Selector};
use thiserror::Error;
use tracing::warn;

/// Why extraction of a single feed entry was rejected.
///
/// Entry-level failures never abort the batch; the caller logs them with
/// the entry's position and moves on.
#[derive(Debug, Error)]
pub enum EntryError {
    /// A required unique element was found zero or more than one times.
    #[error("expected exactly one {field} element, found {found}")]
    StructuralAmbiguity { field: &'static str, found: usize },
    /// A mandatory element was found but its content could not be decoded.
    #[error("malformed {field}: {reason}")]
    Malformed { field: &'static str, reason: String },
}

/// Select exactly one descendant, or fail with the offending cardinality.
pub(crate) fn select_one<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    field: &'static str,
) -> Result<ElementRef<'a>, EntryError> {
    let mut matches = scope.select(selector);
    let Some(first) = matches.next() else {
        return Err(EntryError::StructuralAmbiguity { field, found: 0 });
    };
    if matches.next().is_some() {
        return Err(EntryError::StructuralAmbiguity {
            field,
            found: 2 + matches.count(),
        });
    }
    Ok(first)
}

/// Select an optional descendant.
///
/// Absence is expected and silent. A duplicate is logged and treated as
/// absent; optional fields never fail an entry.
pub(crate) fn select_optional<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    field: &'static str,
) -> Option<ElementRef<'a>> {
    let mut matches = scope.select(selector);
    let first = matches.next()?;
    if matches.next().is_some() {
        warn!("duplicate {field} element in entry, omitting field");
        return None;
    }
    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn doc(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    #[test]
    fn test_select_one_accepts_single_match() {
        let html = doc(r#"<div><time class="timestamp">x</time></div>"#);
        let root = html.root_element();
        let sel = Selector::parse("time.timestamp").unwrap();
        assert!(select_one(root, &sel, "timestamp").is_ok());
    }

    #[test]
    fn test_select_one_rejects_zero_matches() {
        let html = doc("<div><span>no time here</span></div>");
        let root = html.root_element();
        let sel = Selector::parse("time.timestamp").unwrap();
        match select_one(root, &sel, "timestamp") {
            Err(EntryError::StructuralAmbiguity { field, found }) => {
                assert_eq!(field, "timestamp");
                assert_eq!(found, 0);
            }
            other => panic!("expected StructuralAmbiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_select_one_rejects_multiple_matches() {
        let html = doc(
            r#"<div><time class="timestamp">a</time><time class="timestamp">b</time></div>"#,
        );
        let root = html.root_element();
        let sel = Selector::parse("time.timestamp").unwrap();
        match select_one(root, &sel, "timestamp") {
            Err(EntryError::StructuralAmbiguity { found, .. }) => assert_eq!(found, 2),
            other => panic!("expected StructuralAmbiguity, got {other:?}"),
        }
    }

    #[test]
    fn test_select_optional_absent_is_none() {
        let html = doc("<div></div>");
        let root = html.root_element();
        let sel = Selector::parse(r#"li[title="Distance"]"#).unwrap();
        assert!(select_optional(root, &sel, "distance").is_none());
    }

    #[test]
    fn test_select_optional_duplicate_is_omitted() {
        let html = doc(
            r#"<ul><li title="Distance">1</li><li title="Distance">2</li></ul>"#,
        );
        let root = html.root_element();
        let sel = Selector::parse(r#"li[title="Distance"]"#).unwrap();
        assert!(select_optional(root, &sel, "distance").is_none());
    }
}
