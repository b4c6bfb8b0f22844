//! Route-detail page extraction: the embedded GPS stream payload.
//!
//! Route pages embed their data as a JSON script tag. The payload is
//! opaque to us; whatever sits under the stream field is passed through
//! unmodified and attached to the owning record.

use scraper::{Html, Selector};
use tracing::{debug, warn};

/// The embedded application-data container on a route page.
const CONTAINER_SELECTOR: &str = r#"script#activity-stream-data[type="application/json"]"#;

/// Field of the decoded payload that carries the GPS/activity stream.
const STREAM_FIELD: &str = "stream";

/// Extract the embedded GPS stream from a route-detail page.
///
/// Returns `None` when the page carries no usable stream. GPS data is
/// inherently optional, so a missing container, a missing stream field,
/// or an undecodable payload all mean "no stream", not an error.
pub fn extract_stream(html: &str) -> Option<serde_json::Value> {
    let selector = Selector::parse(CONTAINER_SELECTOR).expect("selector is valid");
    let document = Html::parse_document(html);

    let Some(container) = document.select(&selector).next() else {
        debug!("route page has no embedded stream container");
        return None;
    };

    let text = container.text().collect::<String>();
    let payload: serde_json::Value = match serde_json::from_str(text.trim()) {
        Ok(value) => value,
        Err(e) => {
            warn!("embedded stream payload is not valid JSON: {e}");
            return None;
        }
    };

    match payload.get(STREAM_FIELD) {
        Some(stream) => Some(stream.clone()),
        None => {
            debug!("embedded payload has no {STREAM_FIELD:?} field");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn route_page(script: &str) -> String {
        format!("<html><body><div class=\"activity-map\"></div>{script}</body></html>")
    }

    #[test]
    fn test_stream_extracted_from_container() {
        let html = route_page(
            r#"<script id="activity-stream-data" type="application/json">
                {"stream": {"latlng": [[37.77, -122.41], [37.78, -122.42]], "altitude": [5.0, 7.2]}}
            </script>"#,
        );
        let stream = extract_stream(&html).expect("stream should be present");
        assert_eq!(
            stream,
            json!({"latlng": [[37.77, -122.41], [37.78, -122.42]], "altitude": [5.0, 7.2]})
        );
    }

    #[test]
    fn test_missing_container_is_no_stream() {
        assert!(extract_stream("<html><body>no data here</body></html>").is_none());
    }

    #[test]
    fn test_wrong_container_id_is_no_stream() {
        let html = route_page(
            r#"<script id="segment-data" type="application/json">{"stream": []}</script>"#,
        );
        assert!(extract_stream(&html).is_none());
    }

    #[test]
    fn test_wrong_content_type_is_no_stream() {
        let html = route_page(
            r#"<script id="activity-stream-data" type="text/javascript">var x = 1;</script>"#,
        );
        assert!(extract_stream(&html).is_none());
    }

    #[test]
    fn test_payload_without_stream_field_is_no_stream() {
        let html = route_page(
            r#"<script id="activity-stream-data" type="application/json">{"segments": []}</script>"#,
        );
        assert!(extract_stream(&html).is_none());
    }

    #[test]
    fn test_undecodable_payload_is_no_stream() {
        let html = route_page(
            r#"<script id="activity-stream-data" type="application/json">{not json</script>"#,
        );
        assert!(extract_stream(&html).is_none());
    }
}
