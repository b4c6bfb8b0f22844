//! Typed records produced by feed extraction, and the batch output document.
//!
//! Optional fields are omitted from serialized output when absent, never
//! null-filled. Downstream consumers key off field presence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A dimensioned quantity read from a feed entry, e.g. `5.2 mi`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub value: f64,
    pub unit: String,
}

/// A pace reading kept in its source formatting, e.g. `7:30 /mi`.
///
/// The value is deliberately not decomposed into minutes and seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pace {
    pub value: String,
    pub unit: String,
}

/// One parsed feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// Profile being scraped. Supplied by the caller, not parsed.
    pub athlete_id: String,
    /// Site-unique activity identifier from the detail-page link.
    pub activity_id: String,
    /// Free-text title; empty is tolerated.
    pub title: String,
    /// Machine-readable datetime attribute, verbatim from the markup.
    pub timestamp_start: String,
    /// Elapsed time in minutes, rounded to 2 decimals.
    pub elapsed_time_minutes: f64,
    /// Activity type token derived from the entry's icon class, e.g. `run`.
    pub activity_type: String,
    /// False when the entry markup is a reduced view without map data.
    pub has_gps: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Measurement>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pace: Option<Pace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation_gain: Option<Measurement>,
    /// GPS stream payload from the route-detail page, attached post-hoc
    /// and passed through unmodified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream: Option<serde_json::Value>,
}

/// Output document for one run. Immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultBatch {
    #[serde(rename = "timestamp_generated")]
    pub generated_at: DateTime<Utc>,
    /// The requested month tokens, in input order.
    pub months_included: Vec<String>,
    /// Records in document order across all fetched pages.
    pub activities: Vec<ActivityRecord>,
}

impl ResultBatch {
    pub fn new(months_included: Vec<String>, activities: Vec<ActivityRecord>) -> Self {
        Self {
            generated_at: Utc::now(),
            months_included,
            activities,
        }
    }
}
