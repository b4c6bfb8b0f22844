//! Feed page extraction — the core of the scraper.
//!
//! Turns one activity-feed page into per-entry outcomes: either a fully
//! resolved [`ActivityRecord`] or the reason the entry was rejected. A
//! mandatory-field failure drops only its own entry; the rest of the page
//! is still processed.

use crate::extract::{select_one, select_optional, EntryError};
use crate::model::{ActivityRecord, Measurement, Pace};
use scraper::{ElementRef, Html, Selector};
use tracing::warn;

/// Class token marking a reduced feed entry without map/GPS data.
const REDUCED_VIEW_MARKER: &str = "min-view";

/// Icon class modifiers that never name an activity type.
const ICON_MODIFIERS: &[&str] = &["dark", "light", "lg", "md", "sm"];

/// Compiled selectors reused across every entry on a page.
struct Selectors {
    entry: Selector,
    timestamp: Selector,
    activity_link: Selector,
    time_item: Selector,
    icon: Selector,
    distance_item: Selector,
    pace_item: Selector,
    elevation_item: Selector,
}

impl Selectors {
    fn new() -> Self {
        let parse = |s: &str| Selector::parse(s).expect("selector is valid");
        Self {
            // Class-token matching is order-independent; an entry qualifies
            // iff its class set contains all three tokens.
            entry: parse(".activity.entity-details.feed-entry"),
            timestamp: parse("time.timestamp"),
            activity_link: parse(r#"a[href*="/activities/"]"#),
            time_item: parse(r#"li[title="Time"]"#),
            icon: parse("span.app-icon"),
            distance_item: parse(r#"li[title="Distance"]"#),
            pace_item: parse(r#"li[title="Pace"]"#),
            elevation_item: parse(r#"li[title="Elev Gain"]"#),
        }
    }
}

/// Extract every qualifying feed entry from one page of feed markup.
///
/// Outcomes come back in document order; the index of an outcome is the
/// entry's position among qualifying entries, which is all the identity a
/// failed entry has. Elements without the qualifying class set are
/// silently ignored.
pub fn extract(html: &str, athlete_id: &str) -> Vec<Result<ActivityRecord, EntryError>> {
    let selectors = Selectors::new();
    let document = Html::parse_document(html);

    document
        .select(&selectors.entry)
        .map(|entry| extract_entry(entry, athlete_id, &selectors))
        .collect()
}

/// Resolve all fields of a single entry, mandatory ones first.
fn extract_entry(
    entry: ElementRef<'_>,
    athlete_id: &str,
    sel: &Selectors,
) -> Result<ActivityRecord, EntryError> {
    let has_gps = !entry.value().classes().any(|c| c == REDUCED_VIEW_MARKER);

    let timestamp = select_one(entry, &sel.timestamp, "timestamp")?;
    let timestamp_start = timestamp
        .value()
        .attr("datetime")
        .ok_or_else(|| EntryError::Malformed {
            field: "timestamp",
            reason: "missing datetime attribute".to_string(),
        })?
        .to_string();

    let link = activity_link(entry, sel)?;
    let href = link.value().attr("href").unwrap_or("");
    let activity_id = href
        .split('/')
        .nth(2)
        .filter(|segment| !segment.is_empty())
        .ok_or_else(|| EntryError::Malformed {
            field: "activity link",
            reason: format!("no activity id in href {href:?}"),
        })?
        .to_string();
    let title = text_of(link);

    let time_item = select_one(entry, &sel.time_item, "elapsed time")?;
    let elapsed_time_minutes = elapsed_minutes(time_item)?;

    let activity_type = activity_type(entry, sel)?;

    let distance = select_optional(entry, &sel.distance_item, "distance")
        .and_then(|item| measurement(item, "distance"));
    let pace = select_optional(entry, &sel.pace_item, "pace").and_then(pace_field);
    let elevation_gain = select_optional(entry, &sel.elevation_item, "elevation gain")
        .and_then(|item| measurement(item, "elevation gain"));

    Ok(ActivityRecord {
        athlete_id: athlete_id.to_string(),
        activity_id,
        title,
        timestamp_start,
        elapsed_time_minutes,
        activity_type,
        has_gps,
        distance,
        pace,
        elevation_gain,
        stream: None,
    })
}

/// The detail-page link: targets `/activities/...` and carries an empty
/// class attribute, which distinguishes it from decorated variants like
/// share buttons. Exactly one must exist.
fn activity_link<'a>(
    entry: ElementRef<'a>,
    sel: &Selectors,
) -> Result<ElementRef<'a>, EntryError> {
    let mut plain = entry.select(&sel.activity_link).filter(|a| {
        a.value()
            .attr("class")
            .is_none_or(|class| class.trim().is_empty())
    });
    let Some(first) = plain.next() else {
        return Err(EntryError::StructuralAmbiguity {
            field: "activity link",
            found: 0,
        });
    };
    if plain.next().is_some() {
        return Err(EntryError::StructuralAmbiguity {
            field: "activity link",
            found: 2 + plain.count(),
        });
    }
    Ok(first)
}

/// Sum the alternating {number, unit} children of the Time list item.
///
/// The markup interleaves bare text nodes ("1", "30") with unit elements
/// whose `title` attribute names hour/minute/second. Total seconds are
/// converted to minutes, rounded to 2 decimals.
fn elapsed_minutes(item: ElementRef<'_>) -> Result<f64, EntryError> {
    let malformed = |reason: String| EntryError::Malformed {
        field: "elapsed time",
        reason,
    };

    enum Token {
        Number(u64),
        Unit(String),
    }

    let mut tokens = Vec::new();
    for child in item.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                continue;
            }
            let number = trimmed
                .parse::<u64>()
                .map_err(|_| malformed(format!("non-numeric token {trimmed:?}")))?;
            tokens.push(Token::Number(number));
        } else if let Some(element) = ElementRef::wrap(child) {
            let unit = element
                .value()
                .attr("title")
                .ok_or_else(|| malformed("unit element without title".to_string()))?;
            tokens.push(Token::Unit(unit.to_string()));
        }
    }

    if tokens.len() % 2 != 0 {
        return Err(malformed(format!(
            "expected number/unit pairs, found {} tokens",
            tokens.len()
        )));
    }

    let mut total_seconds = 0u64;
    for pair in tokens.chunks(2) {
        let [Token::Number(number), Token::Unit(unit)] = pair else {
            return Err(malformed("number/unit pairing out of order".to_string()));
        };
        let factor = match unit.as_str() {
            "hour" => 3600,
            "minute" => 60,
            "second" => 1,
            other => return Err(malformed(format!("unknown time unit {other:?}"))),
        };
        total_seconds += number * factor;
    }

    Ok(round2(total_seconds as f64 / 60.0))
}

/// Classify the activity from the entry's pure-icon element.
///
/// Text badges also carry `app-icon`; the activity icon is the one whose
/// rendered text is empty. Its type is the `icon-` class token that is
/// not a display modifier.
fn activity_type(entry: ElementRef<'_>, sel: &Selectors) -> Result<String, EntryError> {
    for icon in entry.select(&sel.icon) {
        if !text_of(icon).is_empty() {
            continue;
        }
        for class in icon.value().classes() {
            if let Some(kind) = class.strip_prefix("icon-") {
                if !kind.is_empty() && !ICON_MODIFIERS.contains(&kind) {
                    return Ok(kind.to_string());
                }
            }
        }
    }
    Err(EntryError::Malformed {
        field: "activity type",
        reason: "no icon class names an activity type".to_string(),
    })
}

/// Decode a two-part list item (value text + unit element) as a
/// measurement, stripping thousands separators. Malformed optional
/// content is logged and dropped, never fatal.
fn measurement(item: ElementRef<'_>, field: &str) -> Option<Measurement> {
    let (value, unit) = split_value_unit(item);
    let (Some(raw), Some(unit)) = (value, unit) else {
        warn!("{field} item is missing value or unit, omitting field");
        return None;
    };
    match raw.replace(',', "").parse::<f64>() {
        Ok(value) => Some(Measurement { value, unit }),
        Err(_) => {
            warn!("{field} value {raw:?} is not numeric, omitting field");
            None
        }
    }
}

/// Pace stays a source-formatted string, e.g. `7:30`.
fn pace_field(item: ElementRef<'_>) -> Option<Pace> {
    let (value, unit) = split_value_unit(item);
    let (Some(value), Some(unit)) = (value, unit) else {
        warn!("pace item is missing value or unit, omitting field");
        return None;
    };
    Some(Pace { value, unit })
}

/// Split a stat list item into its leading value text and the rendered
/// text of its unit element.
fn split_value_unit(item: ElementRef<'_>) -> (Option<String>, Option<String>) {
    let mut value = None;
    let mut unit = None;
    for child in item.children() {
        if let Some(text) = child.value().as_text() {
            let trimmed = text.trim();
            if !trimmed.is_empty() && value.is_none() {
                value = Some(trimmed.to_string());
            }
        } else if let Some(element) = ElementRef::wrap(child) {
            if unit.is_none() {
                let text = text_of(element);
                if !text.is_empty() {
                    unit = Some(text);
                }
            }
        }
    }
    (value, unit)
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
