//! Page fetching: the trait seam the extractor sits behind, plus URL
//! construction for feed and route pages.

pub mod browser;
pub mod throttle;

use anyhow::Result;
use async_trait::async_trait;

pub const BASE_URL: &str = "https://www.strava.com";

/// Source of fully-rendered page markup.
///
/// Implementations must wait for client-side content population before
/// returning; the extractor only ever sees the settled document.
#[async_trait]
pub trait PageFetcher {
    /// Markup of one month of an athlete's activity feed.
    async fn feed_page(&self, athlete_id: &str, month: &str) -> Result<String>;

    /// Markup of one activity's route-detail page.
    async fn route_page(&self, activity_id: &str) -> Result<String>;
}

/// Feed URL for one month of an athlete's activities.
///
/// `month` is the combined `YYYYMM` token; the fragment drives the
/// client-side interval chart, which in turn populates the feed.
pub fn feed_url(athlete_id: &str, month: &str) -> String {
    format!(
        "{BASE_URL}/athletes/{athlete_id}#interval?interval={month}&interval_type=month&chart_type=hours&year_offset=0"
    )
}

/// Route-detail URL for one activity.
pub fn route_url(activity_id: &str) -> String {
    format!("{BASE_URL}/activities/{activity_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_url_carries_month_interval() {
        let url = feed_url("55006593", "202010");
        assert_eq!(
            url,
            "https://www.strava.com/athletes/55006593#interval?interval=202010&interval_type=month&chart_type=hours&year_offset=0"
        );
        assert!(url::Url::parse(&url).is_ok());
    }

    #[test]
    fn test_route_url() {
        assert_eq!(
            route_url("4152801918"),
            "https://www.strava.com/activities/4152801918"
        );
    }
}
