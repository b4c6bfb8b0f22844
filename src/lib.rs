//! Paceline — batch scraper for Strava activity feeds.
//!
//! One run logs in through an automated browser session, fetches the feed
//! page for each requested month, extracts structured activity records
//! from the markup, optionally attaches per-activity GPS streams from the
//! route-detail pages, and writes a single JSON result batch.
//!
//! Fetching lives behind [`fetch::PageFetcher`]; everything in [`extract`]
//! is pure over the markup it is given.

pub mod batch;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod model;
