//! Batch orchestration: fetch feed pages month by month, extract, attach
//! route streams, assemble one immutable result batch.
//!
//! Strictly sequential. Entry-level extraction failures are logged and
//! skipped; a failed page fetch aborts the run.

use crate::config::RunConfig;
use crate::extract::{feed, stream};
use crate::fetch::throttle::Throttle;
use crate::fetch::PageFetcher;
use crate::model::ResultBatch;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, warn};

/// Run one batch: all requested months, then route streams for every
/// GPS-capable record.
pub async fn run(fetcher: &impl PageFetcher, config: &RunConfig) -> Result<ResultBatch> {
    let mut throttle = Throttle::new(config.delay_ms);
    let mut activities = Vec::new();

    for month in &config.months {
        throttle.wait().await;
        let html = fetcher
            .feed_page(&config.athlete_id, month)
            .await
            .with_context(|| format!("fetching feed page for month {month}"))?;

        let outcomes = feed::extract(&html, &config.athlete_id);
        let total = outcomes.len();
        let mut kept = 0usize;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(record) => {
                    kept += 1;
                    activities.push(record);
                }
                Err(e) => warn!("month {month}: dropped entry {index}: {e}"),
            }
        }
        info!("month {month}: extracted {kept} of {total} entries");
    }

    for record in activities.iter_mut().filter(|r| r.has_gps) {
        throttle.wait().await;
        let html = fetcher
            .route_page(&record.activity_id)
            .await
            .with_context(|| format!("fetching route page for activity {}", record.activity_id))?;

        match stream::extract_stream(&html) {
            Some(payload) => record.stream = Some(payload),
            None => info!("activity {}: no stream available", record.activity_id),
        }
    }

    Ok(ResultBatch::new(config.months.clone(), activities))
}

/// Serialize a finished batch to the output path as pretty-printed JSON.
pub fn write_batch(batch: &ResultBatch, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(batch).context("serializing result batch")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
    info!(
        "wrote {} activities to {}",
        batch.activities.len(),
        path.display()
    );
    Ok(())
}
