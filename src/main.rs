//! `paceline` — scrape a Strava athlete's activity feed into a JSON batch.

use anyhow::Result;
use clap::Parser;
use paceline::batch;
use paceline::config::RunConfig;
use paceline::fetch::browser::BrowserFetcher;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "paceline", version, about = "Scrape a Strava activity feed into a JSON batch")]
struct Args {
    /// Athlete profile to scrape (numeric Strava id).
    #[arg(long)]
    athlete_id: String,

    /// Month to fetch as a YYYYMM token, e.g. 202010. Repeatable.
    #[arg(long = "month", required = true)]
    months: Vec<String>,

    /// Account email used to log in.
    #[arg(long, env = "STRAVA_EMAIL")]
    email: String,

    /// Account password used to log in.
    #[arg(long, env = "STRAVA_PASSWORD", hide_env_values = true)]
    password: String,

    /// Output file for the result batch.
    #[arg(long, default_value = "activities.json")]
    output: PathBuf,

    /// Milliseconds to wait after navigation for client-side content.
    #[arg(long, default_value_t = 5_000)]
    settle_ms: u64,

    /// Minimum milliseconds between page fetches.
    #[arg(long, default_value_t = 2_000)]
    delay_ms: u64,

    /// Run the browser with a visible window.
    #[arg(long)]
    headful: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = RunConfig {
        athlete_id: args.athlete_id,
        months: args.months,
        email: args.email,
        password: args.password,
        output: args.output,
        settle_ms: args.settle_ms,
        delay_ms: args.delay_ms,
        headful: args.headful,
    };

    // Fatal before any browser launch or network activity.
    config.validate()?;

    let fetcher = BrowserFetcher::login(
        &config.email,
        &config.password,
        Duration::from_millis(config.settle_ms),
        config.headful,
    )
    .await?;

    let result = batch::run(&fetcher, &config).await;
    fetcher.close().await.ok();
    let batch = result?;

    batch::write_batch(&batch, &config.output)?;
    info!(
        "done: {} activities across {} months",
        batch.activities.len(),
        batch.months_included.len()
    );
    Ok(())
}
