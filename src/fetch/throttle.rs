//! Fixed inter-request delay.
//!
//! A cooperative rate limit imposed by the source site. It spaces out
//! sequential page fetches and nothing more; there is no retry or backoff
//! behind it.

use std::time::Duration;
use tokio::time::Instant;

/// Enforces a minimum delay between consecutive requests.
pub struct Throttle {
    min_delay: Duration,
    last_request: Option<Instant>,
}

impl Throttle {
    pub fn new(min_delay_ms: u64) -> Self {
        Self {
            min_delay: Duration::from_millis(min_delay_ms),
            last_request: None,
        }
    }

    /// Wait until the minimum delay since the previous request has passed.
    /// The first call returns immediately.
    pub async fn wait(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.min_delay {
                tokio::time::sleep(self.min_delay - elapsed).await;
            }
        }
        self.last_request = Some(Instant::now());
    }
}
