//! Chromium-backed page fetcher.
//!
//! Thin glue around the browser: launch, log in once through the login
//! form, then navigate and wait a fixed settle delay so client-side code
//! can populate the page before the markup is handed to the extractor.

use crate::fetch::{feed_url, route_url, PageFetcher};
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const LOGIN_URL: &str = "https://www.strava.com/login";

/// An authenticated browser session reused for every page of the run.
pub struct BrowserFetcher {
    browser: Browser,
    page: Page,
    event_loop: JoinHandle<()>,
    settle: Duration,
}

impl BrowserFetcher {
    /// Launch a browser and log in with the given credentials.
    ///
    /// The session cookie lives in the browser profile, so one login
    /// covers all subsequent navigations.
    pub async fn login(
        email: &str,
        password: &str,
        settle: Duration,
        headful: bool,
    ) -> Result<Self> {
        let mut builder = BrowserConfig::builder();
        if headful {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("browser config: {e}"))?;

        let (browser, mut events) = Browser::launch(config)
            .await
            .context("launching browser")?;
        let event_loop = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page(LOGIN_URL)
            .await
            .context("opening login page")?;
        page.wait_for_navigation().await?;

        page.find_element("#email")
            .await
            .context("locating email field")?
            .click()
            .await?
            .type_str(email)
            .await?;
        page.find_element("#password")
            .await
            .context("locating password field")?
            .click()
            .await?
            .type_str(password)
            .await?;
        page.find_element("#login-button")
            .await
            .context("locating login button")?
            .click()
            .await?;
        page.wait_for_navigation().await?;
        tokio::time::sleep(settle).await;
        info!("logged in");

        Ok(Self {
            browser,
            page,
            event_loop,
            settle,
        })
    }

    /// Navigate, let client-side content populate, return the markup.
    async fn rendered(&self, url: &str) -> Result<String> {
        debug!("fetching {url}");
        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigating to {url}"))?;
        tokio::time::sleep(self.settle).await;
        self.page.content().await.context("reading page content")
    }

    /// Close the browser and stop its event loop.
    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("closing browser")?;
        self.event_loop.abort();
        Ok(())
    }
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    async fn feed_page(&self, athlete_id: &str, month: &str) -> Result<String> {
        self.rendered(&feed_url(athlete_id, month)).await
    }

    async fn route_page(&self, activity_id: &str) -> Result<String> {
        self.rendered(&route_url(activity_id)).await
    }
}
