//! Sheet export download.
//! Plain GET of the published CSV; retried a couple of times on network or
//! HTTP errors before the build is aborted.

use std::time::Duration;

use reqwest::Client;

use crate::error::BuildError;

const MAX_FETCH_RETRIES: u32 = 2;
const TIMEOUT_SECS: u64 = 30;
const RETRY_DELAY_MS: u64 = 500;

fn fetch_error(url: &str, reason: impl ToString) -> BuildError {
    BuildError::Fetch {
        url: url.to_string(),
        reason: reason.to_string(),
    }
}

async fn fetch_once(client: &Client, url: &str) -> Result<String, BuildError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| fetch_error(url, e))?;

    if !response.status().is_success() {
        return Err(fetch_error(url, format!("HTTP {}", response.status())));
    }

    response.text().await.map_err(|e| fetch_error(url, e))
}

/// Downloads the lookup sheet as text.
pub async fn fetch_lookup_text(url: &str) -> Result<String, BuildError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .build()
        .map_err(|e| fetch_error(url, e))?;

    let mut last_error = None;
    for attempt in 1..=MAX_FETCH_RETRIES + 1 {
        match fetch_once(&client, url).await {
            Ok(text) => return Ok(text),
            Err(e) => {
                log::warn!(
                    "lookup fetch attempt {}/{} failed: {}",
                    attempt,
                    MAX_FETCH_RETRIES + 1,
                    e
                );
                last_error = Some(e);
                if attempt <= MAX_FETCH_RETRIES {
                    tokio::time::sleep(Duration::from_millis(RETRY_DELAY_MS)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| fetch_error(url, "no attempts made")))
}
