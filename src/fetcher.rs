use crate::types::{FetchConfig, Result, WatchError};
use backoff::{backoff::Backoff, exponential::ExponentialBackoff};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

/// Shared HTTP client for the upstream literature APIs.
///
/// Transient failures are retried with exponential backoff; callers further
/// up perform no retries of their own.
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .gzip(true)
            .build()?;

        Ok(Self { client, config })
    }

    /// GET `url` and deserialize the JSON response body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut backoff: ExponentialBackoff<backoff::SystemClock> = ExponentialBackoff {
            current_interval: Duration::from_secs(self.config.retry_delay_seconds),
            initial_interval: Duration::from_secs(self.config.retry_delay_seconds),
            max_interval: Duration::from_secs(self.config.retry_delay_seconds * 16),
            multiplier: 2.0,
            ..Default::default()
        };

        let mut last_error = None;
        for attempt in 0..=self.config.max_retries {
            match self.try_get_json(url).await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    warn!("attempt {} failed for {}: {}", attempt + 1, url, err);
                    last_error = Some(err);
                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| WatchError::Api(format!("request to {url} failed"))))
    }

    async fn try_get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::Api(format!(
                "HTTP {} from {}: {}",
                status, url, body
            )));
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body)
            .map_err(|e| WatchError::Parse(format!("invalid JSON from {url}: {e}")))
    }
}
