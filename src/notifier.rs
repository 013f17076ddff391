use crate::types::{Result, WatchError};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const WEBHOOK_BASE: &str = "https://hooks.slack.com/services/";

/// Delivers one notification per newly-discovered article.
#[async_trait]
pub trait Notify: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    async fn notify(&self, title: &str, identifier: &str) -> Result<()>;
}

/// Posts a Block Kit message to a Slack incoming webhook.
pub struct SlackNotifier {
    client: Client,
    webhook_url: String,
}

impl SlackNotifier {
    /// `webhook` is either the full incoming-webhook URL or just the
    /// `T…/B…/…` path fragment.
    pub fn new(webhook: &str, timeout_seconds: u64) -> Result<Self> {
        let webhook_url = if webhook.starts_with("http://") || webhook.starts_with("https://") {
            webhook.to_string()
        } else {
            format!("{WEBHOOK_BASE}{webhook}")
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            webhook_url,
        })
    }
}

#[async_trait]
impl Notify for SlackNotifier {
    fn name(&self) -> &str {
        "slack"
    }

    async fn notify(&self, title: &str, identifier: &str) -> Result<()> {
        let payload = json!({
            "blocks": [{
                "type": "section",
                "text": {
                    "type": "mrkdwn",
                    "text": format!("*{title}*\n{identifier}"),
                }
            }]
        });

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::Notification(format!(
                "slack webhook returned {}: {}",
                status, body
            )));
        }

        debug!("posted notification for {}", identifier);
        Ok(())
    }
}

/// Prints the notification to stdout. Selected when no webhook is configured
/// or `--dry-run` is passed.
pub struct ConsoleNotifier;

#[async_trait]
impl Notify for ConsoleNotifier {
    fn name(&self) -> &str {
        "console"
    }

    async fn notify(&self, title: &str, identifier: &str) -> Result<()> {
        println!("*{title}*\n{identifier}");
        Ok(())
    }
}
