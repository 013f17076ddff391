use super::ArticleSource;
use crate::fetcher::Fetcher;
use crate::types::{Candidate, IdentifierKind, Result};
use async_trait::async_trait;
use chrono::{Duration, Local, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info};

const API_BASE: &str = "https://api.biorxiv.org/details/biorxiv";
const PAGE_SIZE: usize = 100;

/// Preprint source backed by the bioRxiv details API.
///
/// Queries `details/biorxiv/{start}/{end}/{cursor}` over a lookback window
/// and follows the cursor until the collection is exhausted.
pub struct BiorxivSource {
    fetcher: Arc<Fetcher>,
    lookback_days: i64,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    #[serde(default)]
    messages: Vec<DetailsMessage>,
    #[serde(default)]
    collection: Vec<DetailsRecord>,
}

#[derive(Debug, Deserialize)]
struct DetailsMessage {
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct DetailsRecord {
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    version: Option<String>,
}

impl BiorxivSource {
    pub fn new(fetcher: Arc<Fetcher>, lookback_days: i64) -> Self {
        Self {
            fetcher,
            lookback_days,
        }
    }

    fn window(&self) -> (NaiveDate, NaiveDate) {
        let today = Local::now().date_naive();
        (today - Duration::days(self.lookback_days), today)
    }

    fn content_url(record: &DetailsRecord) -> Option<String> {
        let doi = record.doi.as_deref().filter(|d| !d.is_empty())?;
        match record.version.as_deref().filter(|v| !v.is_empty()) {
            Some(version) => Some(format!("https://www.biorxiv.org/content/{doi}v{version}")),
            None => Some(format!("https://www.biorxiv.org/content/{doi}")),
        }
    }
}

#[async_trait]
impl ArticleSource for BiorxivSource {
    fn name(&self) -> &str {
        "biorxiv"
    }

    fn identifier_kind(&self) -> IdentifierKind {
        IdentifierKind::Url
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        let (start, end) = self.window();
        let mut candidates = Vec::new();
        let mut cursor = 0usize;

        loop {
            let url = format!("{API_BASE}/{start}/{end}/{cursor}");
            let page: DetailsResponse = self.fetcher.get_json(&url).await?;

            // Anything other than "ok" means the window has no (more) posts.
            let status_ok = page
                .messages
                .first()
                .map(|m| m.status.eq_ignore_ascii_case("ok"))
                .unwrap_or(true);
            if !status_ok {
                debug!("biorxiv reported no posts for {}..{}", start, end);
                break;
            }

            let fetched = page.collection.len();
            for record in &page.collection {
                candidates.push(Candidate {
                    title: record.title.clone(),
                    identifier: Self::content_url(record),
                });
            }

            if fetched < PAGE_SIZE {
                break;
            }
            cursor += fetched;
        }

        info!(
            "biorxiv window {}..{} yielded {} candidates",
            start,
            end,
            candidates.len()
        );
        Ok(candidates)
    }
}
