use super::ArticleSource;
use crate::fetcher::Fetcher;
use crate::types::{Candidate, IdentifierKind, Result};
use async_trait::async_trait;
use chrono::{Duration, Local};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

const EUTILS_BASE: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils";
const RETMAX: usize = 200;

/// Biomedical literature source backed by the NCBI Entrez E-utilities.
///
/// Two-step flow: `esearch` resolves the topic query to PMIDs, `esummary`
/// resolves PMIDs to titles and DOIs. Candidates carry the bare DOI; the
/// caller normalizes it into URL form.
pub struct PubmedSource {
    fetcher: Arc<Fetcher>,
    term: String,
    lookback_days: i64,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EsearchResponse {
    #[serde(rename = "esearchresult")]
    result: EsearchResult,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EsearchResult {
    idlist: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct EsummaryResponse {
    result: HashMap<String, Value>,
}

impl PubmedSource {
    pub fn new(
        fetcher: Arc<Fetcher>,
        term: String,
        lookback_days: i64,
        api_key: Option<String>,
    ) -> Self {
        Self {
            fetcher,
            term,
            lookback_days,
            api_key,
        }
    }

    /// Topic query restricted to the publication-date window, e.g.
    /// `C. elegans AND (2026/08/05[PDAT] : 2026/08/06[PDAT])`.
    fn search_term(&self) -> String {
        let today = Local::now().date_naive();
        let start = today - Duration::days(self.lookback_days);
        format!(
            "{} AND ({}[PDAT] : {}[PDAT])",
            self.term,
            start.format("%Y/%m/%d"),
            today.format("%Y/%m/%d")
        )
    }

    fn endpoint(&self, name: &str, params: &[(&str, String)]) -> Result<String> {
        let mut url = Url::parse(&format!("{EUTILS_BASE}/{name}"))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("db", "pubmed");
            query.append_pair("retmode", "json");
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("api_key", key);
            }
        }
        Ok(url.to_string())
    }
}

fn doi_of(record: &Value) -> Option<String> {
    record
        .get("articleids")?
        .as_array()?
        .iter()
        .find(|aid| aid.get("idtype").and_then(Value::as_str) == Some("doi"))
        .and_then(|aid| aid.get("value").and_then(Value::as_str))
        .map(str::to_string)
}

#[async_trait]
impl ArticleSource for PubmedSource {
    fn name(&self) -> &str {
        "pubmed"
    }

    fn identifier_kind(&self) -> IdentifierKind {
        IdentifierKind::Doi
    }

    async fn fetch_candidates(&self) -> Result<Vec<Candidate>> {
        let term = self.search_term();
        let search_url = self.endpoint(
            "esearch.fcgi",
            &[("term", term.clone()), ("retmax", RETMAX.to_string())],
        )?;
        let search: EsearchResponse = self.fetcher.get_json(&search_url).await?;

        let ids = search.result.idlist;
        if ids.is_empty() {
            info!("pubmed query {:?} matched no articles", term);
            return Ok(Vec::new());
        }
        debug!("pubmed esearch matched {} ids", ids.len());

        let summary_url = self.endpoint("esummary.fcgi", &[("id", ids.join(","))])?;
        let summary: EsummaryResponse = self.fetcher.get_json(&summary_url).await?;

        // Walk the id list rather than the summary map to keep esearch order.
        let mut candidates = Vec::with_capacity(ids.len());
        for id in &ids {
            let Some(record) = summary.result.get(id) else {
                continue;
            };
            candidates.push(Candidate {
                title: record
                    .get("title")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                identifier: doi_of(record),
            });
        }

        info!("pubmed query yielded {} candidates", candidates.len());
        Ok(candidates)
    }
}
