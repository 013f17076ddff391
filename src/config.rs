use crate::history::DEFAULT_MAX_ENTRIES;
use crate::types::FetchConfig;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_HISTORY_FILE: &str = "pub_hist.csv";
pub const DEFAULT_TERM: &str = "C. elegans";

/// Runtime configuration for one run, assembled from defaults, the process
/// environment and command-line overrides.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub history_file: PathBuf,
    pub max_entries: usize,
    /// Topic query for the PubMed search.
    pub term: String,
    pub biorxiv_days: i64,
    pub pubmed_days: i64,
    /// Slack incoming webhook; absent means notifications go to stdout.
    pub slack_webhook: Option<String>,
    pub ncbi_api_key: Option<String>,
    pub fetch: FetchConfig,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            history_file: PathBuf::from(DEFAULT_HISTORY_FILE),
            max_entries: DEFAULT_MAX_ENTRIES,
            term: DEFAULT_TERM.to_string(),
            biorxiv_days: 2,
            pubmed_days: 1,
            slack_webhook: None,
            ncbi_api_key: None,
            fetch: FetchConfig::default(),
        }
    }
}

impl WatchConfig {
    /// Layers environment values over the defaults. Webhook absence is not
    /// validated here; it just selects the console notifier.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.slack_webhook = env::var("SLACK_WEBHOOK").ok().filter(|v| !v.is_empty());
        config.ncbi_api_key = env::var("NCBI_API_KEY").ok().filter(|v| !v.is_empty());
        config
    }
}
