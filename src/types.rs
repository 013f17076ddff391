use std::path::PathBuf;

/// Raw article record as returned by an upstream source, prior to dedup
/// filtering. Either field may be missing or empty in upstream data; such
/// candidates are discarded downstream.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub title: Option<String>,
    pub identifier: Option<String>,
}

/// How a source keys its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    /// The identifier is already a resolvable URL.
    Url,
    /// The identifier is a bare DOI and must be normalized to a doi.org URL
    /// before use as a history key.
    Doi,
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_delay_seconds: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "litwatch/0.1".to_string(),
            timeout_seconds: 30,
            max_retries: 3,
            retry_delay_seconds: 2,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("history data at {path} is malformed: {reason}")]
    HistoryRead { path: PathBuf, reason: String },

    #[error("failed to persist history to {path}: {source}")]
    HistoryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("notification delivery failed: {0}")]
    Notification(String),

    #[error("upstream API error: {0}")]
    Api(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, WatchError>;
