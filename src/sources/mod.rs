pub mod biorxiv;
pub mod pubmed;

pub use biorxiv::BiorxivSource;
pub use pubmed::PubmedSource;

use crate::types::{Candidate, IdentifierKind, Result};
use async_trait::async_trait;

/// A remote literature service that can be polled for candidate articles.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Name used in logs and reports.
    fn name(&self) -> &str;

    /// How this source keys its candidates.
    fn identifier_kind(&self) -> IdentifierKind;

    /// Fetch the current window of candidates. Upstream order is preserved
    /// downstream.
    async fn fetch_candidates(&self) -> Result<Vec<Candidate>>;
}
