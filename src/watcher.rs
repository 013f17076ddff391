use crate::history::HistoryStore;
use crate::notifier::Notify;
use crate::sources::ArticleSource;
use crate::types::{Candidate, IdentifierKind, Result, WatchError};
use tracing::{debug, error, info};

/// Per-run counters, logged once the run completes.
#[derive(Debug, Default, Clone)]
pub struct RunReport {
    pub candidates: usize,
    pub skipped: usize,
    pub already_seen: usize,
    pub notified: usize,
    pub failed_sources: usize,
}

/// Drives one run: pulls candidates from each source in turn, filters them
/// through the history store and notifies on novel ones.
pub struct Watcher {
    sources: Vec<Box<dyn ArticleSource>>,
    notifier: Box<dyn Notify>,
    history: HistoryStore,
}

impl Watcher {
    pub fn new(history: HistoryStore, notifier: Box<dyn Notify>) -> Self {
        Self {
            sources: Vec::new(),
            notifier,
            history,
        }
    }

    pub fn add_source(&mut self, source: Box<dyn ArticleSource>) {
        self.sources.push(source);
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Runs every source sequentially, never interleaved. A source fetch or
    /// delivery failure abandons the rest of that source and moves on to the
    /// next; a history persistence failure is fatal for the whole run.
    pub async fn run(&mut self) -> Result<RunReport> {
        let mut report = RunReport::default();

        for source in &self.sources {
            info!("processing source {}", source.name());
            match process_source(
                source.as_ref(),
                &mut self.history,
                self.notifier.as_ref(),
                &mut report,
            )
            .await
            {
                Ok(()) => {}
                Err(err @ WatchError::HistoryWrite { .. }) => {
                    error!("history persistence failed, aborting run: {}", err);
                    return Err(err);
                }
                Err(err) => {
                    report.failed_sources += 1;
                    error!("source {} aborted: {}", source.name(), err);
                }
            }
        }

        info!(
            "run complete: {} candidates, {} notified, {} already seen, {} skipped",
            report.candidates, report.notified, report.already_seen, report.skipped
        );
        Ok(report)
    }
}

/// Normalizes a raw candidate into `(title, identifier)`. `None` when either
/// field is missing or empty.
fn normalize(candidate: &Candidate, kind: IdentifierKind) -> Option<(String, String)> {
    let title = candidate
        .title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())?;
    let raw = candidate
        .identifier
        .as_deref()
        .map(str::trim)
        .filter(|i| !i.is_empty())?;

    let identifier = match kind {
        IdentifierKind::Url => raw.to_string(),
        IdentifierKind::Doi => format!("https://doi.org/{raw}"),
    };
    Some((title.to_string(), identifier))
}

async fn process_source(
    source: &dyn ArticleSource,
    history: &mut HistoryStore,
    notifier: &dyn Notify,
    report: &mut RunReport,
) -> Result<()> {
    let candidates = source.fetch_candidates().await?;
    report.candidates += candidates.len();

    for candidate in &candidates {
        let Some((title, identifier)) = normalize(candidate, source.identifier_kind()) else {
            debug!(
                "skipping malformed candidate from {}: {:?}",
                source.name(),
                candidate
            );
            report.skipped += 1;
            continue;
        };

        if history.contains(&identifier) {
            report.already_seen += 1;
            continue;
        }

        // Record only after delivery succeeds; a failed notification is
        // retried on the next run.
        notifier.notify(&title, &identifier).await?;
        history.record_today(&identifier)?;
        report.notified += 1;
        info!("notified: {} | {}", title, identifier);
    }

    Ok(())
}
