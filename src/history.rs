use crate::types::{Result, WatchError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// One previously-notified article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub identifier: String,
    pub seen_on: NaiveDate,
}

/// Bounded, de-duplicated, date-ordered log of previously-seen article
/// identifiers, backed by a CSV file (`identifier,seen_on` header, ISO
/// dates).
///
/// The whole file is loaded at [`HistoryStore::open`], mutated in memory and
/// rewritten after every successful insertion. Entries stay in non-decreasing
/// `seen_on` order; once the store exceeds `max_entries`, the oldest entries
/// are evicted from the front. The store assumes a single writer and performs
/// no file locking.
pub struct HistoryStore {
    path: PathBuf,
    max_entries: usize,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    /// Loads all entries from the CSV file at `path`. A missing file yields
    /// an empty store; unparseable rows are an error the operator has to
    /// resolve.
    pub fn open(path: impl Into<PathBuf>, max_entries: usize) -> Result<Self> {
        let path = path.into();
        let mut entries = Vec::new();

        if path.exists() {
            let read_error = |reason: String| WatchError::HistoryRead {
                path: path.clone(),
                reason,
            };
            let mut reader = csv::Reader::from_path(&path).map_err(|e| read_error(e.to_string()))?;
            for row in reader.deserialize() {
                let entry: HistoryEntry = row.map_err(|e| read_error(e.to_string()))?;
                entries.push(entry);
            }
            entries.sort_by_key(|e| e.seen_on);
        }

        debug!(
            "opened history store at {} with {} entries",
            path.display(),
            entries.len()
        );
        Ok(Self {
            path,
            max_entries,
            entries,
        })
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.entries.iter().any(|e| e.identifier == identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in non-decreasing `seen_on` order.
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Records a newly-seen identifier and flushes the whole store to disk.
    /// Already-known identifiers are a no-op.
    ///
    /// Sorting happens before truncation so that eviction always drops the
    /// least recently *seen* entries, even if dates were backfilled out of
    /// insertion order. On a failed write the in-memory state still reflects
    /// the attempted change.
    pub fn record(&mut self, identifier: &str, when: NaiveDate) -> Result<()> {
        if self.contains(identifier) {
            return Ok(());
        }

        self.entries.push(HistoryEntry {
            identifier: identifier.to_string(),
            seen_on: when,
        });
        self.entries.sort_by_key(|e| e.seen_on);
        if self.entries.len() > self.max_entries {
            let excess = self.entries.len() - self.max_entries;
            self.entries.drain(..excess);
        }

        self.persist()
    }

    /// [`HistoryStore::record`] stamped with the local calendar date.
    pub fn record_today(&mut self, identifier: &str) -> Result<()> {
        self.record(identifier, Local::now().date_naive())
    }

    fn persist(&self) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path).map_err(|e| self.write_error(e))?;
        for entry in &self.entries {
            writer.serialize(entry).map_err(|e| self.write_error(e))?;
        }
        writer.flush().map_err(|e| WatchError::HistoryWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_error(&self, err: csv::Error) -> WatchError {
        let source = match err.into_kind() {
            csv::ErrorKind::Io(io) => io,
            other => std::io::Error::new(std::io::ErrorKind::Other, format!("{other:?}")),
        };
        WatchError::HistoryWrite {
            path: self.path.clone(),
            source,
        }
    }
}
