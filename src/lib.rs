pub mod config;
pub mod fetcher;
pub mod history;
pub mod notifier;
pub mod sources;
pub mod types;
pub mod watcher;

pub use config::WatchConfig;
pub use fetcher::Fetcher;
pub use history::{HistoryEntry, HistoryStore, DEFAULT_MAX_ENTRIES};
pub use notifier::{ConsoleNotifier, Notify, SlackNotifier};
pub use sources::{ArticleSource, BiorxivSource, PubmedSource};
pub use types::{Candidate, FetchConfig, IdentifierKind, Result, WatchError};
pub use watcher::{RunReport, Watcher};
