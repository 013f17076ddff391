use anyhow::Context;
use clap::Parser;
use litwatch::{
    BiorxivSource, ConsoleNotifier, Fetcher, HistoryStore, Notify, PubmedSource, SlackNotifier,
    WatchConfig, Watcher,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "litwatch",
    about = "Watch bioRxiv and PubMed for new articles and notify once per discovery"
)]
struct Cli {
    /// Path of the CSV history file
    #[arg(long)]
    history_file: Option<PathBuf>,

    /// Topic query for the PubMed search
    #[arg(long)]
    term: Option<String>,

    /// Maximum number of history entries to retain
    #[arg(long)]
    max_entries: Option<usize>,

    /// Lookback window for the bioRxiv search, in days
    #[arg(long)]
    biorxiv_days: Option<i64>,

    /// Print notifications instead of posting to Slack
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut config = WatchConfig::from_env();
    if let Some(path) = cli.history_file {
        config.history_file = path;
    }
    if let Some(term) = cli.term {
        config.term = term;
    }
    if let Some(max) = cli.max_entries {
        config.max_entries = max;
    }
    if let Some(days) = cli.biorxiv_days {
        config.biorxiv_days = days;
    }

    info!(
        "starting litwatch (term: {:?}, history: {})",
        config.term,
        config.history_file.display()
    );

    let history = HistoryStore::open(&config.history_file, config.max_entries)
        .context("failed to open history store")?;

    let notifier: Box<dyn Notify> = match (&config.slack_webhook, cli.dry_run) {
        (Some(webhook), false) => Box::new(SlackNotifier::new(
            webhook,
            config.fetch.timeout_seconds,
        )?),
        _ => Box::new(ConsoleNotifier),
    };
    info!("using {} notifier", notifier.name());

    let fetcher = Arc::new(Fetcher::new(config.fetch.clone())?);
    let mut watcher = Watcher::new(history, notifier);
    watcher.add_source(Box::new(BiorxivSource::new(
        fetcher.clone(),
        config.biorxiv_days,
    )));
    watcher.add_source(Box::new(PubmedSource::new(
        fetcher,
        config.term.clone(),
        config.pubmed_days,
        config.ncbi_api_key.clone(),
    )));

    let report = watcher.run().await.context("run aborted")?;
    info!(
        "done: {} new article(s) out of {} candidate(s)",
        report.notified, report.candidates
    );
    Ok(())
}
