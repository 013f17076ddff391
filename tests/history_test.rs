use chrono::NaiveDate;
use litwatch::{HistoryStore, WatchError};
use std::fs;
use tempfile::TempDir;

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn missing_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let store = HistoryStore::open(dir.path().join("pub_hist.csv"), 100).unwrap();
    assert!(store.is_empty());
    assert!(!store.contains("https://doi.org/10.1101/anything"));
}

#[test]
fn record_and_contains() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::open(dir.path().join("pub_hist.csv"), 100).unwrap();

    store.record("u1", date("2026-08-01")).unwrap();
    assert!(store.contains("u1"));
    assert!(!store.contains("u2"));
    assert_eq!(store.len(), 1);
}

#[test]
fn record_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::open(dir.path().join("pub_hist.csv"), 100).unwrap();

    store.record("u1", date("2026-08-01")).unwrap();
    store.record("u1", date("2026-08-02")).unwrap();

    assert!(store.contains("u1"));
    assert_eq!(store.len(), 1);
    // The original sighting date wins.
    assert_eq!(store.entries()[0].seen_on, date("2026-08-01"));
}

#[test]
fn growth_is_bounded_and_evicts_oldest() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::open(dir.path().join("pub_hist.csv"), 5).unwrap();

    for day in 1..=8 {
        let id = format!("u{day}");
        let when = date(&format!("2026-08-0{day}"));
        store.record(&id, when).unwrap();
    }

    assert_eq!(store.len(), 5);
    for day in 1..=3 {
        assert!(!store.contains(&format!("u{day}")), "u{day} should be evicted");
    }
    for day in 4..=8 {
        assert!(store.contains(&format!("u{day}")), "u{day} should remain");
    }
}

#[test]
fn entries_stay_date_ordered() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::open(dir.path().join("pub_hist.csv"), 100).unwrap();

    store.record("u3", date("2026-08-03")).unwrap();
    store.record("u1", date("2026-08-01")).unwrap();
    store.record("u2", date("2026-08-02")).unwrap();

    let dates: Vec<NaiveDate> = store.entries().iter().map(|e| e.seen_on).collect();
    assert!(dates.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn eviction_follows_dates_not_insertion_order() {
    let dir = TempDir::new().unwrap();
    let mut store = HistoryStore::open(dir.path().join("pub_hist.csv"), 2).unwrap();

    // Backfilled date is older than the ones inserted before it.
    store.record("u2", date("2026-08-02")).unwrap();
    store.record("u3", date("2026-08-03")).unwrap();
    store.record("u1", date("2026-08-01")).unwrap();

    assert_eq!(store.len(), 2);
    assert!(!store.contains("u1"));
    assert!(store.contains("u2"));
    assert!(store.contains("u3"));
}

#[test]
fn round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pub_hist.csv");

    let mut store = HistoryStore::open(&path, 100).unwrap();
    store.record("https://doi.org/10.1101/a", date("2026-08-01")).unwrap();
    store.record("https://www.biorxiv.org/content/10.1101/b", date("2026-08-02")).unwrap();
    let before: Vec<_> = store.entries().to_vec();

    let reopened = HistoryStore::open(&path, 100).unwrap();
    assert_eq!(reopened.entries(), before.as_slice());
}

#[test]
fn on_disk_format_is_identifier_seen_on_csv() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pub_hist.csv");

    let mut store = HistoryStore::open(&path, 100).unwrap();
    store.record("u1", date("2026-08-01")).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("identifier,seen_on"));
    assert_eq!(lines.next(), Some("u1,2026-08-01"));
}

#[test]
fn malformed_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pub_hist.csv");
    fs::write(&path, "identifier,seen_on\nu1,not-a-date\n").unwrap();

    let err = HistoryStore::open(&path, 100)
        .err()
        .expect("open should fail on malformed rows");
    assert!(matches!(err, WatchError::HistoryRead { .. }));
}
