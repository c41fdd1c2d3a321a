//! QA tests for folder-level statistics.
//!
//! These tests build scratch transcript folders and run full computations.
//! Run with: `cargo test -p insider-core --test qa_folder`

use insider_core::testing::{sample_config, write_transcripts, TranscriptBuilder};
use insider_core::{compute_stats, Insider, InsiderConfig, Scope, StatsError};
use std::fs;
use tempfile::TempDir;

fn folder(docs: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().expect("Failed to create temp directory");
    write_transcripts(dir.path(), docs).expect("Failed to write transcripts");
    dir
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_brawl_file() {
    let dir = folder(&[("2026-01-01.txt", "Kal hit John! John hit Kal!")]);
    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");

    assert_eq!(stats.files.len(), 1);
    let file = &stats.files[0];
    assert_eq!(file.date, "2026-01-01");
    assert_eq!(file.mentions_of("kal"), 2);
    assert_eq!(file.mentions_of("john"), 2);
    assert_eq!(file.mentions_of("ciel"), 0);
    assert!(file.tension > 0);

    assert_eq!(stats.pair_count("john", "kal"), 1);
    assert_eq!(stats.pairs.len(), 1);
    assert!(stats.trios.is_empty());
    assert_eq!(stats.trend.len(), 1);
    assert_eq!(stats.trend_for("kal"), vec![2]);
}

#[test]
fn test_dash_separated_sessions() {
    let text = TranscriptBuilder::new()
        .line("Kal smiled and laughed with Ciel.")
        .session()
        .line("Jax screamed! Blood everywhere!")
        .build();
    let dir = folder(&[("log.txt", text.as_str())]);
    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");

    let file = &stats.files[0];
    assert_eq!(file.session_count(), 2);
    assert_eq!(file.sessions[0].mood.positive, 2);
    assert_eq!(file.sessions[0].mood.negative, 0);
    assert_eq!(file.sessions[1].mood.negative, 2);
    assert!(file.sessions[1].tension > file.sessions[0].tension);
    assert_eq!(file.sessions[1].mentions["jax"], 1);
    assert_eq!(file.sessions[1].mentions["kal"], 0);
    assert_eq!(stats.latest_tension().map(|(_, scope)| scope), Some(Scope::Session));
}

#[test]
fn test_empty_folder() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");

    assert!(stats.files.is_empty());
    assert!(stats.trend.is_empty());
    assert!(stats.pairs.is_empty());
    assert!(stats.trios.is_empty());
    assert!(stats.squads.is_empty());
    assert_eq!(stats.characters.len(), 5);
    assert!(stats.totals.values().all(|&count| count == 0));
    assert_eq!(stats.average_tension(), 0);
    assert_eq!(stats.latest_tension(), None);
    assert_eq!(stats.meta().files, 0);
}

#[test]
fn test_four_characters_on_one_line() {
    let dir = folder(&[("a.txt", "Ciel, John, Kal and Jax march\nCory waits")]);
    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");

    assert_eq!(stats.pairs.len(), 6);
    assert!(stats.pairs.values().all(|&count| count == 1));
    assert_eq!(stats.trios.len(), 4);
    assert_eq!(stats.squads.len(), 1);
    assert_eq!(stats.squad_count(["kal", "jax", "john", "ciel"]), 1);
    assert!(stats.ties_for("cory", 5).is_empty());
}

// =============================================================================
// Folder handling
// =============================================================================

#[test]
fn test_missing_and_non_directory_paths() {
    let dir = folder(&[("2026-01-01.txt", "Kal")]);

    let missing = compute_stats(dir.path().join("nope"), &sample_config());
    assert!(matches!(missing, Err(StatsError::PathNotFound(_))));

    let file = compute_stats(dir.path().join("2026-01-01.txt"), &sample_config());
    assert!(matches!(file, Err(StatsError::NotADirectory(_))));
}

#[test]
fn test_extension_filter_and_no_recursion() {
    let dir = folder(&[("a.txt", "Kal"), ("b.md", "Kal"), ("c.TXT", "Kal")]);
    let nested = dir.path().join("nested");
    fs::create_dir(&nested).expect("Failed to create nested dir");
    write_transcripts(&nested, &[("d.txt", "Kal")]).expect("Failed to write nested");

    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");
    let names: Vec<&str> = stats.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["a.txt", "c.TXT"]);
    assert_eq!(stats.totals["kal"], 2);

    let config = sample_config().with_extensions(["md", ".log"]);
    let stats = compute_stats(dir.path(), &config).expect("compute failed");
    let names: Vec<&str> = stats.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, vec!["b.md"]);
}

#[test]
fn test_invalid_utf8_is_replaced_not_fatal() {
    let dir = TempDir::new().expect("Failed to create temp directory");
    fs::write(dir.path().join("bad.txt"), b"Kal \xff\xfe hit John").expect("write failed");

    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");
    assert_eq!(stats.totals["kal"], 1);
    assert_eq!(stats.totals["john"], 1);
}

#[test]
fn test_crlf_and_curly_quotes_are_normalized() {
    let dir = folder(&[("a.txt", "\u{201c}Kal!\u{201d}\r\n---\r\nJohn\u{2019}s turn\r\n")]);
    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");

    let file = &stats.files[0];
    assert_eq!(file.session_count(), 2);
    assert_eq!(file.evidence_for("kal"), ["\"Kal!\""]);
    assert_eq!(file.evidence_for("john"), ["John's turn"]);
}

// =============================================================================
// Aggregate invariants
// =============================================================================

#[test]
fn test_recompute_is_idempotent() {
    let dir = folder(&[
        ("2026-01-02.txt", "Kal and John\n---\nCiel alone"),
        ("2026-01-01.txt", "Jax, Cory and Kal"),
    ]);
    let insider = Insider::new(sample_config()).expect("engine failed");

    let first = insider.compute(dir.path()).expect("compute failed");
    let second = insider.compute(dir.path()).expect("compute failed");
    assert_eq!(first, second);
}

#[test]
fn test_totals_match_file_sums_and_trend_order() {
    let dir = folder(&[
        ("notes.txt", "Kal Kal"),
        ("b-2026-01-02.txt", "Johnny and Kal"),
        ("a-2026-01-02.txt", "Kal"),
        ("2026-01-01.txt", "John, then Ciel"),
    ]);
    let stats = compute_stats(dir.path(), &sample_config()).expect("compute failed");

    for name in &stats.characters {
        let sum: usize = stats.files.iter().map(|f| f.mentions_of(name)).sum();
        assert_eq!(stats.totals[name], sum, "total mismatch for {name}");
    }

    let dates: Vec<&str> = stats.trend.iter().map(|p| p.date.as_str()).collect();
    assert_eq!(dates, vec!["2026-01-01", "2026-01-02", "unknown"]);
    assert_eq!(stats.trend_for("kal"), vec![0, 2, 2]);
    assert_eq!(stats.trend_for("john"), vec![1, 1, 0]);

    let names: Vec<&str> = stats.files.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(
        names,
        vec!["2026-01-01.txt", "a-2026-01-02.txt", "b-2026-01-02.txt", "notes.txt"]
    );
    assert_eq!(stats.default_selected(), Some("kal"));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn test_json_config_drives_roster() {
    let dir = folder(&[("a.txt", "The Wolf met Brian. Wolfie howled.")]);
    let config_path = dir.path().join("insider.json");
    fs::write(
        &config_path,
        r#"{
            "characters": [
                {"name": "wolf", "aliases": ["wolf", "wolfie"]},
                {"name": "brian"}
            ],
            "evidence_limit": 1
        }"#,
    )
    .expect("write failed");

    let config = InsiderConfig::load(&config_path).expect("config failed");
    let stats = compute_stats(dir.path(), &config).expect("compute failed");

    assert_eq!(stats.characters, vec!["wolf", "brian"]);
    assert_eq!(stats.totals["wolf"], 2);
    assert_eq!(stats.totals["brian"], 1);
    assert_eq!(stats.pair_count("wolf", "brian"), 1);
}

#[test]
fn test_json_config_rejects_duplicates() {
    let json = r#"{"characters": [{"name": "kal"}, {"name": "kal"}]}"#;
    let result = InsiderConfig::from_json_str(json);
    assert!(result.is_err());
}
