//! Text utilities shared by every scorer.
//!
//! Transcripts are decoded leniently, normalized once, and then tokenized
//! the same way everywhere so that counts agree between the file-level and
//! session-level passes.

use regex::Regex;
use std::borrow::Cow;

/// Date tag used for files whose name carries no `YYYY-MM-DD` stamp.
pub const UNKNOWN_DATE: &str = "unknown";

/// Minimum length (in characters) for a token to count as a word.
pub const MIN_TOKEN_LEN: usize = 3;

lazy_static::lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[a-zA-Z][a-zA-Z']+").expect("word pattern compiles");
    static ref ANY_WORD_RE: Regex = Regex::new(r"\w+").expect("word-run pattern compiles");
    static ref DATE_RE: Regex = Regex::new(r"(\d{4}-\d{2}-\d{2})").expect("date pattern compiles");
}

/// Decode raw file bytes as UTF-8, replacing invalid sequences.
///
/// Returns the decoded text and whether any replacement happened.
pub fn decode_lossy(bytes: &[u8]) -> (String, bool) {
    match String::from_utf8_lossy(bytes) {
        Cow::Borrowed(text) => (text.to_string(), false),
        Cow::Owned(text) => (text, true),
    }
}

/// Canonicalize line endings and curly quotes.
///
/// Idempotent: normalizing twice yields the same text.
pub fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace(['\u{201c}', '\u{201d}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'")
}

/// Split text into lowercase word tokens of at least [`MIN_TOKEN_LEN`] characters.
///
/// A token starts with an ASCII letter and continues through letters and apostrophes.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .filter(|word| word.len() >= MIN_TOKEN_LEN)
        .collect()
}

/// Count runs of word characters, the coarse "words" figure shown per file.
pub fn count_words(text: &str) -> usize {
    ANY_WORD_RE.find_iter(text).count()
}

/// Pull a `YYYY-MM-DD` stamp out of a filename, or [`UNKNOWN_DATE`].
pub fn parse_date_from_filename(name: &str) -> String {
    DATE_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string())
}

/// Iterate the lines of `text` that contain something besides whitespace.
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().filter(|line| !line.trim().is_empty())
}

/// Keep at most `max_chars` characters of `line`.
pub fn truncate_chars(line: &str, max_chars: usize) -> &str {
    match line.char_indices().nth(max_chars) {
        Some((idx, _)) => &line[..idx],
        None => line,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_line_endings_and_quotes() {
        let raw = "\u{201c}Run!\u{201d}\r\nKal\u{2019}s blade \u{2018}sang\u{2019}";
        assert_eq!(normalize(raw), "\"Run!\"\nKal's blade 'sang'");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw = "a\r\nb \u{201c}c\u{201d}\r\n";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_tokenize_drops_short_words() {
        let tokens = tokenize("I hit the Orc's shield, ok? Go!");
        assert_eq!(tokens, vec!["hit", "the", "orc's", "shield"]);
    }

    #[test]
    fn test_tokenize_requires_leading_letter() {
        assert_eq!(tokenize("'tis 42nd street"), vec!["tis", "street"]);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("Kal hit John! John hit Kal!"), 6);
        assert_eq!(count_words(""), 0);
    }

    #[test]
    fn test_parse_date_from_filename() {
        assert_eq!(parse_date_from_filename("2026-01-01.txt"), "2026-01-01");
        assert_eq!(parse_date_from_filename("session_2025-12-24_night.txt"), "2025-12-24");
        assert_eq!(parse_date_from_filename("notes.txt"), UNKNOWN_DATE);
    }

    #[test]
    fn test_decode_lossy_replaces_invalid_bytes() {
        let (text, replaced) = decode_lossy(b"kal \xff john");
        assert!(replaced);
        assert_eq!(text, "kal \u{fffd} john");

        let (text, replaced) = decode_lossy("plain".as_bytes());
        assert!(!replaced);
        assert_eq!(text, "plain");
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 80), "short");
    }
}
