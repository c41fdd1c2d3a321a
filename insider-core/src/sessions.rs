//! Session segmentation.
//!
//! A transcript file usually holds several play sessions. They are separated
//! either by a line of dashes (`---`, `–––`, `———`) or by two blank lines in a row.

use regex::Regex;

/// Number of consecutive blank lines that closes a session.
const BLANK_RUN_BOUNDARY: usize = 2;

lazy_static::lazy_static! {
    static ref SEPARATOR_RE: Regex =
        Regex::new(r"^\s*[-\x{2013}\x{2014}]{3,}\s*$").expect("separator pattern compiles");
}

/// Whether a line is a dash separator between sessions.
pub fn is_separator(line: &str) -> bool {
    SEPARATOR_RE.is_match(line)
}

/// Split normalized text into ordered, trimmed, non-empty session chunks.
///
/// Text without separators or double blank lines comes back as a single session;
/// text made only of blank lines yields no sessions at all.
pub fn split_sessions(text: &str) -> Vec<String> {
    let mut chunks: Vec<Vec<&str>> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut blank_run = 0;

    for line in text.lines() {
        if is_separator(line) {
            flush(&mut chunks, &mut current);
            blank_run = 0;
            continue;
        }

        if line.trim().is_empty() {
            blank_run += 1;
            current.push(line);
            if blank_run >= BLANK_RUN_BOUNDARY {
                flush(&mut chunks, &mut current);
                blank_run = 0;
            }
            continue;
        }

        blank_run = 0;
        current.push(line);
    }
    flush(&mut chunks, &mut current);

    chunks
        .into_iter()
        .map(|chunk| chunk.join("\n").trim().to_string())
        .filter(|session| !session.is_empty())
        .collect()
}

/// Close the current chunk, keeping it only if it has content.
fn flush<'a>(chunks: &mut Vec<Vec<&'a str>>, current: &mut Vec<&'a str>) {
    let chunk = std::mem::take(current);
    if chunk.iter().any(|line| !line.trim().is_empty()) {
        chunks.push(chunk);
    }
}
