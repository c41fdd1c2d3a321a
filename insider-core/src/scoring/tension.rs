//! Tension score: how heated a span of transcript reads, 0-100.
//!
//! Four signals are blended: punctuation density (`!`/`?`), combat vocabulary,
//! shouting (uppercase density), and pace (share of short lines).

use crate::config::Lexicon;
use crate::text::{non_blank_lines, tokenize};

/// Characters counted as intensity punctuation.
pub const INTENSITY_CHARS: [char; 2] = ['!', '?'];

/// Lines at or under this many characters count toward pace.
pub const SHORT_LINE_CHARS: usize = 60;

const PUNCT_SCALE: f64 = 6000.0;
const PUNCT_WEIGHT: f64 = 55.0;
const COMBAT_SCALE: f64 = 900.0;
const COMBAT_WEIGHT: f64 = 70.0;
const CAPS_SCALE: f64 = 2500.0;
const CAPS_WEIGHT: f64 = 35.0;
const PACE_WEIGHT: f64 = 25.0;

/// Score `text` from 0 (calm or empty) to 100.
pub fn tension(text: &str, lexicon: &Lexicon) -> u8 {
    let lines: Vec<&str> = non_blank_lines(text).collect();
    if lines.is_empty() {
        return 0;
    }

    let joined = lines.join("\n");
    let total_chars = joined.chars().count().max(1) as f64;

    let punct = joined
        .chars()
        .filter(|c| INTENSITY_CHARS.contains(c))
        .count();
    let caps = joined.chars().filter(|c| c.is_uppercase()).count();

    let tokens = tokenize(&joined);
    let total_words = tokens.len().max(1) as f64;
    let combat = tokens.iter().filter(|t| lexicon.is_combat(t)).count();

    let short_lines = lines
        .iter()
        .filter(|line| line.chars().count() <= SHORT_LINE_CHARS)
        .count();
    let pace = short_lines as f64 / lines.len() as f64;

    let score = weighted(punct as f64 / total_chars, PUNCT_SCALE, PUNCT_WEIGHT)
        + weighted(combat as f64 / total_words, COMBAT_SCALE, COMBAT_WEIGHT)
        + weighted(caps as f64 / total_chars, CAPS_SCALE, CAPS_WEIGHT)
        + PACE_WEIGHT * pace;

    score.round_ties_even().clamp(0.0, 100.0) as u8
}

/// Scale a rate, truncate, clamp to 0-100, then apply its weight.
fn weighted(rate: f64, scale: f64, weight: f64) -> f64 {
    let sub = ((rate * scale) as i64).clamp(0, 100);
    weight * sub as f64 / 100.0
}
