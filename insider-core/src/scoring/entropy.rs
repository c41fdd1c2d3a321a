//! Attention spread: normalized Shannon entropy of mentions within a session.
//!
//! 0 means one character (or nobody) held the spotlight; 1 means mentions were
//! spread evenly across everyone who appeared.

use std::collections::BTreeMap;

/// Normalized entropy of `counts`, in [0, 1], rounded to the nearest 1/1000.
///
/// Non-positive entries are ignored.
pub fn shannon_entropy<K>(counts: &BTreeMap<K, usize>) -> f64 {
    let values: Vec<f64> = counts
        .values()
        .filter(|&&count| count > 0)
        .map(|&count| count as f64)
        .collect();
    if values.is_empty() {
        return 0.0;
    }

    let total: f64 = values.iter().sum();
    let entropy: f64 = values
        .iter()
        .map(|count| count / total)
        .map(|p| -p * p.log2())
        .sum();

    let max_entropy = if values.len() > 1 {
        (values.len() as f64).log2()
    } else {
        1.0
    };

    let millis = (entropy / max_entropy * 1000.0)
        .round_ties_even()
        .clamp(0.0, 1000.0);
    millis / 1000.0
}

/// Word for an attention-spread value, from "sealed" to "meltdown".
pub fn attention_label(value: f64) -> &'static str {
    const LABELS: [(f64, &str); 9] = [
        (0.90, "meltdown"),
        (0.80, "frenzied"),
        (0.70, "restless"),
        (0.60, "turbulent"),
        (0.50, "scattered"),
        (0.40, "unsteady"),
        (0.30, "dialed-in"),
        (0.20, "grounded"),
        (0.10, "still"),
    ];

    LABELS
        .iter()
        .find(|(threshold, _)| value >= *threshold)
        .map_or("sealed", |(_, label)| *label)
}
