//! Co-occurrence tallies: who shows up on the same line as whom.
//!
//! Every line mentioning two or more characters bumps every unordered pair of
//! them, three or more bumps every trio, four or more every squad. Keys are
//! canonicalized by sorting their members, so `(kal, john)` and `(john, kal)`
//! are the same entry.

use crate::config::Lexicon;
use crate::text::tokenize;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Combination keys
// ============================================================================

/// An unordered group of `K` character names, stored sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Combination<const K: usize>([String; K]);

/// Two characters on the same line.
pub type Pair = Combination<2>;
/// Three characters on the same line.
pub type Trio = Combination<3>;
/// Four characters on the same line.
pub type Squad = Combination<4>;

impl<const K: usize> Combination<K> {
    /// Build a key from members in any order.
    pub fn new<S: Into<String>>(members: [S; K]) -> Self {
        let mut members = members.map(Into::into);
        members.sort();
        Self(members)
    }

    /// Members in sorted order.
    pub fn members(&self) -> &[String; K] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|member| member == name)
    }
}

impl Pair {
    /// The other member of the pair, if `name` is one of them.
    pub fn partner(&self, name: &str) -> Option<&str> {
        let [a, b] = &self.0;
        if a == name {
            Some(b.as_str())
        } else if b == name {
            Some(a.as_str())
        } else {
            None
        }
    }
}

impl<const K: usize> fmt::Display for Combination<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("+"))
    }
}

impl<const K: usize> Serialize for Combination<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// k-combinations
// ============================================================================

/// Iterate every `k`-element combination of `items`, in ascending index order.
///
/// `combinations(&[a, b, c], 2)` yields `[a, b]`, `[a, c]`, `[b, c]`.
/// Yields nothing when `k` is zero or larger than `items.len()`.
pub fn combinations<T>(items: &[T], k: usize) -> Combinations<'_, T> {
    Combinations {
        items,
        indices: (0..k).collect(),
        done: k == 0 || k > items.len(),
    }
}

/// Iterator returned by [`combinations`].
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    items: &'a [T],
    indices: Vec<usize>,
    done: bool,
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let current = self.indices.iter().map(|&i| &self.items[i]).collect();

        // Advance the rightmost index that still has room.
        let n = self.items.len();
        let k = self.indices.len();
        match (0..k).rev().find(|&i| self.indices[i] < n - k + i) {
            Some(i) => {
                self.indices[i] += 1;
                for j in i + 1..k {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
            }
            None => self.done = true,
        }

        Some(current)
    }
}

// ============================================================================
// Tallies
// ============================================================================

/// Pair/trio/squad counts plus per-character keyword frequencies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CoOccurrence {
    pub pairs: BTreeMap<Pair, usize>,
    pub trios: BTreeMap<Trio, usize>,
    pub squads: BTreeMap<Squad, usize>,
    /// character name -> keyword -> count
    pub keywords: BTreeMap<String, BTreeMap<String, usize>>,
}

impl CoOccurrence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one line given the names present on it.
    pub fn record_line(&mut self, present: &[&str], line: &str, lexicon: &Lexicon) {
        if present.is_empty() {
            return;
        }

        bump_combinations(&mut self.pairs, present);
        bump_combinations(&mut self.trios, present);
        bump_combinations(&mut self.squads, present);

        let tokens = tokenize(line);
        if tokens.is_empty() {
            return;
        }
        for name in present {
            let own = name.to_lowercase();
            let bag = self.keywords.entry(name.to_string()).or_default();
            for token in &tokens {
                if lexicon.is_stopword(token) || *token == own {
                    continue;
                }
                *bag.entry(token.clone()).or_insert(0) += 1;
            }
        }
    }

    /// Add every count of `other` into `self`.
    pub fn merge(&mut self, other: CoOccurrence) {
        merge_counts(&mut self.pairs, other.pairs);
        merge_counts(&mut self.trios, other.trios);
        merge_counts(&mut self.squads, other.squads);
        for (name, bag) in other.keywords {
            merge_counts(self.keywords.entry(name).or_default(), bag);
        }
    }

    pub fn pair_count(&self, a: &str, b: &str) -> usize {
        self.pairs.get(&Combination::new([a, b])).copied().unwrap_or(0)
    }

    pub fn trio_count(&self, members: [&str; 3]) -> usize {
        self.trios.get(&Combination::new(members)).copied().unwrap_or(0)
    }

    pub fn squad_count(&self, members: [&str; 4]) -> usize {
        self.squads.get(&Combination::new(members)).copied().unwrap_or(0)
    }

    /// True when no line ever had anyone on it.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
            && self.trios.is_empty()
            && self.squads.is_empty()
            && self.keywords.values().all(BTreeMap::is_empty)
    }
}

fn bump_combinations<const K: usize>(
    table: &mut BTreeMap<Combination<K>, usize>,
    present: &[&str],
) {
    for combo in combinations(present, K) {
        let members: [&str; K] = std::array::from_fn(|i| *combo[i]);
        *table.entry(Combination::new(members)).or_insert(0) += 1;
    }
}

fn merge_counts<K: Ord>(into: &mut BTreeMap<K, usize>, from: BTreeMap<K, usize>) {
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combination_is_order_insensitive() {
        assert_eq!(Pair::new(["kal", "john"]), Pair::new(["john", "kal"]));
        assert_eq!(
            Trio::new(["ciel", "kal", "john"]),
            Trio::new(["john", "ciel", "kal"])
        );
        assert_eq!(Pair::new(["kal", "john"]).to_string(), "john+kal");
    }

    #[test]
    fn test_partner() {
        let pair = Pair::new(["kal", "john"]);
        assert_eq!(pair.partner("kal"), Some("john"));
        assert_eq!(pair.partner("john"), Some("kal"));
        assert_eq!(pair.partner("ciel"), None);
    }

    #[test]
    fn test_combinations_order_and_counts() {
        let items = ["a", "b", "c", "d"];
        let pairs: Vec<Vec<&&str>> = combinations(&items, 2).collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], vec![&"a", &"b"]);
        assert_eq!(pairs[1], vec![&"a", &"c"]);
        assert_eq!(pairs[5], vec![&"c", &"d"]);

        assert_eq!(combinations(&items, 3).count(), 4);
        assert_eq!(combinations(&items, 4).count(), 1);
        assert_eq!(combinations(&items, 5).count(), 0);
        assert_eq!(combinations(&items, 0).count(), 0);
        assert_eq!(combinations(&["a", "b", "c", "d", "e"], 2).count(), 10);
    }

    #[test]
    fn test_four_on_a_line() {
        let lexicon = Lexicon::default();
        let mut tally = CoOccurrence::new();
        tally.record_line(
            &["ciel", "john", "kal", "jax"],
            "Ciel, John, Kal and Jax march",
            &lexicon,
        );

        assert_eq!(tally.pairs.len(), 6);
        assert!(tally.pairs.values().all(|&c| c == 1));
        assert_eq!(tally.trios.len(), 4);
        assert_eq!(tally.squads.len(), 1);
        assert_eq!(tally.squad_count(["kal", "jax", "john", "ciel"]), 1);
    }

    #[test]
    fn test_five_on_a_line() {
        let mut tally = CoOccurrence::new();
        tally.record_line(
            &["ciel", "cory", "jax", "john", "kal"],
            "everyone",
            &Lexicon::default(),
        );

        assert_eq!(tally.pairs.len(), 10);
        assert_eq!(tally.trios.len(), 10);
        assert_eq!(tally.squads.len(), 5);
        assert_eq!(tally.squads.values().sum::<usize>(), 5);
        assert_eq!(tally.squad_count(["kal", "cory", "john", "jax"]), 1);
    }

    #[test]
    fn test_single_character_line_has_no_combinations() {
        let lexicon = Lexicon::default();
        let mut tally = CoOccurrence::new();
        tally.record_line(&["kal"], "Kal sharpens the sword", &lexicon);

        assert!(tally.pairs.is_empty());
        assert_eq!(tally.keywords["kal"]["sharpens"], 1);
        assert_eq!(tally.keywords["kal"]["sword"], 1);
        assert!(!tally.keywords["kal"].contains_key("the"));
        assert!(!tally.keywords["kal"].contains_key("kal"));
    }

    #[test]
    fn test_keywords_skip_own_name_only() {
        let lexicon = Lexicon::default();
        let mut tally = CoOccurrence::new();
        tally.record_line(&["john", "kal"], "Kal hit John! John hit Kal!", &lexicon);

        assert_eq!(tally.keywords["kal"]["hit"], 2);
        assert_eq!(tally.keywords["kal"]["john"], 2);
        assert!(!tally.keywords["kal"].contains_key("kal"));
        assert_eq!(tally.keywords["john"]["kal"], 2);
        assert_eq!(tally.pair_count("kal", "john"), 1);
    }

    #[test]
    fn test_merge_sums_counts() {
        let lexicon = Lexicon::default();
        let mut first = CoOccurrence::new();
        first.record_line(&["john", "kal"], "kal and john rest", &lexicon);
        let mut second = CoOccurrence::new();
        second.record_line(&["john", "kal"], "john and kal rest", &lexicon);
        second.record_line(&["ciel", "kal"], "ciel and kal rest", &lexicon);

        first.merge(second);
        assert_eq!(first.pair_count("john", "kal"), 2);
        assert_eq!(first.pair_count("kal", "ciel"), 1);
        assert_eq!(first.keywords["kal"]["rest"], 3);
    }

    #[test]
    fn test_empty_present_set_records_nothing() {
        let mut tally = CoOccurrence::new();
        tally.record_line(&[], "nobody here", &Lexicon::default());
        assert!(tally.is_empty());
        assert!(tally.keywords.is_empty());
    }

    #[test]
    fn test_serializes_keys_as_strings() {
        let mut tally = CoOccurrence::new();
        tally.record_line(&["john", "kal"], "kal and john", &Lexicon::default());
        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(json["pairs"]["john+kal"], 1);
    }
}
