//! Read-only views over [`DashboardStats`] used by dashboard panels.
//!
//! Every ranking here is deterministic: ties on count fall back to roster
//! order for characters and to the canonical (sorted) key for combinations
//! and keywords.

use crate::cooccurrence::{Combination, Pair, Squad, Trio};
use crate::scoring::Mood;
use crate::stats::{DashboardStats, FileStats, SessionStats};
use serde::Serialize;
use std::collections::BTreeMap;

/// Where a "latest" reading came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Scope {
    /// The last session of the last file.
    Session,
    /// The last file as a whole (it had no sessions).
    File,
}

/// Folder-wide counters for the meta panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetaSummary {
    pub files: usize,
    pub sessions: usize,
    pub words: usize,
    pub lines: usize,
    pub chars: usize,
    pub caps: usize,
    pub exclaims: usize,
    pub questions: usize,
    /// Characters per non-empty line, rounded.
    pub avg_line_len: usize,
    /// Share of uppercase characters, in percent.
    pub caps_percent: f64,
}

impl DashboardStats {
    // =========================================================================
    // Characters
    // =========================================================================

    pub fn total_of(&self, name: &str) -> usize {
        self.totals.get(name).copied().unwrap_or(0)
    }

    /// Characters by total mentions, highest first; ties keep roster order.
    pub fn ranked_totals(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .characters
            .iter()
            .map(|name| (name.as_str(), self.total_of(name)))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// The character a dashboard should highlight first.
    pub fn default_selected(&self) -> Option<&str> {
        self.ranked_totals().first().map(|(name, _)| *name)
    }

    /// Mentions of `name` per trend point, oldest date first.
    pub fn trend_for(&self, name: &str) -> Vec<usize> {
        self.trend
            .iter()
            .map(|point| point.mentions.get(name).copied().unwrap_or(0))
            .collect()
    }

    // =========================================================================
    // Co-occurrence
    // =========================================================================

    pub fn pair_count(&self, a: &str, b: &str) -> usize {
        count_of(&self.pairs, Combination::new([a, b]))
    }

    pub fn trio_count(&self, members: [&str; 3]) -> usize {
        count_of(&self.trios, Combination::new(members))
    }

    pub fn squad_count(&self, members: [&str; 4]) -> usize {
        count_of(&self.squads, Combination::new(members))
    }

    /// Who `name` shares lines with most, strongest first.
    pub fn ties_for(&self, name: &str, limit: usize) -> Vec<(&str, usize)> {
        let mut ties: BTreeMap<&str, usize> = BTreeMap::new();
        for (pair, &count) in &self.pairs {
            if let Some(partner) = pair.partner(name) {
                *ties.entry(partner).or_insert(0) += count;
            }
        }

        let mut ranked: Vec<(&str, usize)> = ties.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    pub fn top_pairs(&self, limit: usize) -> Vec<(&Pair, usize)> {
        top_combinations(&self.pairs, limit)
    }

    pub fn top_trios(&self, limit: usize) -> Vec<(&Trio, usize)> {
        top_combinations(&self.trios, limit)
    }

    pub fn top_squads(&self, limit: usize) -> Vec<(&Squad, usize)> {
        top_combinations(&self.squads, limit)
    }

    /// Most frequent words near `name`, skipping other characters' names.
    pub fn top_keywords_for(&self, name: &str, limit: usize) -> Vec<(&str, usize)> {
        let Some(bag) = self.keywords.get(name) else {
            return Vec::new();
        };

        let roster: Vec<String> = self.characters.iter().map(|c| c.to_lowercase()).collect();
        let mut ranked: Vec<(&str, usize)> = bag
            .iter()
            .filter(|(word, _)| !roster.contains(*word))
            .map(|(word, &count)| (word.as_str(), count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked.truncate(limit);
        ranked
    }

    // =========================================================================
    // Files and sessions
    // =========================================================================

    /// The last `count` files in filename order.
    pub fn recent_files(&self, count: usize) -> &[FileStats] {
        let start = self.files.len().saturating_sub(count);
        &self.files[start..]
    }

    /// Evidence lines for `name` from the last `files` files, newest first.
    ///
    /// Files without evidence are skipped; each file keeps at most `lines` lines.
    pub fn evidence_for(
        &self,
        name: &str,
        files: usize,
        lines: usize,
    ) -> Vec<(&FileStats, &[String])> {
        self.recent_files(files)
            .iter()
            .rev()
            .filter_map(|file| {
                let evidence = file.evidence_for(name);
                if evidence.is_empty() {
                    None
                } else {
                    Some((file, &evidence[..evidence.len().min(lines)]))
                }
            })
            .collect()
    }

    /// Every session of every file, in file order.
    pub fn sessions(&self) -> impl Iterator<Item = &SessionStats> {
        self.files.iter().flat_map(|file| file.sessions.iter())
    }

    pub fn session_count(&self) -> usize {
        self.files.iter().map(FileStats::session_count).sum()
    }

    /// Mean file tension, rounded half to even; 0 with no files.
    pub fn average_tension(&self) -> u8 {
        if self.files.is_empty() {
            return 0;
        }
        let sum: f64 = self.files.iter().map(|file| f64::from(file.tension)).sum();
        (sum / self.files.len() as f64).round_ties_even() as u8
    }

    /// Tension of the latest session, or of the latest file when it has no sessions.
    pub fn latest_tension(&self) -> Option<(u8, Scope)> {
        let file = self.files.last()?;
        Some(match file.sessions.last() {
            Some(session) => (session.tension, Scope::Session),
            None => (file.tension, Scope::File),
        })
    }

    // =========================================================================
    // Mood and attention
    // =========================================================================

    /// Word hits summed over every file.
    pub fn overall_mood(&self) -> Mood {
        self.files.iter().map(|file| file.mood).sum()
    }

    /// Word hits summed over the last `count` sessions.
    pub fn recent_session_mood(&self, count: usize) -> Mood {
        let moods: Vec<Mood> = self.sessions().map(|session| session.mood).collect();
        let start = moods.len().saturating_sub(count);
        moods[start..].iter().copied().sum()
    }

    /// Mood of the latest session, or of the latest file when it has no sessions.
    pub fn latest_mood(&self) -> Option<(Mood, Scope)> {
        let file = self.files.last()?;
        Some(match file.sessions.last() {
            Some(session) => (session.mood, Scope::Session),
            None => (file.mood, Scope::File),
        })
    }

    /// Attention spread of every session, in file order.
    pub fn session_attention(&self) -> Vec<f64> {
        self.sessions().map(|session| session.attention).collect()
    }

    /// Attention spread of the last `count` sessions.
    pub fn recent_session_attention(&self, count: usize) -> Vec<f64> {
        let mut values = self.session_attention();
        let start = values.len().saturating_sub(count);
        values.drain(..start);
        values
    }

    // =========================================================================
    // Meta
    // =========================================================================

    pub fn meta(&self) -> MetaSummary {
        let mut meta = self.files.iter().fold(MetaSummary::default(), |mut acc, file| {
            acc.files += 1;
            acc.sessions += file.session_count();
            acc.words += file.words;
            acc.lines += file.lines;
            acc.chars += file.chars;
            acc.caps += file.caps;
            acc.exclaims += file.exclaims;
            acc.questions += file.questions;
            acc
        });

        if meta.lines > 0 {
            meta.avg_line_len = (meta.chars as f64 / meta.lines as f64).round_ties_even() as usize;
        }
        if meta.chars > 0 {
            meta.caps_percent = meta.caps as f64 / meta.chars as f64 * 100.0;
        }
        meta
    }
}

fn count_of<const K: usize>(table: &BTreeMap<Combination<K>, usize>, key: Combination<K>) -> usize {
    table.get(&key).copied().unwrap_or(0)
}

fn top_combinations<const K: usize>(
    table: &BTreeMap<Combination<K>, usize>,
    limit: usize,
) -> Vec<(&Combination<K>, usize)> {
    // BTreeMap iteration is already key-ascending, so a stable sort keeps
    // equal counts in canonical key order.
    let mut ranked: Vec<(&Combination<K>, usize)> =
        table.iter().map(|(key, &count)| (key, count)).collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(limit);
    ranked
}
