//! Folder analysis: per-file statistics and the folder-wide dashboard aggregate.
//!
//! [`Insider`] is the engine. It compiles the roster's matchers once and then
//! turns a folder of transcripts into a fresh, immutable [`DashboardStats`]
//! every time [`Insider::compute`] is called.

use crate::config::{ConfigError, InsiderConfig};
use crate::cooccurrence::{CoOccurrence, Pair, Squad, Trio};
use crate::mentions::{Matcher, MentionDetector};
use crate::scoring::{shannon_entropy, tension, Mood};
use crate::sessions::split_sessions;
use crate::text::{
    count_words, decode_lossy, non_blank_lines, normalize, parse_date_from_filename, tokenize,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from computing folder statistics.
#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("Not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to list {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

// ============================================================================
// Result types
// ============================================================================

/// Statistics for one session inside a file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionStats {
    /// Tension score, 0-100.
    pub tension: u8,

    /// Positive/negative word hits.
    pub mood: Mood,

    /// Mentions per character, zeros included.
    pub mentions: BTreeMap<String, usize>,

    /// Attention spread over `mentions`, 0-1.
    pub attention: f64,
}

/// Statistics for one transcript file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileStats {
    /// File name without directory.
    pub filename: String,

    /// `YYYY-MM-DD` from the file name, or `"unknown"`.
    pub date: String,

    /// Runs of word characters.
    pub words: usize,

    /// Non-empty lines.
    pub lines: usize,

    /// Characters (not bytes).
    pub chars: usize,

    /// Uppercase characters.
    pub caps: usize,

    /// Count of `!`.
    pub exclaims: usize,

    /// Count of `?`.
    pub questions: usize,

    /// Tension score for the whole file, 0-100.
    pub tension: u8,

    /// Positive/negative word hits for the whole file.
    pub mood: Mood,

    /// Mentions per character, zeros included.
    pub mentions: BTreeMap<String, usize>,

    /// First lines mentioning each character, trimmed and bounded.
    pub evidence: BTreeMap<String, Vec<String>>,

    /// One entry per detected session, in file order.
    pub sessions: Vec<SessionStats>,
}

impl FileStats {
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn mentions_of(&self, name: &str) -> usize {
        self.mentions.get(name).copied().unwrap_or(0)
    }

    pub fn evidence_for(&self, name: &str) -> &[String] {
        self.evidence.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Sort key placing files in case-insensitive filename order.
    fn order_key(&self) -> (String, &str) {
        (self.filename.to_lowercase(), &self.filename)
    }
}

/// Per-character mention sums for all files sharing a date tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    pub mentions: BTreeMap<String, usize>,
}

/// Everything the dashboard shows, computed from one folder in one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    /// Roster names in roster order.
    pub characters: Vec<String>,

    /// Mentions per character summed over all files.
    pub totals: BTreeMap<String, usize>,

    /// Per-file records in filename order.
    pub files: Vec<FileStats>,

    /// Mention sums per date tag, ascending by date string.
    pub trend: Vec<TrendPoint>,

    /// Lines shared by two characters.
    pub pairs: BTreeMap<Pair, usize>,

    /// Lines shared by three characters.
    pub trios: BTreeMap<Trio, usize>,

    /// Lines shared by four characters.
    pub squads: BTreeMap<Squad, usize>,

    /// Words appearing on lines that mention each character.
    pub keywords: BTreeMap<String, BTreeMap<String, usize>>,
}

/// The analysis of one file before folder-wide aggregation.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAnalysis {
    pub stats: FileStats,
    pub cooccurrence: CoOccurrence,
}

// ============================================================================
// Engine
// ============================================================================

/// The statistics engine.
///
/// Holds the configuration and the compiled roster matchers, which are reused
/// across every computation.
#[derive(Debug, Clone)]
pub struct Insider {
    config: InsiderConfig,
    detector: MentionDetector,
}

impl Insider {
    /// Create an engine, compiling a matcher for every roster character.
    pub fn new(config: InsiderConfig) -> Result<Self, ConfigError> {
        let detector = MentionDetector::new(&config.roster)?;
        Ok(Self { config, detector })
    }

    pub fn config(&self) -> &InsiderConfig {
        &self.config
    }

    pub fn detector(&self) -> &MentionDetector {
        &self.detector
    }

    /// Analyze every transcript directly inside `folder`.
    ///
    /// Fails before touching any file when `folder` is missing or not a directory.
    /// A folder without transcripts yields empty statistics, not an error.
    pub fn compute(&self, folder: impl AsRef<Path>) -> Result<DashboardStats, StatsError> {
        let folder = folder.as_ref();
        let paths = self.transcript_paths(folder)?;
        tracing::info!(
            folder = %folder.display(),
            files = paths.len(),
            "computing transcript statistics"
        );

        let analyses = paths
            .iter()
            .map(|path| self.analyze_file(path))
            .collect::<Result<Vec<_>, _>>()?;

        let stats = self.aggregate(analyses);
        tracing::debug!(
            files = stats.files.len(),
            pairs = stats.pairs.len(),
            trend_points = stats.trend.len(),
            "statistics ready"
        );
        Ok(stats)
    }

    /// Transcript files directly inside `folder`, in filename order.
    pub fn transcript_paths(&self, folder: &Path) -> Result<Vec<PathBuf>, StatsError> {
        if !folder.exists() {
            return Err(StatsError::PathNotFound(folder.to_path_buf()));
        }
        if !folder.is_dir() {
            return Err(StatsError::NotADirectory(folder.to_path_buf()));
        }

        let read_dir_error = |source: io::Error| StatsError::ReadDir {
            path: folder.to_path_buf(),
            source,
        };

        let mut paths = Vec::new();
        for entry in fs::read_dir(folder).map_err(read_dir_error)? {
            let path = entry.map_err(read_dir_error)?.path();
            if path.is_file() && self.config.accepts(&path) {
                paths.push(path);
            } else {
                tracing::debug!(path = %path.display(), "skipping non-transcript entry");
            }
        }

        paths.sort_by_cached_key(|path| {
            let name = file_name(path);
            (name.to_lowercase(), name)
        });
        Ok(paths)
    }

    /// Read, decode and analyze a single transcript file.
    pub fn analyze_file(&self, path: &Path) -> Result<FileAnalysis, StatsError> {
        let bytes = fs::read(path).map_err(|source| StatsError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;

        let (text, replaced) = decode_lossy(&bytes);
        if replaced {
            tracing::warn!(path = %path.display(), "invalid UTF-8 replaced while decoding");
        }

        Ok(self.analyze_text(&file_name(path), &text))
    }

    /// Analyze one transcript held in memory.
    pub fn analyze_text(&self, filename: &str, raw: &str) -> FileAnalysis {
        let text = normalize(raw);
        let lexicon = &self.config.lexicon;
        let non_blank: Vec<&str> = non_blank_lines(&text).collect();

        let sessions = split_sessions(&text)
            .iter()
            .map(|session| self.analyze_session(session))
            .collect();

        let mut mentions = BTreeMap::new();
        let mut evidence = BTreeMap::new();
        for matcher in self.detector.matchers() {
            let name = matcher.name();
            mentions.insert(name.to_string(), matcher.count(&text));
            evidence.insert(
                name.to_string(),
                self.detector.lines_with_mentions(
                    &text,
                    name,
                    self.config.evidence_limit,
                    self.config.evidence_width,
                ),
            );
        }

        let mut cooccurrence = CoOccurrence::new();
        for line in &non_blank {
            let present = self.detector.present_set(line);
            cooccurrence.record_line(&present, line, lexicon);
        }

        let stats = FileStats {
            filename: filename.to_string(),
            date: parse_date_from_filename(filename),
            words: count_words(&text),
            lines: non_blank.len(),
            chars: text.chars().count(),
            caps: text.chars().filter(|c| c.is_uppercase()).count(),
            exclaims: text.matches('!').count(),
            questions: text.matches('?').count(),
            tension: tension(&text, lexicon),
            mood: Mood::from_tokens(&tokenize(&text), lexicon),
            mentions,
            evidence,
            sessions,
        };

        FileAnalysis {
            stats,
            cooccurrence,
        }
    }

    fn analyze_session(&self, session: &str) -> SessionStats {
        let mentions = self.detector.counts(session);
        SessionStats {
            tension: tension(session, &self.config.lexicon),
            mood: Mood::from_tokens(&tokenize(session), &self.config.lexicon),
            attention: shannon_entropy(&mentions),
            mentions,
        }
    }

    /// Fold per-file analyses into folder-wide statistics.
    ///
    /// Counts do not depend on the order of `analyses`; files are re-sorted into
    /// filename order.
    pub fn aggregate(&self, analyses: Vec<FileAnalysis>) -> DashboardStats {
        let characters: Vec<String> = self.config.roster.names().map(str::to_string).collect();
        let zeros = || -> BTreeMap<String, usize> {
            characters.iter().map(|name| (name.clone(), 0)).collect()
        };

        let mut totals = zeros();
        let mut by_date: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        let mut links = CoOccurrence::new();
        for name in &characters {
            links.keywords.entry(name.clone()).or_default();
        }

        let mut files = Vec::with_capacity(analyses.len());
        for FileAnalysis {
            stats,
            cooccurrence,
        } in analyses
        {
            let point = by_date.entry(stats.date.clone()).or_insert_with(zeros);
            for (name, &count) in &stats.mentions {
                *totals.entry(name.clone()).or_insert(0) += count;
                *point.entry(name.clone()).or_insert(0) += count;
            }
            links.merge(cooccurrence);
            files.push(stats);
        }
        files.sort_by(|a, b| a.order_key().cmp(&b.order_key()));

        let trend = by_date
            .into_iter()
            .map(|(date, mentions)| TrendPoint { date, mentions })
            .collect();

        DashboardStats {
            characters,
            totals,
            files,
            trend,
            pairs: links.pairs,
            trios: links.trios,
            squads: links.squads,
            keywords: links.keywords,
        }
    }
}

/// Compute statistics for `folder` with a one-off engine.
pub fn compute_stats(
    folder: impl AsRef<Path>,
    config: &InsiderConfig,
) -> Result<DashboardStats, StatsError> {
    Insider::new(config.clone())?.compute(folder)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
