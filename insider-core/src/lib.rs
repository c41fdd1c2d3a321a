//! Statistics engine for tabletop session transcripts.
//!
//! This crate provides:
//! - Text normalization, tokenization and session segmentation
//! - Whole-word character mention detection driven by a configurable roster
//! - Tension, mood and attention-spread heuristics
//! - Pair/trio/squad co-occurrence and keyword tables
//! - Folder-wide aggregation into a date-ordered trend series
//!
//! # Quick Start
//!
//! ```ignore
//! use insider_core::{Insider, InsiderConfig, Roster};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = InsiderConfig::new(Roster::sample());
//!     let insider = Insider::new(config)?;
//!
//!     let stats = insider.compute("game_logs")?;
//!     for (name, count) in stats.ranked_totals() {
//!         println!("{name}: {count}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cooccurrence;
pub mod mentions;
pub mod scoring;
pub mod sessions;
pub mod stats;
pub mod testing;
pub mod text;
pub mod views;

// Primary public API
pub use config::{Character, ConfigError, InsiderConfig, Lexicon, Roster};
pub use cooccurrence::{combinations, Combination, CoOccurrence, Pair, Squad, Trio};
pub use mentions::{AliasPattern, CharacterMatcher, Matcher, MentionDetector};
pub use scoring::{attention_label, shannon_entropy, tension, Mood, MoodBand, MoodTone, Tier};
pub use sessions::split_sessions;
pub use stats::{
    compute_stats, DashboardStats, FileAnalysis, FileStats, Insider, SessionStats, StatsError,
    TrendPoint,
};
pub use views::{MetaSummary, Scope};
