//! Heuristic scorers.
//!
//! All scorers are total: they accept empty or degenerate input and always
//! return a value inside their documented range.

pub mod entropy;
pub mod sentiment;
pub mod tension;

pub use entropy::{attention_label, shannon_entropy};
pub use sentiment::{Mood, MoodBand, MoodTone, Tier};
pub use tension::tension;
