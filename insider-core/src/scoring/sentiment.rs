//! Mood classification from positive/negative word hits.
//!
//! The balance of hits picks one of nine bands; the number of hits picks how
//! strongly the band is worded. Together they form a 9x3 label lattice.

use crate::config::Lexicon;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Label used when there are no positive or negative hits at all.
pub const BLANK_LABEL: &str = "blank";

/// How much evidence backs a mood reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Mild,
    Moderate,
    Strong,
}

impl Tier {
    pub fn from_intensity(intensity: usize) -> Tier {
        if intensity >= 18 {
            Tier::Strong
        } else if intensity >= 8 {
            Tier::Moderate
        } else {
            Tier::Mild
        }
    }
}

/// Coarse color family for a mood band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoodTone {
    Bright,
    Mellow,
    Uneasy,
    Dark,
}

/// One of the nine score bands, from most positive to most negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoodBand {
    /// score >= 0.70
    Elated,
    /// score >= 0.45
    Upbeat,
    /// score >= 0.25
    Settled,
    /// score >= 0.10
    Easy,
    /// -0.10 < score < 0.10
    Mixed,
    /// -0.25 < score <= -0.10
    Tense,
    /// -0.45 < score <= -0.25
    Grim,
    /// -0.70 < score <= -0.45
    Dire,
    /// score <= -0.70
    Bleak,
}

impl MoodBand {
    pub fn from_score(score: f64) -> MoodBand {
        if score >= 0.70 {
            MoodBand::Elated
        } else if score >= 0.45 {
            MoodBand::Upbeat
        } else if score >= 0.25 {
            MoodBand::Settled
        } else if score >= 0.10 {
            MoodBand::Easy
        } else if score > -0.10 {
            MoodBand::Mixed
        } else if score > -0.25 {
            MoodBand::Tense
        } else if score > -0.45 {
            MoodBand::Grim
        } else if score > -0.70 {
            MoodBand::Dire
        } else {
            MoodBand::Bleak
        }
    }

    /// Labels for this band as (mild, moderate, strong).
    fn labels(&self) -> [&'static str; 3] {
        match self {
            MoodBand::Elated => ["good", "uplifted", "euphoric"],
            MoodBand::Upbeat => ["okay", "hopeful", "radiant"],
            MoodBand::Settled => ["calm", "warm", "confident"],
            MoodBand::Easy => ["steady", "content", "relieved"],
            MoodBand::Mixed => ["mixed", "unclear", "volatile"],
            MoodBand::Tense => ["tense", "uneasy", "anxious"],
            MoodBand::Grim => ["grim", "strained", "fraying"],
            MoodBand::Dire => ["sad", "dread", "panicked"],
            MoodBand::Bleak => ["bad", "bleak", "catastrophic"],
        }
    }

    pub fn label(&self, tier: Tier) -> &'static str {
        let labels = self.labels();
        match tier {
            Tier::Mild => labels[0],
            Tier::Moderate => labels[1],
            Tier::Strong => labels[2],
        }
    }

    pub fn tone(&self) -> MoodTone {
        match self {
            MoodBand::Elated | MoodBand::Upbeat => MoodTone::Bright,
            MoodBand::Settled | MoodBand::Easy => MoodTone::Mellow,
            MoodBand::Mixed | MoodBand::Tense | MoodBand::Grim => MoodTone::Uneasy,
            MoodBand::Dire | MoodBand::Bleak => MoodTone::Dark,
        }
    }
}

/// Positive and negative lexicon hits for a span of text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mood {
    pub positive: usize,
    pub negative: usize,
}

impl Mood {
    pub fn new(positive: usize, negative: usize) -> Self {
        Self { positive, negative }
    }

    /// Count hits among already tokenized words.
    pub fn from_tokens<S: AsRef<str>>(tokens: &[S], lexicon: &Lexicon) -> Self {
        let (positive, negative) = lexicon.polarity(tokens);
        Self { positive, negative }
    }

    /// Total number of hits.
    pub fn intensity(&self) -> usize {
        self.positive + self.negative
    }

    /// Balance in [-1, 1], or `None` when there are no hits.
    pub fn score(&self) -> Option<f64> {
        let total = self.intensity();
        if total == 0 {
            return None;
        }
        Some((self.positive as f64 - self.negative as f64) / total as f64)
    }

    pub fn band(&self) -> Option<MoodBand> {
        self.score().map(MoodBand::from_score)
    }

    pub fn tier(&self) -> Tier {
        Tier::from_intensity(self.intensity())
    }

    pub fn tone(&self) -> Option<MoodTone> {
        self.band().map(|band| band.tone())
    }

    /// Lattice label, or [`BLANK_LABEL`] with no hits.
    pub fn label(&self) -> &'static str {
        match self.band() {
            Some(band) => band.label(self.tier()),
            None => BLANK_LABEL,
        }
    }
}

impl Add for Mood {
    type Output = Mood;

    fn add(self, other: Mood) -> Mood {
        Mood::new(self.positive + other.positive, self.negative + other.negative)
    }
}

impl AddAssign for Mood {
    fn add_assign(&mut self, other: Mood) {
        *self = *self + other;
    }
}

impl std::iter::Sum for Mood {
    fn sum<I: Iterator<Item = Mood>>(iter: I) -> Mood {
        iter.fold(Mood::default(), Add::add)
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (+{} / -{})", self.label(), self.positive, self.negative)
    }
}
