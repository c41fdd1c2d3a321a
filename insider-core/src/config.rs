//! Engine configuration: the character roster, the word lists, and output limits.
//!
//! Everything the scorers need is carried by an [`InsiderConfig`] value handed to
//! the engine at construction, so different rosters and lexicons can be used side
//! by side (in tests, or for different campaigns).

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Character '{0}' is listed more than once in the roster")]
    DuplicateCharacter(String),

    #[error("Roster entry has an empty name")]
    EmptyName,

    #[error("Character '{0}' has an empty alias")]
    EmptyAlias(String),

    #[error("Character '{0}' lists the same alias more than once")]
    DuplicateAlias(String),

    #[error("Alias pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

// ============================================================================
// Characters and Roster
// ============================================================================

/// A tracked character and the strings that count as a mention of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    /// Unique display name, also used as the key in every result table.
    pub name: String,

    /// Alias strings matched as whole words. Empty means "match the name".
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Character {
    /// Create a character whose only alias is its own name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    /// Add an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// The strings to match for this character.
    pub fn match_terms(&self) -> Vec<&str> {
        if self.aliases.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.aliases.iter().map(String::as_str).collect()
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.aliases.iter().any(|alias| alias.trim().is_empty()) {
            return Err(ConfigError::EmptyAlias(self.name.clone()));
        }
        // Matching ignores case, so "Kal" and "kal" are the same alias.
        let mut seen = HashSet::new();
        if !self.aliases.iter().all(|alias| seen.insert(alias.to_lowercase())) {
            return Err(ConfigError::DuplicateAlias(self.name.clone()));
        }
        Ok(())
    }
}

/// An ordered set of characters with unique names.
///
/// Order matters only for display: ties in rankings fall back to roster order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Character>", into = "Vec<Character>")]
pub struct Roster {
    characters: Vec<Character>,
}

impl Roster {
    /// Build a roster, rejecting blank entries and duplicate names.
    pub fn new(characters: Vec<Character>) -> Result<Self, ConfigError> {
        let mut seen = HashSet::new();
        for character in &characters {
            character.validate()?;
            if !seen.insert(character.name.as_str()) {
                return Err(ConfigError::DuplicateCharacter(character.name.clone()));
            }
        }
        Ok(Self { characters })
    }

    /// Build a roster, folding duplicate names into one character.
    ///
    /// The first occurrence keeps its position; aliases of later occurrences are
    /// appended when not already present.
    pub fn merged(characters: Vec<Character>) -> Result<Self, ConfigError> {
        for character in &characters {
            character.validate()?;
        }
        Ok(Self {
            characters: fold_duplicates(characters),
        })
    }

    /// The sample campaign party. `azion` is listed twice and folds into one entry.
    pub fn sample() -> Self {
        let names = [
            "zephyr", "sunset", "azion", "yuuyi", "ciel", "kal", "john", "cory", "brian", "jax",
            "cain", "cecilia", "arc", "azion", "erik", "shatter",
        ];
        let characters = names
            .iter()
            .map(|name| Character::new(*name).with_alias(*name))
            .collect();
        Self {
            characters: fold_duplicates(characters),
        }
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    /// Character names in roster order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|c| c.name.as_str())
    }

    pub fn get(&self, name: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}

impl TryFrom<Vec<Character>> for Roster {
    type Error = ConfigError;

    fn try_from(characters: Vec<Character>) -> Result<Self, Self::Error> {
        Roster::new(characters)
    }
}

impl From<Roster> for Vec<Character> {
    fn from(roster: Roster) -> Self {
        roster.characters
    }
}

fn fold_duplicates(characters: Vec<Character>) -> Vec<Character> {
    let mut folded: Vec<Character> = Vec::with_capacity(characters.len());
    for character in characters {
        let terms: Vec<String> = character.match_terms().into_iter().map(str::to_string).collect();
        match folded.iter_mut().find(|c| c.name == character.name) {
            Some(existing) => {
                // An implicit name alias must survive once explicit aliases join it.
                if existing.aliases.is_empty() {
                    existing.aliases.push(existing.name.clone());
                }
                for term in terms {
                    let known = existing
                        .aliases
                        .iter()
                        .any(|alias| alias.to_lowercase() == term.to_lowercase());
                    if !known {
                        existing.aliases.push(term);
                    }
                }
            }
            None => folded.push(character),
        }
    }
    folded
}

// ============================================================================
// Lexicon
// ============================================================================

const POSITIVE_WORDS: &[&str] = &[
    "smile", "smiled", "laugh", "laughed", "happy", "hope", "hopeful", "relief", "safe", "calm",
    "win", "won", "victory", "love", "kind", "warm", "bright", "good", "nice", "okay",
];

const NEGATIVE_WORDS: &[&str] = &[
    "blood", "bleed", "bleeding", "wound", "wounded", "hurt", "pain", "panic", "fear", "afraid",
    "dead", "death", "kill", "killed", "hate", "anger", "angry", "scream", "screamed", "cruel",
    "dark", "cold", "bad", "worse",
];

const COMBAT_WORDS: &[&str] = &[
    "attack", "attacks", "attacked", "hit", "hits", "strike", "strikes", "struck", "stab", "stabs",
    "stabbed", "slash", "slashes", "slashed", "cut", "cuts", "parry", "parries", "parried",
    "block", "blocks", "blocked", "dodge", "dodges", "dodged", "blood", "wound", "wounds",
    "wounded", "kill", "kills", "killed", "dead", "fight", "fights", "fought", "battle",
    "battles", "combat", "spell", "spells", "cast", "casts", "casting", "arrow", "arrows",
    "blade", "sword", "dagger", "gun", "shot", "shots", "shoot", "shoots",
];

const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "if", "then", "than", "so", "to", "of", "in", "on", "at",
    "for", "with", "from", "into", "out", "up", "down", "over", "under", "as", "is", "are", "was",
    "were", "be", "been", "being", "it", "its", "this", "that", "these", "those", "i", "you",
    "he", "she", "they", "we", "me", "him", "her", "them", "my", "your", "his", "hers", "their",
    "our", "mine", "yours", "ours", "theirs", "not", "no", "yes", "just", "very", "really",
    "like", "got", "get", "gets", "getting", "do", "does", "did", "doing", "have", "has", "had",
    "having", "will", "would", "can", "could", "should", "may", "might", "must", "also", "too",
    "only", "again", "all", "any", "some", "more", "most", "much", "many", "few", "each",
    "every", "either", "neither",
];

fn word_set(words: &[&str]) -> HashSet<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Word lists used by the mood, tension and keyword heuristics.
///
/// All entries are lowercase; tokens are lowercased before lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lexicon {
    pub positive: HashSet<String>,
    pub negative: HashSet<String>,
    pub combat: HashSet<String>,
    pub stopwords: HashSet<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            positive: word_set(POSITIVE_WORDS),
            negative: word_set(NEGATIVE_WORDS),
            combat: word_set(COMBAT_WORDS),
            stopwords: word_set(STOPWORDS),
        }
    }
}

impl Lexicon {
    /// A lexicon with every list empty.
    pub fn empty() -> Self {
        Self {
            positive: HashSet::new(),
            negative: HashSet::new(),
            combat: HashSet::new(),
            stopwords: HashSet::new(),
        }
    }

    pub fn is_positive(&self, token: &str) -> bool {
        self.positive.contains(token)
    }

    pub fn is_negative(&self, token: &str) -> bool {
        self.negative.contains(token)
    }

    pub fn is_combat(&self, token: &str) -> bool {
        self.combat.contains(token)
    }

    pub fn is_stopword(&self, token: &str) -> bool {
        self.stopwords.contains(token)
    }

    /// Count positive and negative hits among `tokens`.
    pub fn polarity<S: AsRef<str>>(&self, tokens: &[S]) -> (usize, usize) {
        tokens.iter().fold((0, 0), |(pos, neg), token| {
            let token = token.as_ref();
            (
                pos + usize::from(self.is_positive(token)),
                neg + usize::from(self.is_negative(token)),
            )
        })
    }
}

// ============================================================================
// Engine configuration
// ============================================================================

fn default_evidence_limit() -> usize {
    14
}

fn default_evidence_width() -> usize {
    180
}

fn default_extensions() -> Vec<String> {
    vec!["txt".to_string()]
}

/// Configuration for an [`Insider`](crate::Insider) engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsiderConfig {
    /// Characters to track.
    #[serde(rename = "characters")]
    pub roster: Roster,

    /// Word lists for the heuristics.
    #[serde(default)]
    pub lexicon: Lexicon,

    /// Maximum evidence lines kept per character per file.
    #[serde(default = "default_evidence_limit")]
    pub evidence_limit: usize,

    /// Maximum characters kept from each evidence line.
    #[serde(default = "default_evidence_width")]
    pub evidence_width: usize,

    /// File extensions (without the dot, case-insensitive) treated as transcripts.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for InsiderConfig {
    fn default() -> Self {
        Self::new(Roster::sample())
    }
}

impl InsiderConfig {
    /// Create a config for a roster with the default lexicon and limits.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            lexicon: Lexicon::default(),
            evidence_limit: default_evidence_limit(),
            evidence_width: default_evidence_width(),
            extensions: default_extensions(),
        }
    }

    /// Parse a JSON config. Roster names must be unique.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Set the roster.
    pub fn with_roster(mut self, roster: Roster) -> Self {
        self.roster = roster;
        self
    }

    /// Set the lexicon.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    /// Set how many evidence lines to keep per character per file.
    pub fn with_evidence_limit(mut self, limit: usize) -> Self {
        self.evidence_limit = limit;
        self
    }

    /// Set the maximum length of an evidence line.
    pub fn with_evidence_width(mut self, width: usize) -> Self {
        self.evidence_width = width;
        self
    }

    /// Set the accepted transcript extensions.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    /// Whether `path` has one of the accepted extensions.
    pub fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|accepted| accepted.trim_start_matches('.').eq_ignore_ascii_case(ext))
            })
    }
}
