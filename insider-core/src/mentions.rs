//! Character mention detection.
//!
//! Every alias compiles to a case-insensitive, word-boundary anchored pattern,
//! so "kal" matches in "Kal swings" but not in "a local inn". Matchers are
//! compiled once per engine and reused for every file and every refresh.

use crate::config::{Character, ConfigError, Roster};
use crate::text::truncate_chars;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

/// Something that can locate mentions in a span of text.
pub trait Matcher {
    /// Byte ranges of every match, ordered by start.
    ///
    /// Ranges may overlap when several patterns match the same text, e.g. the
    /// aliases "old tom" and "tom".
    fn spans(&self, text: &str) -> Vec<Range<usize>>;

    /// Whether there is at least one match.
    fn is_match(&self, text: &str) -> bool {
        !self.spans(text).is_empty()
    }

    /// Number of matches.
    fn count(&self, text: &str) -> usize {
        self.spans(text).len()
    }
}

/// A single compiled alias.
#[derive(Debug, Clone)]
pub struct AliasPattern {
    alias: String,
    regex: Regex,
}

impl AliasPattern {
    /// Compile `alias` as a case-insensitive whole-word pattern.
    pub fn new(alias: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&format!(r"(?i)\b{}\b", regex::escape(alias)))?;
        Ok(Self {
            alias: alias.to_string(),
            regex,
        })
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }
}

impl Matcher for AliasPattern {
    fn spans(&self, text: &str) -> Vec<Range<usize>> {
        self.regex.find_iter(text).map(|m| m.range()).collect()
    }

    fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }

    fn count(&self, text: &str) -> usize {
        self.regex.find_iter(text).count()
    }
}

/// All alias patterns of one character.
///
/// Aliases are matched independently, so the count is the sum over aliases.
#[derive(Debug, Clone)]
pub struct CharacterMatcher {
    name: String,
    patterns: Vec<AliasPattern>,
}

impl CharacterMatcher {
    pub fn new(character: &Character) -> Result<Self, regex::Error> {
        let patterns = character
            .match_terms()
            .into_iter()
            .map(AliasPattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: character.name.clone(),
            patterns,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn patterns(&self) -> &[AliasPattern] {
        &self.patterns
    }
}

impl Matcher for CharacterMatcher {
    fn spans(&self, text: &str) -> Vec<Range<usize>> {
        let mut spans: Vec<Range<usize>> = self
            .patterns
            .iter()
            .flat_map(|pattern| pattern.spans(text))
            .collect();
        spans.sort_by_key(|span| (span.start, span.end));
        spans
    }

    fn is_match(&self, text: &str) -> bool {
        self.patterns.iter().any(|pattern| pattern.is_match(text))
    }

    fn count(&self, text: &str) -> usize {
        self.patterns.iter().map(|pattern| pattern.count(text)).sum()
    }
}

/// Compiled matchers for a whole roster, in roster order.
#[derive(Debug, Clone)]
pub struct MentionDetector {
    matchers: Vec<CharacterMatcher>,
}

impl MentionDetector {
    /// Compile every character of `roster`.
    pub fn new(roster: &Roster) -> Result<Self, ConfigError> {
        let matchers = roster
            .characters()
            .iter()
            .map(CharacterMatcher::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    pub fn matchers(&self) -> &[CharacterMatcher] {
        &self.matchers
    }

    pub fn matcher(&self, name: &str) -> Option<&CharacterMatcher> {
        self.matchers.iter().find(|m| m.name == name)
    }

    /// Total whole-word matches of `name`'s aliases in `text`; 0 for unknown names.
    pub fn count(&self, text: &str, name: &str) -> usize {
        self.matcher(name).map_or(0, |m| m.count(text))
    }

    /// Mention counts for every character, zeros included.
    pub fn counts(&self, text: &str) -> BTreeMap<String, usize> {
        self.matchers
            .iter()
            .map(|m| (m.name.clone(), m.count(text)))
            .collect()
    }

    /// The first `limit` lines mentioning `name`, trimmed and cut to `width` characters.
    pub fn lines_with_mentions(
        &self,
        text: &str,
        name: &str,
        limit: usize,
        width: usize,
    ) -> Vec<String> {
        let Some(matcher) = self.matcher(name) else {
            return Vec::new();
        };

        text.lines()
            .filter(|line| matcher.is_match(line))
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .take(limit)
            .map(|line| truncate_chars(line, width).to_string())
            .collect()
    }

    /// Names of the characters mentioned on `line`, sorted.
    pub fn present_set(&self, line: &str) -> Vec<&str> {
        self.matchers
            .iter()
            .filter(|m| m.is_match(line))
            .map(|m| m.name.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
