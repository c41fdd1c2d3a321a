//! Testing utilities for the statistics engine.
//!
//! This module provides tools for integration testing:
//! - `sample_roster` / `sample_config` for a small, predictable cast
//! - `TranscriptBuilder` for assembling multi-session transcripts
//! - `analyze_documents` for folder-free aggregate tests
//! - `write_transcripts` for populating a scratch folder

use crate::config::{Character, ConfigError, InsiderConfig, Roster};
use crate::stats::{DashboardStats, Insider};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Five characters, one of them with an extra alias.
///
/// Order: kal, john, ciel, jax, cory.
pub fn sample_roster() -> Roster {
    let characters = vec![
        Character::new("kal"),
        Character::new("john").with_alias("john").with_alias("johnny"),
        Character::new("ciel"),
        Character::new("jax"),
        Character::new("cory"),
    ];
    Roster::new(characters).expect("sample roster is valid")
}

/// Default configuration over [`sample_roster`].
pub fn sample_config() -> InsiderConfig {
    InsiderConfig::new(sample_roster())
}

/// How sessions are separated in a built transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// A `---` line.
    Dashes,
    /// Two blank lines.
    BlankLines,
}

/// Builds transcript text one session at a time.
#[derive(Debug, Clone)]
pub struct TranscriptBuilder {
    sessions: Vec<Vec<String>>,
    separator: Separator,
}

impl TranscriptBuilder {
    pub fn new() -> Self {
        Self {
            sessions: vec![Vec::new()],
            separator: Separator::Dashes,
        }
    }

    /// Separate sessions with `separator` instead of dashes.
    pub fn separated_by(mut self, separator: Separator) -> Self {
        self.separator = separator;
        self
    }

    /// Append a line to the current session.
    pub fn line(mut self, text: impl Into<String>) -> Self {
        if let Some(session) = self.sessions.last_mut() {
            session.push(text.into());
        }
        self
    }

    /// Append several lines to the current session.
    pub fn lines<I, S>(self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        lines.into_iter().fold(self, |builder, line| builder.line(line))
    }

    /// Close the current session and start a new one.
    pub fn session(mut self) -> Self {
        self.sessions.push(Vec::new());
        self
    }

    pub fn build(&self) -> String {
        let joint = match self.separator {
            Separator::Dashes => "\n---\n",
            Separator::BlankLines => "\n\n\n",
        };
        self.sessions
            .iter()
            .filter(|session| !session.is_empty())
            .map(|session| session.join("\n"))
            .collect::<Vec<_>>()
            .join(joint)
    }
}

impl Default for TranscriptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyze in-memory `(filename, text)` documents as if they were one folder.
pub fn analyze_documents(
    config: InsiderConfig,
    docs: &[(&str, &str)],
) -> Result<DashboardStats, ConfigError> {
    let insider = Insider::new(config)?;
    let analyses = docs
        .iter()
        .map(|(filename, text)| insider.analyze_text(filename, text))
        .collect();
    Ok(insider.aggregate(analyses))
}

/// Write `(filename, text)` documents into `dir`, returning their paths.
pub fn write_transcripts(dir: &Path, docs: &[(&str, &str)]) -> io::Result<Vec<PathBuf>> {
    docs.iter()
        .map(|(filename, text)| {
            let path = dir.join(filename);
            fs::write(&path, text)?;
            Ok(path)
        })
        .collect()
}
