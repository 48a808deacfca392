use regex::Regex;
use thiserror::Error;

use crate::fs::EntryKind;

/// How a rule turns capture groups into numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capture {
    /// Group 1 is the season number
    Season,
    /// Group 1 is the season, the last group is the episode
    SeasonEpisode,
    /// Group 1 is the episode number
    Episode,
}

/// One row of the pattern table
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub name: String,
    pub kind: EntryKind,
    pub regex: Regex,
    pub capture: Capture,
}

/// Result of classifying an entry name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameMatch {
    Season {
        season: u32,
        rule: String,
    },
    Episode {
        /// Season embedded in the file name, if the rule carries one
        season: Option<u32>,
        episode: u32,
        extension: String,
        rule: String,
    },
}

impl NameMatch {
    /// Name of the table row that produced this match
    pub fn rule(&self) -> &str {
        match self {
            NameMatch::Season { rule, .. } => rule,
            NameMatch::Episode { rule, .. } => rule,
        }
    }
}

#[derive(Error, Debug)]
pub enum MatcherError {
    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Pattern '{pattern}' has no capture group for the number to extract")]
    MissingCapture { pattern: String },
}
