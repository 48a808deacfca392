mod types;

pub use types::*;

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use tracing::trace;

use crate::fs::EntryKind;

// Season folders, in priority order.
// "Season 1", "SEASON.01", "season_02", "Season-3"
// "S01", "Show S02 1080p", "Foo_S03"
const BUILTIN_SEASON_RULES: &[(&str, &str)] = &[
    ("season-word", r"(?i)(?:^|[^a-z])season[\s._-]*(\d{1,2})(?:$|\D)"),
    ("s-token", r"(?i)(?:^|[\s._-])s(\d{1,2})(?:$|[\s._-])"),
];

// Episode files, matched against the stem, in priority order.
// "Show.S01E02.720p", "s1.e2"
// "1x02"
// "E02", "ep02", "Episode 2"
const BUILTIN_EPISODE_RULES: &[(&str, &str, Capture)] = &[
    (
        "season-episode",
        r"(?i)(?:^|[^a-z])s(\d{1,2})[\s._-]?e(\d{1,3})(?:$|\D)",
        Capture::SeasonEpisode,
    ),
    (
        "cross",
        r"(?i)(?:^|\D)(\d{1,2})x(\d{2,3})(?:$|\D)",
        Capture::SeasonEpisode,
    ),
    (
        "episode-marker",
        r"(?i)(?:^|[^a-z])e(?:p(?:isode)?)?[\s._-]*(\d{1,3})(?:$|\D)",
        Capture::Episode,
    ),
];

static BUILTIN_TABLE: Lazy<PatternTable> = Lazy::new(|| {
    let season_rules = BUILTIN_SEASON_RULES
        .iter()
        .map(|(name, pattern)| PatternRule {
            name: name.to_string(),
            kind: EntryKind::Folder,
            regex: Regex::new(pattern).unwrap(),
            capture: Capture::Season,
        })
        .collect();

    let episode_rules = BUILTIN_EPISODE_RULES
        .iter()
        .map(|(name, pattern, capture)| PatternRule {
            name: name.to_string(),
            kind: EntryKind::File,
            regex: Regex::new(pattern).unwrap(),
            capture: *capture,
        })
        .collect();

    PatternTable {
        season_rules,
        episode_rules,
    }
});

/// Ordered season and episode rules. The first matching rule wins.
#[derive(Debug, Clone)]
pub struct PatternTable {
    season_rules: Vec<PatternRule>,
    episode_rules: Vec<PatternRule>,
}

impl Default for PatternTable {
    fn default() -> Self {
        BUILTIN_TABLE.clone()
    }
}

impl PatternTable {
    /// Build a table from user-supplied patterns. An empty list keeps the
    /// built-in rules for that kind.
    pub fn with_overrides(
        season_patterns: &[String],
        episode_patterns: &[String],
    ) -> Result<Self, MatcherError> {
        let mut table = Self::default();

        if !season_patterns.is_empty() {
            table.season_rules = season_patterns
                .iter()
                .enumerate()
                .map(|(i, p)| custom_rule(i, p, EntryKind::Folder))
                .collect::<Result<_, _>>()?;
        }

        if !episode_patterns.is_empty() {
            table.episode_rules = episode_patterns
                .iter()
                .enumerate()
                .map(|(i, p)| custom_rule(i, p, EntryKind::File))
                .collect::<Result<_, _>>()?;
        }

        Ok(table)
    }

    /// Classify a name. `None` means "unknown, leave alone".
    pub fn classify(&self, name: &str, kind: EntryKind) -> Option<NameMatch> {
        match kind {
            EntryKind::Folder => self.match_season(name),
            EntryKind::File => self.match_episode(name),
        }
    }

    fn match_season(&self, name: &str) -> Option<NameMatch> {
        for rule in &self.season_rules {
            let Some(caps) = rule.regex.captures(name) else {
                continue;
            };
            let Some(season) = number_at(&caps, 1) else {
                continue;
            };

            trace!(name, rule = %rule.name, season, "Season folder matched");

            return Some(NameMatch::Season {
                season,
                rule: rule.name.clone(),
            });
        }

        None
    }

    fn match_episode(&self, name: &str) -> Option<NameMatch> {
        let path = Path::new(name);
        let extension = path.extension()?.to_str()?.to_string();
        let stem = path.file_stem()?.to_str()?;

        for rule in &self.episode_rules {
            let Some(caps) = rule.regex.captures(stem) else {
                continue;
            };

            let (season, episode) = match rule.capture {
                Capture::SeasonEpisode => {
                    let last = caps.len() - 1;
                    (number_at(&caps, 1), number_at(&caps, last))
                }
                Capture::Episode | Capture::Season => (None, number_at(&caps, 1)),
            };
            let Some(episode) = episode else {
                continue;
            };

            trace!(name, rule = %rule.name, episode, "Episode file matched");

            return Some(NameMatch::Episode {
                season,
                episode,
                extension,
                rule: rule.name.clone(),
            });
        }

        None
    }
}

fn custom_rule(index: usize, pattern: &str, kind: EntryKind) -> Result<PatternRule, MatcherError> {
    let label = match kind {
        EntryKind::Folder => "season",
        EntryKind::File => "episode",
    };

    let regex = Regex::new(pattern).map_err(|source| MatcherError::InvalidPattern {
        kind: label,
        pattern: pattern.to_string(),
        source,
    })?;

    // captures_len counts the implicit whole-match group
    let groups = regex.captures_len() - 1;
    let capture = match (kind, groups) {
        (_, 0) => {
            return Err(MatcherError::MissingCapture {
                pattern: pattern.to_string(),
            })
        }
        (EntryKind::Folder, _) => Capture::Season,
        (EntryKind::File, 1) => Capture::Episode,
        (EntryKind::File, _) => Capture::SeasonEpisode,
    };

    Ok(PatternRule {
        name: format!("custom-{}-{}", label, index + 1),
        kind,
        regex,
        capture,
    })
}

fn number_at(caps: &regex::Captures<'_>, group: usize) -> Option<u32> {
    caps.get(group)?.as_str().parse().ok()
}
