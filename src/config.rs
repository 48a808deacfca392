use std::env;
use std::path::PathBuf;
use thiserror::Error;
use tracing::debug;

use crate::cli::Args;
use crate::gate::{ApprovalMode, RollbackPolicy};
use crate::matcher::{MatcherError, PatternTable};

/// Environment variable names. These can also be set in a `.env` file in the
/// working directory.
pub const ENV_SERIES_ROOT: &str = "SERIES_ROOT";
pub const ENV_MOUNT_POINT: &str = "MOUNT_POINT";
pub const ENV_SERIES_NAME: &str = "SERIES_NAME";
pub const ENV_AUTO_RUN: &str = "AUTO_RUN";
pub const ENV_AUTO_ROLLBACK: &str = "AUTO_ROLLBACK";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No series root given (pass ROOT or set SERIES_ROOT / MOUNT_POINT)")]
    MissingRoot,

    #[error("No series name given (pass --name or set SERIES_NAME)")]
    MissingSeries,

    #[error("Invalid series name '{0}': must be non-empty and contain no path separators")]
    InvalidSeries(String),

    #[error("Invalid AUTO_ROLLBACK: {0}")]
    InvalidRollbackPolicy(String),

    #[error(transparent)]
    Pattern(#[from] MatcherError),
}

/// Everything a run needs, resolved once and passed down explicitly
#[derive(Debug, Clone)]
pub struct Config {
    pub root: PathBuf,
    pub series: String,
    pub mode: ApprovalMode,
    pub rollback: RollbackPolicy,
    pub patterns: PatternTable,
    pub dry_run: bool,
    pub save_journal: bool,
}

impl Config {
    /// Resolve from CLI arguments and the process environment
    pub fn from_env(args: &Args) -> Result<Self, ConfigError> {
        Self::resolve(args, |key| env::var(key).ok())
    }

    /// CLI arguments take precedence over values from `lookup`
    pub fn resolve<F>(args: &Args, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let root = args
            .root
            .clone()
            .or_else(|| non_empty(lookup(ENV_SERIES_ROOT)).map(PathBuf::from))
            .or_else(|| non_empty(lookup(ENV_MOUNT_POINT)).map(PathBuf::from))
            .ok_or(ConfigError::MissingRoot)?;

        let series = args
            .name
            .clone()
            .or_else(|| lookup(ENV_SERIES_NAME))
            .ok_or(ConfigError::MissingSeries)?;
        let series = validate_series(series)?;

        let auto = args.auto || lookup(ENV_AUTO_RUN).map(|v| is_truthy(&v)).unwrap_or(false);
        let mode = if auto {
            ApprovalMode::Automatic
        } else {
            ApprovalMode::Interactive
        };

        let rollback = resolve_rollback_policy(args, &lookup)?;
        let patterns = PatternTable::with_overrides(&args.season_patterns, &args.episode_patterns)?;

        let config = Self {
            root,
            series,
            mode,
            rollback,
            patterns,
            dry_run: args.dry,
            save_journal: args.save_journal,
        };

        debug!(
            root = ?config.root,
            series = %config.series,
            mode = ?config.mode,
            rollback = ?config.rollback,
            "Configuration resolved"
        );

        Ok(config)
    }
}

/// Rollback policy alone, for runs that only revert a journal
pub fn resolve_rollback_policy<F>(args: &Args, lookup: F) -> Result<RollbackPolicy, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(policy) = args.rollback {
        return Ok(policy);
    }

    match non_empty(lookup(ENV_AUTO_ROLLBACK)) {
        Some(value) => value.parse().map_err(ConfigError::InvalidRollbackPolicy),
        None => Ok(RollbackPolicy::default()),
    }
}

fn validate_series(series: String) -> Result<String, ConfigError> {
    let trimmed = series.trim();
    if trimmed.is_empty()
        || trimmed.contains(['/', '\\', '\0'])
        || trimmed == "."
        || trimmed == ".."
    {
        return Err(ConfigError::InvalidSeries(series));
    }
    Ok(trimmed.to_string())
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
