use clap::Parser;
use std::path::PathBuf;

use crate::gate::RollbackPolicy;

#[derive(Parser, Debug)]
#[command(name = "series-renamer")]
#[command(author, version, long_about = None)]
#[command(about = "Normalize TV series season folders and episode files, with full rollback")]
pub struct Args {
    /// Series root containing season folders [env: SERIES_ROOT, MOUNT_POINT]
    pub root: Option<PathBuf>,

    /// Series name used in new names, e.g. "Foo" -> Foo_S01E02.mkv [env: SERIES_NAME]
    #[arg(short, long)]
    pub name: Option<String>,

    /// Apply the plan without asking for confirmation [env: AUTO_RUN]
    #[arg(short = 'y', long)]
    pub auto: bool,

    /// What to do when rollback is offered after renaming [env: AUTO_ROLLBACK]
    #[arg(long, value_enum, value_name = "POLICY")]
    pub rollback: Option<RollbackPolicy>,

    /// Replace the built-in season folder patterns (repeatable, tried in order)
    #[arg(long = "season-pattern", value_name = "REGEX")]
    pub season_patterns: Vec<String>,

    /// Replace the built-in episode file patterns (repeatable, tried in order)
    #[arg(long = "episode-pattern", value_name = "REGEX")]
    pub episode_patterns: Vec<String>,

    /// Show the plan without modifying the filesystem
    #[arg(short, long)]
    pub dry: bool,

    /// Write the rename journal into the root after execution
    #[arg(long)]
    pub save_journal: bool,

    /// Roll back a previous run using its journal file
    #[arg(short, long, value_name = "JOURNAL_FILE")]
    pub revert: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
