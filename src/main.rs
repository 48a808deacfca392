use std::env;
use std::io;
use std::path::Path;

use clap::Parser;
use series_renamer::cli::Args;
use series_renamer::config::{resolve_rollback_policy, Config};
use series_renamer::error::AppError;
use series_renamer::fs::LocalFs;
use series_renamer::gate::{ApprovalMode, ConfirmationGate, Decision, TerminalPrompter};
use series_renamer::journal::read_journal;
use series_renamer::logging;
use series_renamer::output::display_dry_run;
use series_renamer::plan::build_plan;
use series_renamer::progress::{should_use_colors, Progress};
use series_renamer::scanner::validate_root;
use series_renamer::session::{apply_plan, offer_rollback};
use tracing::{debug, error, info};

fn main() {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    logging::init(args.verbose);

    debug!("Environment loaded");

    if let Err(e) = run(args) {
        error!("{}", e);
        eprintln!("\nError: {}", e.detailed_message());
        std::process::exit(e.exit_code().into());
    }
}

fn run(args: Args) -> Result<(), AppError> {
    let mut progress = Progress::new_with_ui(args.verbose > 0, should_use_colors());

    if let Some(journal_path) = &args.revert {
        return revert(&args, journal_path, &mut progress);
    }

    let config = Config::from_env(&args)?;
    validate_root(&LocalFs, &config.root)?;

    // Step 1: Build the plan
    progress.plan_start(&config.root);
    let plan = build_plan(&LocalFs, &config.root, &config.series, &config.patterns)?;
    info!(operations = plan.len(), "Plan built");

    let mut stdout = io::stdout();

    if plan.is_empty() {
        println!("Nothing to rename.");
        return Ok(());
    }

    if config.dry_run {
        display_dry_run(&plan, &mut stdout).map_err(AppError::output)?;
        return Ok(());
    }

    // Step 2: Confirm
    let mut gate = ConfirmationGate::new(config.mode, config.rollback, TerminalPrompter::stdio());
    if gate.approve_execution(&plan, &mut stdout)? == Decision::Decline {
        println!("Aborted. No changes applied.");
        return Ok(());
    }

    // Step 3: Execute, report, offer rollback
    apply_plan(
        &plan,
        &config,
        &LocalFs,
        &mut gate,
        &mut progress,
        &mut stdout,
        &mut io::stderr(),
    )
}

fn revert(args: &Args, journal_path: &Path, progress: &mut Progress) -> Result<(), AppError> {
    info!("Revert mode: {:?}", journal_path);

    let file = read_journal(journal_path).map_err(|e| AppError::journal_at(journal_path, e))?;
    validate_root(&LocalFs, &file.root)?;

    let journal = file.to_journal();
    if journal.is_empty() {
        println!("Journal is empty. Nothing to roll back.");
        return Ok(());
    }

    let policy = resolve_rollback_policy(args, |key| env::var(key).ok())?;
    let mut gate = ConfirmationGate::new(ApprovalMode::Interactive, policy, TerminalPrompter::stdio());

    offer_rollback(
        &mut gate,
        &journal,
        &file.root,
        &LocalFs,
        progress,
        &mut io::stdout(),
    )
}
