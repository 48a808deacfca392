//! Applying an approved plan and offering to undo it afterwards.

use std::io::Write;
use std::path::Path;

use tracing::{error, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::executor::{execute, ExecutionFailure};
use crate::fs::Filesystem;
use crate::gate::{ConfirmationGate, Decision, Prompter};
use crate::journal::{write_journal, Journal, JournalFile, Outcome};
use crate::output::display_execution_result;
use crate::plan::Plan;
use crate::progress::Progress;
use crate::rollback::rollback;

/// Execute `plan`, report the result, then pass the journal to the rollback gate.
///
/// When both execution and rollback fail, the execution error is written to
/// `err` and the rollback error is returned.
pub fn apply_plan<F, P>(
    plan: &Plan,
    config: &Config,
    fs: &F,
    gate: &mut ConfirmationGate<P>,
    progress: &mut Progress,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<(), AppError>
where
    F: Filesystem + ?Sized,
    P: Prompter,
{
    let (journal, failure) = match execute(plan, fs, progress) {
        Ok(journal) => (journal, None),
        Err(ExecutionFailure {
            error,
            index,
            total,
            journal,
        }) => {
            let applied = journal.len();
            (journal, Some(AppError::execution(error, index, total, applied)))
        }
    };

    display_execution_result(plan, &journal, out).map_err(AppError::output)?;

    if config.save_journal && !journal.is_empty() {
        let outcome = if failure.is_some() {
            Outcome::Partial
        } else {
            Outcome::Complete
        };
        save_journal(&journal, config, outcome, progress);
    }

    let rolled_back = offer_rollback(gate, &journal, plan.root(), fs, progress, out);

    match (failure, rolled_back) {
        (Some(execution), Err(rollback_error)) => {
            error!("{}", execution);
            if let Err(e) = writeln!(err, "\nError: {}", execution.detailed_message()) {
                warn!("Failed to report execution error: {}", e);
            }
            Err(rollback_error)
        }
        (Some(execution), Ok(())) => Err(execution),
        (None, result) => result,
    }
}

/// Ask the gate about `journal` and reverse it if approved
pub fn offer_rollback<F, P>(
    gate: &mut ConfirmationGate<P>,
    journal: &Journal,
    root: &Path,
    fs: &F,
    progress: &mut Progress,
    out: &mut impl Write,
) -> Result<(), AppError>
where
    F: Filesystem + ?Sized,
    P: Prompter,
{
    match gate.approve_rollback(journal, root, out)? {
        Decision::Proceed => {
            rollback(journal, root, fs, progress)?;
        }
        Decision::Decline if !journal.is_empty() => {
            writeln!(out, "Keeping {} renamed entries.", journal.len()).map_err(AppError::output)?;
        }
        Decision::Decline => {}
    }

    Ok(())
}

fn save_journal(journal: &Journal, config: &Config, outcome: Outcome, progress: &mut Progress) {
    let file = JournalFile::from_journal(journal, &config.root, &config.series, outcome);
    match write_journal(&file, &config.root) {
        Ok(path) => progress.journal_written(&path),
        Err(e) => {
            // The journal is still in memory; rollback can proceed without it
            warn!("Failed to save journal: {}", e);
            progress.warn(&format!("Failed to save journal: {}", e));
        }
    }
}
