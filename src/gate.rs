//! Confirmation gate.
//!
//! Execution and rollback are approved by two separate decisions. Automatic
//! mode only covers the first; the second follows the rollback policy.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::str::FromStr;

use clap::ValueEnum;
use thiserror::Error;
use tracing::info;

use crate::journal::Journal;
use crate::output::{display_plan, display_rollback_preview};
use crate::plan::Plan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalMode {
    Interactive,
    Automatic,
}

/// What to do when rollback is offered after execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum RollbackPolicy {
    /// Ask every time
    #[default]
    Ask,
    /// Roll back without asking
    Always,
    /// Keep the changes without asking
    Never,
}

impl FromStr for RollbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ask" | "prompt" => Ok(RollbackPolicy::Ask),
            "always" | "yes" | "true" | "1" => Ok(RollbackPolicy::Always),
            "never" | "no" | "false" | "0" => Ok(RollbackPolicy::Never),
            other => Err(format!(
                "unknown rollback policy '{}' (expected ask, always or never)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Proceed,
    Decline,
}

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Failed to obtain confirmation: {0}")]
    Io(#[from] io::Error),
}

/// Source of yes/no answers
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> io::Result<bool>;
}

/// Asks on a writer and reads one line per answer
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        write!(self.output, "{}", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            // EOF counts as "no"
            writeln!(self.output)?;
            return Ok(false);
        }

        let answer = line.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }
}

pub struct ConfirmationGate<P> {
    mode: ApprovalMode,
    rollback: RollbackPolicy,
    prompter: P,
}

impl<P: Prompter> ConfirmationGate<P> {
    pub fn new(mode: ApprovalMode, rollback: RollbackPolicy, prompter: P) -> Self {
        Self {
            mode,
            rollback,
            prompter,
        }
    }

    /// Show the plan and decide whether to apply it
    pub fn approve_execution(
        &mut self,
        plan: &Plan,
        out: &mut impl Write,
    ) -> Result<Decision, GateError> {
        display_plan(plan, out)?;

        match self.mode {
            ApprovalMode::Automatic => {
                info!("Automatic mode, proceeding without confirmation");
                Ok(Decision::Proceed)
            }
            ApprovalMode::Interactive => self.ask("Proceed? [y/N]: "),
        }
    }

    /// Decide whether to undo the journaled renames
    pub fn approve_rollback(
        &mut self,
        journal: &Journal,
        root: &Path,
        out: &mut impl Write,
    ) -> Result<Decision, GateError> {
        if journal.is_empty() {
            return Ok(Decision::Decline);
        }

        match self.rollback {
            RollbackPolicy::Always => {
                info!("Rollback policy is 'always', rolling back");
                Ok(Decision::Proceed)
            }
            RollbackPolicy::Never => {
                info!("Rollback policy is 'never', keeping changes");
                Ok(Decision::Decline)
            }
            RollbackPolicy::Ask => {
                display_rollback_preview(journal, root, out)?;
                self.ask("Rollback all changes? [y/N]: ")
            }
        }
    }

    fn ask(&mut self, question: &str) -> Result<Decision, GateError> {
        let yes = self.prompter.confirm(question)?;
        info!(question, yes, "Confirmation answered");
        Ok(if yes {
            Decision::Proceed
        } else {
            Decision::Decline
        })
    }
}
