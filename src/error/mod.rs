mod codes;

pub use codes::ExitCode;

use crate::config::ConfigError;
use crate::executor::ExecuteError;
use crate::gate::GateError;
use crate::journal::{JournalEntry, JournalError};
use crate::plan::PlanError;
use crate::rollback::RollbackError;
use crate::scanner::ScannerError;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Target directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("Path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: PathBuf },

    #[error("Naming collision in {directory}: {destination}")]
    Collision {
        directory: PathBuf,
        destination: String,
        sources: Vec<String>,
    },

    #[error("Precondition failed at operation {index} of {total}: {message}")]
    Precondition {
        message: String,
        applied: usize,
        index: usize,
        total: usize,
    },

    #[error("Rename failed at operation {index} of {total}: {message}")]
    Execution {
        message: String,
        applied: usize,
        index: usize,
        total: usize,
    },

    #[error("Rollback incomplete: {message}")]
    Rollback {
        message: String,
        restored: usize,
        pending: Vec<JournalEntry>,
    },

    #[error("Journal file error: {message}")]
    Journal { path: PathBuf, message: String },

    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Execution stopped at `index`; `applied` renames were journaled first
    pub fn execution(error: ExecuteError, index: usize, total: usize, applied: usize) -> Self {
        let message = error.to_string();
        if error.is_precondition() {
            AppError::Precondition {
                message,
                applied,
                index,
                total,
            }
        } else {
            AppError::Execution {
                message,
                applied,
                index,
                total,
            }
        }
    }

    /// Writing user-facing output failed
    pub fn output(err: io::Error) -> Self {
        AppError::Other(format!("Failed to display output: {}", err))
    }

    pub fn journal_at(path: &Path, err: JournalError) -> Self {
        AppError::Journal {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn exit_code(&self) -> ExitCode {
        match self {
            AppError::Configuration { .. } => ExitCode::ConfigurationError,
            AppError::DirectoryNotFound { .. } => ExitCode::DirectoryNotFound,
            AppError::NotADirectory { .. } => ExitCode::DirectoryNotFound,
            AppError::PermissionDenied { .. } => ExitCode::PermissionError,
            AppError::Collision { .. } => ExitCode::Collision,
            AppError::Precondition { .. } => ExitCode::PreconditionFailed,
            AppError::Execution { .. } => ExitCode::ExecutionFailed,
            AppError::Rollback { .. } => ExitCode::RollbackFailed,
            AppError::Journal { .. } => ExitCode::JournalError,
            AppError::Other(_) => ExitCode::GeneralError,
        }
    }

    pub fn detailed_message(&self) -> String {
        match self {
            AppError::Configuration { message } => {
                format!(
                    "{}\n\n\
                     Run with --help to see the available options.",
                    message
                )
            }

            AppError::DirectoryNotFound { path } => {
                format!(
                    "The specified directory does not exist:\n  {}\n\n\
                     Please verify the path and try again.",
                    path.display()
                )
            }

            AppError::NotADirectory { path } => {
                format!(
                    "The specified path is not a directory:\n  {}\n\n\
                     Please provide a valid directory path.",
                    path.display()
                )
            }

            AppError::PermissionDenied { path } => {
                format!(
                    "Permission denied when accessing:\n  {}\n\n\
                     Please check file permissions or run with appropriate privileges.",
                    path.display()
                )
            }

            AppError::Collision {
                directory,
                destination,
                sources,
            } => {
                let mut msg = format!(
                    "Cannot build a rename plan: more than one entry would be named\n  {}\n\
                     in {}\n\n",
                    destination,
                    directory.display()
                );

                msg.push_str("Conflicting entries:\n");
                for source in sources.iter().take(10) {
                    msg.push_str(&format!("  - {}\n", source));
                }
                if sources.len() > 10 {
                    msg.push_str(&format!("  ... and {} more\n", sources.len() - 10));
                }

                msg.push_str("\nNo changes were made. Resolve the conflict and run again.");
                msg
            }

            AppError::Precondition {
                message,
                applied,
                index,
                total,
            } => {
                format!(
                    "The filesystem changed after the plan was built.\n\
                     Operation {} of {}: {}\n\n\
                     {} renames were applied before stopping.",
                    index, total, message, applied
                )
            }

            AppError::Execution {
                message,
                applied,
                index,
                total,
            } => {
                format!(
                    "Rename failed at operation {} of {}:\n  {}\n\n\
                     {} renames were applied before stopping.\n\
                     Check file permissions and ensure no files are open.",
                    index, total, message, applied
                )
            }

            AppError::Rollback {
                message,
                restored,
                pending,
            } => {
                let mut msg = format!(
                    "Rollback stopped after restoring {} entries:\n  {}\n\n",
                    restored, message
                );

                msg.push_str(&format!(
                    "These {} entries still have their new names and must be restored manually:\n",
                    pending.len()
                ));
                for entry in pending {
                    msg.push_str(&format!(
                        "  {}  ->  {}\n",
                        entry.applied.display(),
                        entry.original.display()
                    ));
                }
                msg
            }

            AppError::Journal { path, message } => {
                format!(
                    "Journal file error:\n  {}\nFile: {}\n\n\
                     Ensure the journal file exists and is valid JSON.",
                    message,
                    path.display()
                )
            }

            AppError::Other(message) => message.clone(),
        }
    }
}

impl From<ScannerError> for AppError {
    fn from(err: ScannerError) -> Self {
        match err {
            ScannerError::PathNotFound(path) => AppError::DirectoryNotFound { path },
            ScannerError::NotADirectory(path) => AppError::NotADirectory { path },
            ScannerError::PermissionDenied(path) => AppError::PermissionDenied { path },
            e @ ScannerError::IoError { .. } => AppError::Other(format!("I/O error: {}", e)),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Scan(e) => e.into(),
            PlanError::Collision {
                directory,
                destination,
                sources,
            } => AppError::Collision {
                directory,
                destination,
                sources,
            },
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<RollbackError> for AppError {
    fn from(err: RollbackError) -> Self {
        AppError::Rollback {
            message: err.error.to_string(),
            restored: err.restored,
            pending: err.pending,
        }
    }
}

impl From<GateError> for AppError {
    fn from(err: GateError) -> Self {
        AppError::Other(err.to_string())
    }
}
