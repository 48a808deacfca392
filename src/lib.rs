pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod fs;
pub mod gate;
pub mod journal;
pub mod logging;
pub mod matcher;
pub mod output;
pub mod plan;
pub mod progress;
pub mod rollback;
pub mod scanner;
pub mod session;

pub use config::{Config, ConfigError};
pub use error::{AppError, ExitCode};
pub use executor::{execute, ExecuteError, ExecutionFailure};
pub use fs::{EntryKind, Filesystem, LocalFs};
pub use gate::{ApprovalMode, ConfirmationGate, Decision, Prompter, RollbackPolicy};
pub use journal::{Journal, JournalEntry, JournalFile};
pub use matcher::{NameMatch, PatternTable};
pub use plan::{build_plan, Operation, Plan, PlanError};
pub use rollback::{rollback, RollbackError};
pub use scanner::{scan_entries, validate_root, Entry, ScannerError};
pub use session::{apply_plan, offer_rollback};
