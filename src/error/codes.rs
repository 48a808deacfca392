#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    ConfigurationError = 2,
    DirectoryNotFound = 3,
    Collision = 4,
    PreconditionFailed = 5,
    ExecutionFailed = 6,
    PermissionError = 7,
    RollbackFailed = 8,
    JournalError = 9,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}
