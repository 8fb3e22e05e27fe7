use std::fmt;
use std::path::PathBuf;

/// Failures raised by [`Tape`](crate::Tape) addressing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TapeError {
    /// The head would land at or past the last cell.
    #[error("address {address} is out of range for a {capacity}-cell tape")]
    RangeOverflow { address: usize, capacity: usize },

    /// The head would move left of cell 0.
    #[error("cannot move the head left of cell 0")]
    RangeUnderflow,

    /// `move_to` on a tape with no cells.
    #[error("tape has no cells for the head to point at")]
    HeadPointer,

    /// `shift_right` on a tape with no cells.
    #[error("cannot shift the head of an empty tape")]
    Shift,

    /// A cell mutation on a tape with no cells.
    #[error("cannot write to an empty tape")]
    Write,

    /// A cell read on a tape with no cells.
    #[error("cannot read from an empty tape")]
    Read,

    /// The cells for a tape of this size could not be allocated.
    #[error("cannot allocate a tape of {capacity} cells")]
    Allocation { capacity: usize },
}

/// Which side of a loop was left without a partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketKind {
    Open,
    Close,
}

impl fmt::Display for BracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BracketKind::Open => write!(f, "'['"),
            BracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Errors that can occur while linking or executing a program.
///
/// Every variant carries `ip`, the index of the instruction that failed.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("Unmatched bracket {kind} at instruction {ip}")]
    UnbalancedJump { ip: usize, kind: BracketKind },

    /// A cursor move or cell access was rejected by the tape.
    #[error("Tape error at instruction {ip}: {source}")]
    Tape {
        ip: usize,
        #[source]
        source: TapeError,
    },

    /// A bracket had no entry in the jump table at dispatch time.
    #[error("No jump target for '{op}' at instruction {ip}")]
    UnmappedJump { ip: usize, op: char },

    /// Writing to the output sink failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Output {
        ip: usize,
        #[source]
        source: std::io::Error,
    },

    /// Execution aborted due to step limit.
    #[error("Execution aborted: step limit exceeded ({limit})")]
    StepLimitExceeded { ip: usize, limit: u64 },

    /// Execution aborted due to cooperative cancellation (e.g., Ctrl+C)
    #[error("Execution aborted: cancelled")]
    Canceled { ip: usize },
}

impl EngineError {
    /// Index of the instruction that was being dispatched when the failure happened.
    pub fn ip(&self) -> usize {
        match self {
            EngineError::UnbalancedJump { ip, .. }
            | EngineError::Tape { ip, .. }
            | EngineError::UnmappedJump { ip, .. }
            | EngineError::Output { ip, .. }
            | EngineError::StepLimitExceeded { ip, .. }
            | EngineError::Canceled { ip } => *ip,
        }
    }

    /// Short, user-facing description recorded into [`Diagnostics`](crate::Diagnostics).
    pub fn diagnostic(&self) -> String {
        match self {
            EngineError::UnbalancedJump { kind, .. } => {
                format!("Parse error: unmatched bracket {kind}")
            }
            EngineError::Tape { source, .. } => match source {
                TapeError::RangeOverflow { address, capacity } => format!(
                    "Runtime error: head moved past the end of the tape (address={address}, capacity={capacity})"
                ),
                TapeError::RangeUnderflow => {
                    "Runtime error: head moved left of cell 0".to_string()
                }
                other => format!("Runtime error: {other}"),
            },
            EngineError::UnmappedJump { op, .. } => {
                format!("Internal error: unmapped jump for '{op}'")
            }
            EngineError::Output { source, .. } => format!("I/O error: {source}"),
            EngineError::StepLimitExceeded { limit, .. } => {
                format!("Execution aborted: step limit exceeded ({limit})")
            }
            EngineError::Canceled { .. } => "Execution aborted: cancelled".to_string(),
        }
    }
}

/// Failures while loading a program file from disk.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no such file: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{} is a directory, not a program file", path.display())]
    IsDirectory { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
