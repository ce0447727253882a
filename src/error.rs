use crate::script::{Op, Outcome};
use std::io;
use thiserror::Error;

/// Errors raised when building a container or running a script against one.
#[derive(Debug, Error)]
pub enum Error {
    /// The (a,b)-tree parameters violate `2 <= a <= ceil(b / 2)`.
    #[error("invalid (a,b)-tree parameters ({a}, {b}): need 2 <= a <= ceil(b / 2)")]
    InvalidParams { a: usize, b: usize },

    /// A script or expectations file is malformed.
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    /// A container disagreed with the expectations for a script.
    #[error("{op}: expected {expected}, got {actual}")]
    Mismatch { op: Op, expected: Outcome, actual: Outcome },

    /// The expectations ran out before the script's queries did.
    #[error("{op}: no expected outcome")]
    MissingOutcome { op: Op },

    /// Reading or writing a script file failed.
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
