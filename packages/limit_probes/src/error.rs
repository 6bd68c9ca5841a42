use std::io;
use std::num::NonZero;

use thiserror::Error;

/// Errors that can occur when running a probe.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller provided input that could not be interpreted, such as a worker count that is
    /// missing or not a non-negative integer.
    #[error("invalid argument '{invalid_value}': {problem}")]
    InvalidArgument {
        /// The value that was invalid. Empty if the value was missing altogether.
        invalid_value: String,

        /// A human-readable description of the problem.
        problem: String,
    },

    /// More workers were requested than the configured worker limit allows.
    #[error("requested {requested} workers but at most {limit} are allowed")]
    WorkerLimitExceeded {
        /// How many workers were requested.
        requested: usize,

        /// The configured upper bound.
        limit: NonZero<usize>,
    },

    /// The operating system refused to start a worker thread.
    #[error("failed to start worker {index}: {source}")]
    SpawnFailed {
        /// Zero-based index of the worker that failed to start.
        index: usize,

        /// The underlying operating system error.
        #[source]
        source: io::Error,
    },

    /// The report could not be written to its destination.
    #[error("failed to write report: {0}")]
    Output(#[from] io::Error),
}

impl Error {
    pub(crate) fn invalid_argument(
        invalid_value: impl Into<String>,
        problem: impl Into<String>,
    ) -> Self {
        Self::InvalidArgument {
            invalid_value: invalid_value.into(),
            problem: problem.into(),
        }
    }
}

/// A specialized `Result` type for probe operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = std::result::Result<T, Error>;
