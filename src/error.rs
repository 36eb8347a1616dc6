//! Error taxonomy for the permutation engine (spec §7).
//!
//! Two layers, matching the teacher's pattern of one crate-wide enum with
//! `#[from]` wiring: [`TransportError`] covers failures internal to a
//! [`crate::Transport`] implementation, [`PermuteError`] is what the engine
//! surfaces to callers. All errors are fatal to the call in progress; the
//! engine makes no attempt at cross-rank agreement on error state.

/// Failures raised by a [`crate::Transport`] implementation.
#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    /// A collective (all-to-all, scan, barrier) did not complete
    /// successfully.
    #[error("collective operation failed: {0}")]
    Collective(String),

    /// A point-to-point exchange violated the HEADER-before-PAYLOAD
    /// ordering contract of spec §4.5, or delivered more data than the
    /// receiver asked for.
    #[error("protocol violation: {0}")]
    Protocol(String),
}

/// Errors surfaced by [`crate::permute`] and [`crate::permute_async`].
#[derive(thiserror::Error, Debug)]
pub enum PermuteError {
    /// `P <= 0` (spec §4.1, §7 "Input error").
    #[error("process group size must be positive, got {0}")]
    InvalidGroupSize(i32),

    /// `r * m` overflowed the chosen index width while computing the
    /// block layout (spec §4.1).
    #[error("block layout overflow computing rank {rank}'s offset for n={n}")]
    LayoutOverflow { n: u64, rank: i32 },

    /// A transport-level failure, tagged with the operation that raised it
    /// so the structured error names "operation + short description" as
    /// required by spec §7.
    #[error("transport error during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: TransportError,
    },
}

pub type Result<T> = std::result::Result<T, PermuteError>;

pub(crate) trait WithOperation<T> {
    fn with_operation(self, operation: &'static str) -> Result<T>;
}

impl<T> WithOperation<T> for std::result::Result<T, TransportError> {
    fn with_operation(self, operation: &'static str) -> Result<T> {
        self.map_err(|source| PermuteError::Transport { operation, source })
    }
}
