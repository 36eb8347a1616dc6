//! # Paraperm - distributed random permutation engine
//!
//! A single stateless SPMD procedure, executed identically on every rank of
//! a fixed process group, that produces a uniformly random permutation of
//! `{0, .., n-1}` without ever materialising the full sequence on any one
//! process. On completion each rank holds a contiguous block of the
//! permuted sequence.
//!
//! The algorithm is the distributed scatter / shuffle / redistribute
//! permutation attributed to Sanders: route every index to a random rank
//! (bulk all-to-all), shuffle what lands locally (Fisher-Yates), then
//! re-block the shuffled sequence back onto its canonical owners by
//! position (prefix-scan-driven point-to-point exchange).

pub mod engine;
pub mod error;
pub mod layout;
pub mod rng;
pub mod transport;

pub use engine::{permute, permute_async};
pub use error::{PermuteError, Result, TransportError};
pub use layout::BlockLayout;
pub use rng::EntropySource;
pub use transport::{InboundSlice, OutboundSlice, Transport};

/// Install a `tracing` subscriber suitable for a single-rank process.
///
/// Hosts that drive several ranks as OS processes (the normal MPI launch
/// model) should call this once per process, typically after the rank is
/// known, so log lines can be tagged by rank at the call sites in
/// [`engine`].
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .try_init();
}
