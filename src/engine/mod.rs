//! The three-phase permutation engine (spec §2, §4.3-§4.5).
//!
//! [`permute`] is the single operation the core exposes: called
//! identically on every rank of a fixed process group, it returns that
//! rank's contiguous slice of a uniformly random permutation of
//! `{0, .., n-1}`. The engine is generic over [`crate::Transport`] so the
//! same code path drives both the real MPI transport and the in-process
//! test harness (spec §9's "polymorphic over a trait set" guidance).

mod redistribute;
mod scatter;
mod shuffle;

use crate::error::{PermuteError, Result};
use crate::layout::BlockLayout;
use crate::rng::EntropySource;
use crate::transport::Transport;

/// Run one `permute(n, group, rng)` call on this rank (spec §6).
///
/// Every rank in `transport`'s group must call this simultaneously with
/// the same `n`; mismatched `n` across ranks is a programming error and is
/// not detected here (spec §6: "behaviour is undefined").
pub fn permute<T: Transport>(
    n: u64,
    transport: &T,
    rng: &mut impl EntropySource,
) -> Result<Vec<u64>> {
    let size = transport.size();
    if size <= 0 {
        return Err(PermuteError::InvalidGroupSize(size));
    }
    let rank = transport.rank();
    let layout = BlockLayout::compute(n, size, rank)?;

    tracing::debug!(rank, pos = layout.pos, count = layout.count, "block layout computed");

    let shuffled_input = scatter::scatter(transport, &layout, rng)?;
    tracing::debug!(rank, received = shuffled_input.len(), "phase 1 scatter complete");

    let mut shuffled = shuffled_input;
    shuffle::fisher_yates(&mut shuffled, rng);
    tracing::debug!(rank, "phase 2 shuffle complete");

    let output = redistribute::redistribute(transport, &layout, shuffled)?;
    tracing::debug!(rank, emitted = output.len(), "phase 3 redistribution complete");

    transport
        .barrier()
        .map_err(|source| PermuteError::Transport {
            operation: "permute.final_barrier",
            source,
        })?;

    Ok(output)
}

/// Async facade over [`permute`].
///
/// The real `mpi` crate's collectives and point-to-point calls are
/// blocking FFI; running them on a `tokio` worker thread via
/// `spawn_blocking` is the idiomatic way to call into them from async
/// code without stalling the runtime (spec §5: the algorithm itself stays
/// strictly synchronous SPMD, this only keeps the *caller* from blocking).
pub async fn permute_async<T>(
    n: u64,
    transport: T,
    mut rng: impl EntropySource + Send + 'static,
) -> Result<Vec<u64>>
where
    T: Transport + Send + 'static,
{
    tokio::task::spawn_blocking(move || permute(n, &transport, &mut rng))
        .await
        .expect("permute worker thread panicked")
}
