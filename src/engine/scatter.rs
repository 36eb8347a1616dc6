//! Phase 1 - random scatter (spec §4.3).
//!
//! Routes every globally-owned index to a uniformly random rank via one
//! fixed all-to-all (to learn how much each peer is about to send) and one
//! variable all-to-all (to actually move the data). Per spec §9's Design
//! Note, packing is done by a single O(count + P) bucketing pass rather
//! than the source's sort-by-key — asymptotically better and simpler, and
//! the ordering within a destination bucket carries no semantic meaning
//! (Phase 2 immediately destroys it).

use crate::error::{Result, WithOperation};
use crate::layout::BlockLayout;
use crate::rng::EntropySource;
use crate::transport::{exclusive_prefix_sum_i32, Transport};

/// Scatter this rank's owned indices to random destinations and return
/// whatever landed on this rank, in arbitrary order.
///
/// Fixes spec §9 (O4): a rank with `count == 0` still builds and sends a
/// zero-length contribution to every collective rather than skipping them,
/// since `P - 1` would otherwise underflow and every other rank is still
/// expecting this rank's (empty) row.
pub fn scatter<T: Transport>(
    transport: &T,
    layout: &BlockLayout,
    rng: &mut impl EntropySource,
) -> Result<Vec<u64>> {
    let p = transport.size() as usize;
    let count = layout.count as usize;

    let mut sendcounts = vec![0i32; p];
    let mut bucketed = vec![0u64; count];
    let mut dest = vec![0usize; count];

    if count > 0 {
        for d in dest.iter_mut() {
            let target = rng.uniform_u64(0, transport.size() as u64 - 1) as usize;
            *d = target;
            sendcounts[target] += 1;
        }
    }

    let sdispls = exclusive_prefix_sum_i32(&sendcounts);

    if count > 0 {
        let mut cursor = sdispls.clone();
        for (k, &target) in dest.iter().enumerate() {
            let slot = &mut cursor[target];
            bucketed[*slot as usize] = layout.pos + k as u64;
            *slot += 1;
        }
    }

    let recvcounts = transport
        .all_to_all_counts(&sendcounts)
        .with_operation("phase1.all_to_all_counts")?;
    let rdispls = exclusive_prefix_sum_i32(&recvcounts);

    let received = transport
        .all_to_all_varcount_u64(&bucketed, &sendcounts, &sdispls, &recvcounts, &rdispls)
        .with_operation("phase1.all_to_all_varcount")?;

    Ok(received)
}
