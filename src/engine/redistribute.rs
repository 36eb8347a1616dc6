//! Phase 3 - redistribution by canonical ownership (spec §4.5).
//!
//! After Phase 2, rank `r`'s locally-held elements conceptually occupy
//! global positions `[first_r, first_r + total_r)`, where `first_r` comes
//! from an exclusive prefix scan over every rank's `total_r`. This phase
//! walks that range, slicing it at canonical block boundaries, copying the
//! slice that belongs to this rank locally and shipping every other slice
//! to its canonical owner; concurrently it drains inbound HEADER/PAYLOAD
//! deliveries from any source until its own canonical slots are full.
//!
//! Spec §9 (O2) flags the source's `firstp < last` loop condition (with
//! `last` inclusive) as able to drop the final slice. This implementation
//! tracks `last_r` as an *exclusive* bound (`first_r + total_r`) so the
//! natural `firstp < last_r` condition already covers the whole range with
//! no off-by-one.

use crate::error::{Result, WithOperation};
use crate::layout::BlockLayout;
use crate::transport::{OutboundSlice, Transport};

pub fn redistribute<T: Transport>(
    transport: &T,
    layout: &BlockLayout,
    shuffled: Vec<u64>,
) -> Result<Vec<u64>> {
    let rank = transport.rank();
    let total_r = shuffled.len() as u64;

    let first_r = transport
        .exclusive_scan_u64(total_r)
        .with_operation("phase3.exclusive_scan")?;
    let last_r = first_r + total_r;

    let mut output = vec![0u64; layout.count as usize];
    let mut outbound = Vec::new();
    let mut filled_locally = 0u64;

    let mut firstp = first_r;
    if total_r > 0 {
        let mut owner = layout_owner(firstp, layout.block_size);
        while firstp < last_r {
            let block_end = (owner as u64 + 1) * layout.block_size;
            let lastp = block_end.min(last_r);
            let countp = lastp - firstp;
            let local_offset = (firstp - first_r) as usize;
            let slice = &shuffled[local_offset..local_offset + countp as usize];

            if owner == rank {
                let dst_start = (firstp - layout.pos) as usize;
                output[dst_start..dst_start + countp as usize].copy_from_slice(slice);
                filled_locally += countp;
            } else {
                outbound.push(OutboundSlice {
                    dest: owner,
                    firstp,
                    payload: slice.to_vec(),
                });
            }

            firstp += countp;
            owner += 1;
        }
    }

    let elements_needed = layout.count - filled_locally;
    let inbound = transport
        .redistribute_exchange(outbound, elements_needed)
        .with_operation("phase3.redistribute_exchange")?;

    for slice in inbound {
        let dst_start = (slice.firstp - layout.pos) as usize;
        output[dst_start..dst_start + slice.payload.len()].copy_from_slice(&slice.payload);
    }

    Ok(output)
}

fn layout_owner(global_pos: u64, block_size: u64) -> i32 {
    (global_pos / block_size) as i32
}
