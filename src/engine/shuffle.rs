//! Phase 2 - local Fisher-Yates shuffle (spec §4.4).
//!
//! Purely local: no communication, so no [`crate::Transport`] is involved.
//! Left unchanged if the buffer holds 0 or 1 elements.

use crate::rng::EntropySource;

/// Shuffle `buffer` in place with the standard descending Fisher-Yates
/// walk: for `k` from `len - 1` down to `1`, swap position `k` with a
/// uniform draw from `[0, k]`.
pub fn fisher_yates(buffer: &mut [u64], rng: &mut impl EntropySource) {
    let mut k = buffer.len();
    while k > 1 {
        k -= 1;
        let l = rng.uniform_u64(0, k as u64) as usize;
        buffer.swap(k, l);
    }
}
