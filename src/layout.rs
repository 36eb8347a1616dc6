//! Block layout calculator (spec §4.1).
//!
//! Maps `(n, P, r)` to the canonical block `m`, `pos_r`, `count_r` every
//! other component keys off: rank `r` canonically owns global positions
//! `[pos_r, pos_r + count_r)`, with `Sum(count_r) == n` and blocks disjoint
//! and contiguous in rank order.

use crate::error::{PermuteError, Result};

/// The canonical block owned by one rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockLayout {
    /// `ceil(n / P)`, the size of every block except possibly the last.
    pub block_size: u64,
    /// First global position owned by this rank.
    pub pos: u64,
    /// Number of positions owned by this rank (`0` if `pos >= n`).
    pub count: u64,
}

impl BlockLayout {
    /// Compute the block owned by rank `r` of a `p`-rank group permuting
    /// `n` elements.
    ///
    /// Fails only on `p <= 0` or on overflow of `r * block_size`, per
    /// spec §4.1's contract.
    pub fn compute(n: u64, p: i32, r: i32) -> Result<Self> {
        if p <= 0 {
            return Err(PermuteError::InvalidGroupSize(p));
        }
        let p = p as u64;
        let block_size = n
            .checked_add(p - 1)
            .ok_or(PermuteError::LayoutOverflow { n, rank: r })?
            / p;
        let pos = (r as u64)
            .checked_mul(block_size)
            .ok_or(PermuteError::LayoutOverflow { n, rank: r })?;
        let count = if pos >= n { 0 } else { block_size.min(n - pos) };
        Ok(Self {
            block_size,
            pos,
            count,
        })
    }

    /// The canonical owner of global position `global_pos`.
    pub fn owner_of(&self, global_pos: u64) -> i32 {
        (global_pos / self.block_size) as i32
    }

    pub fn range(&self) -> std::ops::Range<u64> {
        self.pos..self.pos + self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_nonpositive_group_size() {
        assert!(matches!(
            BlockLayout::compute(10, 0, 0),
            Err(PermuteError::InvalidGroupSize(0))
        ));
        assert!(matches!(
            BlockLayout::compute(10, -1, 0),
            Err(PermuteError::InvalidGroupSize(-1))
        ));
    }

    #[test]
    fn even_split() {
        // n=8, P=2 -> m=4, blocks [0,4) and [4,8)
        let l0 = BlockLayout::compute(8, 2, 0).unwrap();
        let l1 = BlockLayout::compute(8, 2, 1).unwrap();
        assert_eq!((l0.pos, l0.count), (0, 4));
        assert_eq!((l1.pos, l1.count), (4, 4));
    }

    #[test]
    fn uneven_split_only_last_rank_differs() {
        // n=10, P=4 -> m=3, counts (3,3,3,1)
        let counts: Vec<u64> = (0..4)
            .map(|r| BlockLayout::compute(10, 4, r).unwrap().count)
            .collect();
        assert_eq!(counts, vec![3, 3, 3, 1]);
    }

    #[test]
    fn n_less_than_p_tail_ranks_are_empty() {
        // n=5, P=8 -> counts (1,1,1,1,1,0,0,0)
        let counts: Vec<u64> = (0..8)
            .map(|r| BlockLayout::compute(5, 8, r).unwrap().count)
            .collect();
        assert_eq!(counts, vec![1, 1, 1, 1, 1, 0, 0, 0]);
    }

    #[test]
    fn n_zero_all_ranks_empty() {
        for r in 0..4 {
            let l = BlockLayout::compute(0, 4, r).unwrap();
            assert_eq!(l.count, 0);
        }
    }

    #[test]
    fn owner_of_matches_block_boundaries() {
        let l = BlockLayout::compute(10, 4, 0).unwrap();
        assert_eq!(l.owner_of(0), 0);
        assert_eq!(l.owner_of(2), 0);
        assert_eq!(l.owner_of(3), 1);
        assert_eq!(l.owner_of(9), 3);
    }
}
