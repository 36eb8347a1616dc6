//! Property checks (spec §8, T1-T5) against the in-process cluster.

mod common;

use std::collections::HashSet;

use common::{flatten, run_cluster};
use paraperm::BlockLayout;

#[test]
fn t1_every_position_appears_exactly_once() {
    let n = 997u64;
    let segments = run_cluster(n, &[11, 22, 33, 41, 59]);
    let mut merged = flatten(&segments);
    merged.sort_unstable();
    assert_eq!(merged, (0..n).collect::<Vec<u64>>());
}

#[test]
fn t2_segment_lengths_match_the_canonical_block_layout() {
    let n = 23u64;
    let p = 4i32;
    let segments = run_cluster(n, &[1, 2, 3, 4]);
    for (r, seg) in segments.iter().enumerate() {
        let expected = BlockLayout::compute(n, p, r as i32).unwrap().count as usize;
        assert_eq!(seg.len(), expected, "rank {r} segment length");
    }
}

#[test]
fn t3_every_value_is_in_range() {
    let n = 500u64;
    let segments = run_cluster(n, &[5, 6, 7]);
    for seg in &segments {
        for &v in seg {
            assert!(v < n);
        }
    }
}

#[test]
fn t4_identical_seeds_reproduce_an_identical_result() {
    let n = 200u64;
    let seeds = [100, 200, 300];
    let run_a = run_cluster(n, &seeds);
    let run_b = run_cluster(n, &seeds);
    assert_eq!(run_a, run_b);
}

#[test]
fn t5_different_seeds_give_different_permutations() {
    let n = 1000u64;
    let run_a = flatten(&run_cluster(n, &[1, 2, 3, 4]));
    let run_b = flatten(&run_cluster(n, &[9, 8, 7, 6]));
    assert_ne!(run_a, run_b);
}

#[test]
fn t5_the_destination_of_a_fixed_value_is_not_always_the_same_rank() {
    // Weak uniformity check: across many independent seedings, the rank
    // that ends up holding global position 0 should vary, not collapse
    // onto a single rank every time.
    let n = 64u64;
    let trials = 24u64;
    let mut ranks_seen: HashSet<usize> = HashSet::new();

    for trial in 0..trials {
        let seeds: Vec<u64> = (0..4).map(|r| trial * 1000 + r + 1).collect();
        let segments = run_cluster(n, &seeds);
        for (r, seg) in segments.iter().enumerate() {
            if seg.contains(&0) {
                ranks_seen.insert(r);
            }
        }
    }

    assert!(
        ranks_seen.len() > 1,
        "value 0 landed on the same rank in every trial: {ranks_seen:?}"
    );
}
