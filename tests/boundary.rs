//! Boundary cases (spec §8, B1-B5) against the in-process cluster.

mod common;

use common::{flatten, run_cluster};
use paraperm::BlockLayout;

#[test]
fn b1_n_zero_every_rank_is_empty() {
    let segments = run_cluster(0, &[1, 2, 3, 4]);
    for seg in &segments {
        assert!(seg.is_empty());
    }
}

#[test]
fn b2_n_less_than_p_tail_ranks_are_empty() {
    let seeds = [10, 20, 30, 40, 50, 60, 70, 80];
    let segments = run_cluster(5, &seeds);

    let expected_counts: Vec<usize> = (0..8)
        .map(|r| BlockLayout::compute(5, 8, r).unwrap().count as usize)
        .collect();
    let actual_counts: Vec<usize> = segments.iter().map(|s| s.len()).collect();
    assert_eq!(actual_counts, expected_counts);

    let mut merged = flatten(&segments);
    merged.sort_unstable();
    assert_eq!(merged, vec![0, 1, 2, 3, 4]);
}

#[test]
fn b3_n_one_the_single_rank_gets_everything() {
    let segments = run_cluster(1, &[7]);
    assert_eq!(segments, vec![vec![0]]);
}

#[test]
fn b4_n_equals_p_one_element_per_rank() {
    let segments = run_cluster(4, &[1, 2, 3, 4]);
    let counts: Vec<usize> = segments.iter().map(|s| s.len()).collect();
    assert_eq!(counts, vec![1, 1, 1, 1]);

    let mut merged = flatten(&segments);
    merged.sort_unstable();
    assert_eq!(merged, vec![0, 1, 2, 3]);
}

#[test]
fn b5_n_not_divisible_by_p_only_the_last_rank_is_short() {
    let segments = run_cluster(10, &[1, 2, 3, 4]);
    let counts: Vec<usize> = segments.iter().map(|s| s.len()).collect();
    assert_eq!(counts, vec![3, 3, 3, 1]);

    let mut merged = flatten(&segments);
    merged.sort_unstable();
    assert_eq!(merged, (0..10).collect::<Vec<u64>>());
}
