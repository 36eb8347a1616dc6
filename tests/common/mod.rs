//! Shared harness for the integration tests: drives `permute` across a
//! simulated process group using [`paraperm::transport::local`], one OS
//! thread per rank, since the core has no launcher of its own (spec §1).

use std::thread;

use rand::rngs::StdRng;
use rand::SeedableRng;

use paraperm::permute;
use paraperm::transport::local::build_local_cluster;

/// Run `permute(n, ..)` across `seeds.len()` simulated ranks and return
/// each rank's resulting slice, in rank order.
pub fn run_cluster(n: u64, seeds: &[u64]) -> Vec<Vec<u64>> {
    let transports = build_local_cluster(seeds.len() as i32);
    let handles: Vec<_> = transports
        .into_iter()
        .zip(seeds.iter().copied())
        .map(|(transport, seed)| {
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(seed);
                permute(n, &transport, &mut rng).expect("permute should succeed")
            })
        })
        .collect();

    handles
        .into_iter()
        .map(|h| h.join().expect("rank thread panicked"))
        .collect()
}

/// Concatenate every rank's slice in rank order; under a correct canonical
/// layout this reconstructs the full permuted sequence.
pub fn flatten(segments: &[Vec<u64>]) -> Vec<u64> {
    segments.iter().flat_map(|s| s.iter().copied()).collect()
}
