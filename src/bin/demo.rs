//! Minimal MPI-launched driver for the permutation engine.
//!
//! This binary is the external collaborator spec §1 deliberately excludes
//! from the core: it owns process bootstrap (via `mpirun`/`mpiexec`), RNG
//! seeding, and the `n` argument. Run with, e.g.:
//!
//! ```text
//! mpirun -n 4 target/release/paraperm-demo 1000000
//! ```

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use paraperm::transport::MpiUniverse;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    paraperm::init_logging();

    let universe = MpiUniverse::initialize()?;
    let rank = universe.rank();
    let size = universe.size();

    let n: u64 = std::env::args()
        .nth(1)
        .map(|s| s.parse())
        .transpose()?
        .unwrap_or(1_000_000);

    // Seeding policy is explicitly out of the core's scope (spec §1); this
    // driver mixes the rank into an OS-entropy seed so sibling ranks never
    // share a stream (spec §9, O3).
    let mut seed_bytes = [0u8; 8];
    rand::rngs::OsRng.fill_bytes(&mut seed_bytes);
    let base_seed = u64::from_le_bytes(seed_bytes);
    let rng = StdRng::seed_from_u64(base_seed ^ (rank as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));

    let transport = universe.transport();
    let segment = paraperm::permute_async(n, transport, rng).await?;

    tracing::info!(
        rank,
        size,
        segment_len = segment.len(),
        first = segment.first().copied(),
        last = segment.last().copied(),
        "permutation segment ready"
    );

    Ok(())
}
