//! RNG adapter (spec §4.2).
//!
//! The engine needs exactly one primitive: a uniform draw over an inclusive
//! integer range, independent across calls on one rank. Seeding policy is
//! explicitly an external collaborator (spec §1) — this module does not
//! construct or seed a generator, it only defines the contract the engine
//! consumes and blanket-implements it for anything that already implements
//! [`rand::RngCore`], so callers can hand in whatever generator family they
//! like (`StdRng`, `SmallRng`, a counter-based generator keyed on rank, ...).

use rand::Rng;

/// A source of independent uniform draws over `[lo, hi]`.
///
/// Spec §9 (O3) calls out that seeding every rank from the same default
/// stream silently destroys the uniformity property (T5); this trait makes
/// the generator an input the caller must supply already seeded, so that
/// mistake has to be made explicitly by the caller rather than baked into
/// the engine.
pub trait EntropySource {
    /// Draw a value uniformly from `[lo, hi]` (inclusive on both ends).
    ///
    /// # Panics
    ///
    /// Implementations may panic if `lo > hi`; the engine never calls this
    /// with an empty range.
    fn uniform_u64(&mut self, lo: u64, hi: u64) -> u64;
}

impl<R: rand::RngCore + ?Sized> EntropySource for R {
    fn uniform_u64(&mut self, lo: u64, hi: u64) -> u64 {
        self.gen_range(lo..=hi)
    }
}
