//! Collective transport contract (spec §4.6).
//!
//! The engine in [`crate::engine`] is written against this trait, not
//! against any specific messaging library, per spec §4.6: "These are
//! contracts, not dependencies on any specific library." [`mpi_transport`]
//! provides the production implementation over the real `mpi` crate
//! (rsmpi); [`local`] provides an in-process, thread-simulated process
//! group used by the test suite, since launching real MPI ranks is
//! explicitly an external collaborator (spec §1) the engine does not own.

pub mod local;
pub mod mpi_transport;

pub use local::LocalTransport;
pub use mpi_transport::{MpiTransport, MpiUniverse};

use crate::error::TransportError;

/// One outbound slice of the shuffled sequence a rank must deliver to its
/// canonical owner during Phase 3 (spec §4.5).
#[derive(Debug, Clone)]
pub struct OutboundSlice {
    /// Canonical owner rank.
    pub dest: i32,
    /// Absolute global position of the first element in `payload`.
    pub firstp: u64,
    /// The elements themselves, in final (post-shuffle) order.
    pub payload: Vec<u64>,
}

/// One inbound slice delivered to this rank during Phase 3.
#[derive(Debug, Clone)]
pub struct InboundSlice {
    /// Absolute global position of the first element in `payload`.
    pub firstp: u64,
    pub payload: Vec<u64>,
}

/// The set of collective and point-to-point primitives the engine needs
/// (spec §4.6): fixed all-to-all of small integers, variable all-to-all of
/// payload words, an exclusive prefix scan, a barrier, and the
/// non-blocking HEADER/PAYLOAD exchange pattern of Phase 3.
pub trait Transport {
    /// This process's rank in `[0, size())`.
    fn rank(&self) -> i32;

    /// Size of the process group, `P`.
    fn size(&self) -> i32;

    /// Block until every rank in the group has called `barrier`.
    fn barrier(&self) -> Result<(), TransportError>;

    /// Fixed-size all-to-all of per-destination counts: `send[j]` is what
    /// this rank sends to rank `j`; the result's `j`-th entry is what rank
    /// `j` sent to this rank.
    fn all_to_all_counts(&self, send: &[i32]) -> Result<Vec<i32>, TransportError>;

    /// Inclusive-exclusive prefix scan of `value` over rank order: returns
    /// the sum of `value` contributed by ranks `0..rank()` (exclusive of
    /// this rank), used to compute `first_r` in spec §4.5.
    fn exclusive_scan_u64(&self, value: u64) -> Result<u64, TransportError>;

    /// Variable-size all-to-all: `send` is this rank's whole outbound
    /// buffer, laid out per-destination by `sendcounts`/`sdispls`;
    /// `recvcounts`/`rdispls` describe how the caller wants the inbound
    /// data laid out (already derived from an `all_to_all_counts` round).
    fn all_to_all_varcount_u64(
        &self,
        send: &[u64],
        sendcounts: &[i32],
        sdispls: &[i32],
        recvcounts: &[i32],
        rdispls: &[i32],
    ) -> Result<Vec<u64>, TransportError>;

    /// Phase 3's redistribution exchange (spec §4.5): post every slice in
    /// `outbound` as a non-blocking HEADER-then-PAYLOAD send, then receive
    /// from any source until `elements_needed` elements have arrived,
    /// finally waiting for the posted sends to complete.
    fn redistribute_exchange(
        &self,
        outbound: Vec<OutboundSlice>,
        elements_needed: u64,
    ) -> Result<Vec<InboundSlice>, TransportError>;
}

/// Exclusive prefix sum of `counts`, i.e. displacements for a contiguous
/// packing of per-destination (or per-source) regions. Shared by both
/// `Transport` implementations and by the engine's Phase 1 packing step.
pub fn exclusive_prefix_sum_i32(counts: &[i32]) -> Vec<i32> {
    let mut displs = Vec::with_capacity(counts.len());
    let mut acc = 0i32;
    for &c in counts {
        displs.push(acc);
        acc += c;
    }
    displs
}
