//! Production [`Transport`] over the real `mpi` crate (rsmpi).
//!
//! Mirrors the teacher's `MpiUniverse` / `DistributedContext` split: a thin
//! `MpiUniverse` owns the `mpi::initialize()` handle and hands out
//! communicators, and `MpiTransport` wraps a communicator with exactly the
//! operations the engine needs, rather than letting algorithm code reach
//! into `mpi::` directly.

use mpi::collective::SystemOperation;
use mpi::datatype::{Partition, PartitionMut};
use mpi::request::{scope, WaitGuard};
use mpi::topology::SimpleCommunicator;
use mpi::traits::*;
use mpi::Tag;

use crate::error::TransportError;
use crate::transport::{InboundSlice, OutboundSlice, Transport};

const HEADER_TAG: Tag = 1;
const PAYLOAD_TAG: Tag = 2;

/// Owns the MPI runtime handle for the lifetime of the process.
///
/// `mpi::initialize()` may only succeed once per process; callers that
/// need a `Transport` should build one `MpiUniverse` at startup and derive
/// as many `MpiTransport`s from it as needed.
pub struct MpiUniverse {
    #[allow(dead_code)]
    universe: mpi::environment::Universe,
    world: SimpleCommunicator,
}

impl MpiUniverse {
    /// Initialize the MPI runtime for this process.
    pub fn initialize() -> Result<Self, TransportError> {
        let universe = mpi::initialize().ok_or_else(|| {
            TransportError::Collective(
                "mpi::initialize failed (already initialized, or no MPI runtime present)".into(),
            )
        })?;
        let world = universe.world();
        Ok(Self { universe, world })
    }

    pub fn rank(&self) -> i32 {
        self.world.rank()
    }

    pub fn size(&self) -> i32 {
        self.world.size()
    }

    /// Build a [`MpiTransport`] bound to the world communicator.
    pub fn transport(&self) -> MpiTransport {
        MpiTransport::new(SimpleCommunicator::world())
    }
}

/// [`Transport`] over a single `mpi` world communicator.
pub struct MpiTransport {
    world: SimpleCommunicator,
}

impl MpiTransport {
    pub fn new(world: SimpleCommunicator) -> Self {
        Self { world }
    }
}

// `SimpleCommunicator` wraps a raw `MPI_Comm` pointer, which is not `Send`
// by default. `MpiTransport` is only ever moved to a single worker thread
// (never accessed concurrently from multiple threads), which is sound; see
// `mpi::datatype::UserDatatype`'s identical `unsafe impl Send` for the same
// FFI-pointer situation.
unsafe impl Send for MpiTransport {}

impl Transport for MpiTransport {
    fn rank(&self) -> i32 {
        self.world.rank()
    }

    fn size(&self) -> i32 {
        self.world.size()
    }

    fn barrier(&self) -> Result<(), TransportError> {
        self.world.barrier();
        Ok(())
    }

    fn all_to_all_counts(&self, send: &[i32]) -> Result<Vec<i32>, TransportError> {
        let mut recv = vec![0i32; send.len()];
        self.world.all_to_all_into(send, &mut recv[..]);
        Ok(recv)
    }

    fn exclusive_scan_u64(&self, value: u64) -> Result<u64, TransportError> {
        let mut result = 0u64;
        self.world
            .exclusive_scan_into(&value, &mut result, &SystemOperation::sum());
        Ok(result)
    }

    fn all_to_all_varcount_u64(
        &self,
        send: &[u64],
        sendcounts: &[i32],
        sdispls: &[i32],
        recvcounts: &[i32],
        rdispls: &[i32],
    ) -> Result<Vec<u64>, TransportError> {
        let total_recv: i32 = recvcounts.iter().sum();
        let mut recv = vec![0u64; total_recv as usize];
        let send_partition = Partition::new(send, sendcounts, sdispls);
        let mut recv_partition = PartitionMut::new(&mut recv, recvcounts, rdispls);
        self.world
            .all_to_all_varcount_into(&send_partition, &mut recv_partition);
        Ok(recv)
    }

    fn redistribute_exchange(
        &self,
        outbound: Vec<OutboundSlice>,
        elements_needed: u64,
    ) -> Result<Vec<InboundSlice>, TransportError> {
        // HEADER carries (firstp, countp) as a two-element u64 vector so it
        // can ride the same matched-receive-vec path as the payload; no
        // assumptions are made about fixed-size array Equivalence impls.
        let headers: Vec<Vec<u64>> = outbound
            .iter()
            .map(|slice| vec![slice.firstp, slice.payload.len() as u64])
            .collect();

        let mut inbound = Vec::new();
        let mut remaining = elements_needed;

        scope(|scope| -> Result<(), TransportError> {
            let mut guards = Vec::with_capacity(outbound.len() * 2);
            for (slice, header) in outbound.iter().zip(headers.iter()) {
                let process = self.world.process_at_rank(slice.dest);
                guards.push(WaitGuard::from(
                    process.immediate_send_with_tag(scope, &header[..], HEADER_TAG),
                ));
                guards.push(WaitGuard::from(process.immediate_send_with_tag(
                    scope,
                    &slice.payload[..],
                    PAYLOAD_TAG,
                )));
            }

            while remaining > 0 {
                let header_msg = self.world.any_process().matched_probe_with_tag(HEADER_TAG);
                let (header, status): (Vec<u64>, _) = header_msg.matched_receive_vec();
                let source = status.source_rank();
                let firstp = header[0];
                let countp = header[1];

                let payload_msg = self
                    .world
                    .process_at_rank(source)
                    .matched_probe_with_tag(PAYLOAD_TAG);
                let (payload, _): (Vec<u64>, _) = payload_msg.matched_receive_vec();

                if payload.len() as u64 != countp {
                    return Err(TransportError::Protocol(format!(
                        "header announced {countp} elements from rank {source} but payload carried {}",
                        payload.len()
                    )));
                }

                remaining = remaining.checked_sub(payload.len() as u64).ok_or_else(|| {
                    TransportError::Protocol(
                        "redistribution received more elements than expected".into(),
                    )
                })?;

                inbound.push(InboundSlice { firstp, payload });
            }

            // `guards` wait on drop (WaitGuard), completing every posted send
            // before the scope exits.
            drop(guards);
            Ok(())
        })?;

        Ok(inbound)
    }
}
