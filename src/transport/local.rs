//! In-process, thread-simulated [`Transport`] used by the test suite.
//!
//! Launching a real process group is an external collaborator (spec §1);
//! this gives the property tests in `tests/` a way to drive `permute`
//! across `P` simulated ranks without an MPI launcher. One OS thread plays
//! each rank; collectives rendezvous through a `Barrier` + shared slot,
//! point-to-point messages travel over one `crossbeam_channel` per ordered
//! `(from, to)` pair so FIFO delivery between a sender/receiver pair (spec
//! §5's ordering guarantee) falls out of the channel itself.

use std::sync::{Arc, Barrier, Mutex};

use crossbeam_channel::{unbounded, Receiver, Select, Sender};

use crate::error::TransportError;
use crate::transport::{InboundSlice, OutboundSlice, Transport};

#[derive(Debug)]
enum Msg {
    Header { firstp: u64, countp: u64 },
    Payload(Vec<u64>),
}

/// Rendezvous point for one collective call: every rank posts its
/// contribution into its own slot, waits at the barrier, then reads
/// whatever every rank posted.
struct Exchange<T> {
    barrier: Barrier,
    slots: Mutex<Vec<Option<T>>>,
}

impl<T: Clone> Exchange<T> {
    fn new(size: usize) -> Self {
        Self {
            barrier: Barrier::new(size),
            slots: Mutex::new(vec![None; size]),
        }
    }

    fn all_gather(&self, rank: usize, value: T) -> Vec<T> {
        self.slots.lock().unwrap()[rank] = Some(value);
        self.barrier.wait();
        self.slots
            .lock()
            .unwrap()
            .iter()
            .map(|v| v.clone().expect("every rank posts before any rank reads"))
            .collect()
    }
}

/// One rank's handle onto a simulated process group.
pub struct LocalTransport {
    rank: i32,
    size: i32,
    counts_exchange: Arc<Exchange<Vec<i32>>>,
    varcount_exchange: Arc<Exchange<(Vec<u64>, Vec<i32>, Vec<i32>)>>,
    scan_exchange: Arc<Exchange<u64>>,
    barrier: Arc<Barrier>,
    senders: Vec<Sender<Msg>>,
    receivers: Vec<Receiver<Msg>>,
}

/// Build `size` connected [`LocalTransport`] handles, one per simulated
/// rank, ready to be moved into `size` threads.
pub fn build_local_cluster(size: i32) -> Vec<LocalTransport> {
    assert!(size > 0, "a process group needs at least one rank");
    let n = size as usize;

    let mut senders_by_rank: Vec<Vec<Sender<Msg>>> = (0..n).map(|_| Vec::with_capacity(n)).collect();
    let mut receivers_by_rank: Vec<Vec<Receiver<Msg>>> =
        (0..n).map(|_| Vec::with_capacity(n)).collect();

    // channel (from, to) is owned by sender `from` and receiver `to`;
    // building all P^2 up front keeps the point-to-point ordering exactly
    // per-pair, matching spec §5.
    for from in 0..n {
        for to in 0..n {
            let (tx, rx) = unbounded::<Msg>();
            senders_by_rank[from].push(tx);
            receivers_by_rank[to].push(rx);
        }
    }

    let counts_exchange = Arc::new(Exchange::new(n));
    let varcount_exchange = Arc::new(Exchange::new(n));
    let scan_exchange = Arc::new(Exchange::new(n));
    let barrier = Arc::new(Barrier::new(n));

    senders_by_rank
        .into_iter()
        .zip(receivers_by_rank)
        .enumerate()
        .map(|(rank, (senders, receivers))| LocalTransport {
            rank: rank as i32,
            size,
            counts_exchange: counts_exchange.clone(),
            varcount_exchange: varcount_exchange.clone(),
            scan_exchange: scan_exchange.clone(),
            barrier: barrier.clone(),
            senders,
            receivers,
        })
        .collect()
}

impl Transport for LocalTransport {
    fn rank(&self) -> i32 {
        self.rank
    }

    fn size(&self) -> i32 {
        self.size
    }

    fn barrier(&self) -> Result<(), TransportError> {
        self.barrier.wait();
        Ok(())
    }

    fn all_to_all_counts(&self, send: &[i32]) -> Result<Vec<i32>, TransportError> {
        let rows = self
            .counts_exchange
            .all_gather(self.rank as usize, send.to_vec());
        Ok(rows.iter().map(|row| row[self.rank as usize]).collect())
    }

    fn exclusive_scan_u64(&self, value: u64) -> Result<u64, TransportError> {
        let rows = self.scan_exchange.all_gather(self.rank as usize, value);
        Ok(rows[..self.rank as usize].iter().sum())
    }

    fn all_to_all_varcount_u64(
        &self,
        send: &[u64],
        sendcounts: &[i32],
        sdispls: &[i32],
        recvcounts: &[i32],
        rdispls: &[i32],
    ) -> Result<Vec<u64>, TransportError> {
        let rows = self.varcount_exchange.all_gather(
            self.rank as usize,
            (send.to_vec(), sendcounts.to_vec(), sdispls.to_vec()),
        );

        let total_recv: usize = recvcounts.iter().map(|&c| c as usize).sum();
        let mut recv = vec![0u64; total_recv];
        for (source, (buf, counts, displs)) in rows.iter().enumerate() {
            let count = counts[self.rank as usize] as usize;
            if count == 0 {
                continue;
            }
            let src_start = displs[self.rank as usize] as usize;
            let dst_start = rdispls[source] as usize;
            recv[dst_start..dst_start + count].copy_from_slice(&buf[src_start..src_start + count]);
        }
        Ok(recv)
    }

    fn redistribute_exchange(
        &self,
        outbound: Vec<OutboundSlice>,
        elements_needed: u64,
    ) -> Result<Vec<InboundSlice>, TransportError> {
        for slice in &outbound {
            let dest = slice.dest as usize;
            self.senders[dest]
                .send(Msg::Header {
                    firstp: slice.firstp,
                    countp: slice.payload.len() as u64,
                })
                .map_err(|_| TransportError::Collective("peer channel closed".into()))?;
            self.senders[dest]
                .send(Msg::Payload(slice.payload.clone()))
                .map_err(|_| TransportError::Collective("peer channel closed".into()))?;
        }

        let mut inbound = Vec::new();
        let mut remaining = elements_needed;

        while remaining > 0 {
            let mut select = Select::new();
            for rx in &self.receivers {
                select.recv(rx);
            }
            let oper = select.select();
            let source = oper.index();
            let msg = oper
                .recv(&self.receivers[source])
                .map_err(|_| TransportError::Collective("peer channel closed".into()))?;

            let (firstp, countp) = match msg {
                Msg::Header { firstp, countp } => (firstp, countp),
                Msg::Payload(_) => {
                    return Err(TransportError::Protocol(
                        "received payload before its header".into(),
                    ))
                }
            };

            let payload_msg = self.receivers[source]
                .recv()
                .map_err(|_| TransportError::Collective("peer channel closed".into()))?;
            let payload = match payload_msg {
                Msg::Payload(payload) => payload,
                Msg::Header { .. } => {
                    return Err(TransportError::Protocol(
                        "received a second header while expecting a payload".into(),
                    ))
                }
            };

            if payload.len() as u64 != countp {
                return Err(TransportError::Protocol(format!(
                    "header announced {countp} elements but payload carried {}",
                    payload.len()
                )));
            }

            remaining = remaining.checked_sub(payload.len() as u64).ok_or_else(|| {
                TransportError::Protocol("redistribution received more elements than expected".into())
            })?;

            inbound.push(InboundSlice { firstp, payload });
        }

        Ok(inbound)
    }
}
