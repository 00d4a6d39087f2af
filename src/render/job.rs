use crate::render::mesh::ChunkMeshes;
use crate::render::mesher::{ChunkMesher, ChunkSnapshot, ChunkSource};
use crate::render::texture::UvLookup;
use crate::utils::error::MeshError;
use crate::world::block_id::BlockRegistry;
use crate::world::chunk_coord::ChunkCoord;
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use log::{debug, trace};
use rayon::ThreadPool;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Version stamp captured when a mesh job starts. The job is stale as soon
/// as the chunk's version moves past it.
#[derive(Debug, Clone)]
pub struct MeshTicket {
    coord: ChunkCoord,
    issued: u64,
    current: Arc<AtomicU64>,
}

impl MeshTicket {
    pub fn new(coord: ChunkCoord, issued: u64, current: Arc<AtomicU64>) -> Self {
        Self {
            coord,
            issued,
            current,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn version(&self) -> u64 {
        self.issued
    }

    pub fn is_stale(&self) -> bool {
        self.current.load(Ordering::Acquire) != self.issued
    }

    pub fn check(&self) -> Result<(), MeshError> {
        if self.is_stale() {
            Err(MeshError::Cancelled {
                coord: self.coord,
                version: self.issued,
            })
        } else {
            Ok(())
        }
    }
}

/// Result handed back to the main thread.
#[derive(Debug)]
pub struct MeshOutcome {
    pub coord: ChunkCoord,
    pub version: u64,
    pub result: Result<ChunkMeshes, MeshError>,
}

/// Runs mesh compute jobs on a worker pool and collects their results on a
/// channel drained by the main thread.
pub struct MeshScheduler {
    pool: Option<ThreadPool>,
    sender: Sender<MeshOutcome>,
    receiver: Receiver<MeshOutcome>,
    registry: Arc<BlockRegistry>,
    atlas: Arc<dyn UvLookup>,
    in_flight: usize,
}

impl MeshScheduler {
    /// `pool` of `None` computes meshes inline on the dispatching thread.
    pub fn new(
        pool: Option<ThreadPool>,
        registry: Arc<BlockRegistry>,
        atlas: Arc<dyn UvLookup>,
    ) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            pool,
            sender,
            receiver,
            registry,
            atlas,
            in_flight: 0,
        }
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    pub fn dispatch(&mut self, ticket: MeshTicket, lod: u32, chunks: Arc<dyn ChunkSource>) {
        trace!(
            "Dispatching mesh job for {:?} v{} lod {}",
            ticket.coord(),
            ticket.version(),
            lod
        );
        self.in_flight += 1;

        let sender = self.sender.clone();
        let registry = Arc::clone(&self.registry);
        let atlas = Arc::clone(&self.atlas);
        let job = move || {
            let result = ChunkSnapshot::capture(ticket.coord(), chunks.as_ref(), &ticket)
                .and_then(|snapshot| {
                    ChunkMesher::new(&registry, atlas.as_ref()).build(&snapshot, lod, &ticket)
                });
            // The receiver only disappears when the scheduler is dropped.
            let _ = sender.send(MeshOutcome {
                coord: ticket.coord(),
                version: ticket.version(),
                result,
            });
        };

        match &self.pool {
            Some(pool) => pool.spawn(job),
            None => job(),
        }
    }

    /// Collects every finished job without blocking.
    pub fn drain(&mut self) -> Vec<MeshOutcome> {
        let outcomes: Vec<_> = self.receiver.try_iter().collect();
        self.in_flight = self.in_flight.saturating_sub(outcomes.len());
        outcomes
    }

    /// Blocks until no job is in flight or `timeout` passes.
    pub fn wait_all(&mut self, timeout: Duration) -> Vec<MeshOutcome> {
        let deadline = Instant::now() + timeout;
        let mut outcomes = self.drain();

        while self.in_flight > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.receiver.recv_timeout(remaining) {
                Ok(outcome) => {
                    self.in_flight -= 1;
                    outcomes.push(outcome);
                }
                Err(RecvTimeoutError::Timeout) => {
                    debug!("Timed out with {} mesh jobs in flight", self.in_flight);
                    break;
                }
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        outcomes
    }
}
