use crate::world::block_id::BlockId;
use crate::world::chunk::CHUNK_VOLUME;
use log::trace;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Thread-safe pool for reusing chunk block buffers
pub struct ChunkPool {
    available: Mutex<VecDeque<Box<[BlockId]>>>,
    max_size: usize,
    stats: Mutex<PoolCounters>,
}

#[derive(Debug, Default)]
struct PoolCounters {
    reused: u64,
    allocated: u64,
    dropped: u64,
}

impl ChunkPool {
    /// Creates a pool keeping at most `max_size` idle buffers
    pub fn new(max_size: usize) -> Self {
        Self {
            available: Mutex::new(VecDeque::with_capacity(max_size)),
            max_size,
            stats: Mutex::new(PoolCounters::default()),
        }
    }

    /// Returns a zeroed buffer, reusing an idle one when possible
    pub fn acquire(&self) -> Box<[BlockId]> {
        let reused = self.available.lock().pop_front();
        let mut stats = self.stats.lock();

        match reused {
            Some(mut buffer) => {
                buffer.fill(BlockId::AIR);
                stats.reused += 1;
                buffer
            }
            None => {
                stats.allocated += 1;
                trace!("Chunk pool empty, allocating new buffer");
                vec![BlockId::AIR; CHUNK_VOLUME].into_boxed_slice()
            }
        }
    }

    /// Returns a buffer to the pool. Buffers past capacity are dropped.
    pub fn release(&self, buffer: Box<[BlockId]>) {
        if buffer.len() != CHUNK_VOLUME {
            return;
        }

        let mut available = self.available.lock();
        if available.len() < self.max_size {
            available.push_back(buffer);
        } else {
            self.stats.lock().dropped += 1;
        }
    }

    /// Pre-allocates idle buffers
    pub fn warmup(&self, count: usize) {
        let mut available = self.available.lock();
        let target = count.min(self.max_size.saturating_sub(available.len()));

        for _ in 0..target {
            available.push_back(vec![BlockId::AIR; CHUNK_VOLUME].into_boxed_slice());
        }
    }

    /// Gets current utilization metrics
    pub fn stats(&self) -> PoolStats {
        let available = self.available.lock().len();
        let counters = self.stats.lock();

        PoolStats {
            total_capacity: self.max_size,
            available,
            reused: counters.reused,
            allocated: counters.allocated,
            dropped: counters.dropped,
            memory_bytes: available * CHUNK_VOLUME * std::mem::size_of::<BlockId>(),
        }
    }
}

/// Statistics about pool utilization
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub total_capacity: usize,
    pub available: usize,
    pub reused: u64,
    pub allocated: u64,
    pub dropped: u64,
    pub memory_bytes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_acquire_release() {
        let pool = ChunkPool::new(10);

        let buffer = pool.acquire();
        assert_eq!(pool.stats().allocated, 1);

        pool.release(buffer);
        assert_eq!(pool.stats().available, 1);

        let _again = pool.acquire();
        let stats = pool.stats();
        assert_eq!(stats.reused, 1);
        assert_eq!(stats.available, 0);
    }

    #[test]
    fn test_reused_buffer_is_zeroed() {
        let pool = ChunkPool::new(4);
        let mut buffer = pool.acquire();
        buffer.fill(BlockId::STONE);
        pool.release(buffer);

        let reused = pool.acquire();
        assert!(reused.iter().all(|id| *id == BlockId::AIR));
    }

    #[test]
    fn test_pool_overflow_drops_excess() {
        let pool = ChunkPool::new(2);
        let buffers: Vec<_> = (0..3).map(|_| pool.acquire()).collect();
        for buffer in buffers {
            pool.release(buffer);
        }

        let stats = pool.stats();
        assert_eq!(stats.available, 2);
        assert_eq!(stats.dropped, 1);
    }

    #[test]
    fn test_pool_ignores_released_shells() {
        let pool = ChunkPool::new(2);
        pool.release(Box::default());
        assert_eq!(pool.stats().available, 0);
    }

    #[test]
    fn test_warmup_respects_capacity() {
        let pool = ChunkPool::new(3);
        pool.warmup(10);
        assert_eq!(pool.stats().available, 3);
    }
}
