use serde::{Deserialize, Serialize};

/// Which chunk layers around the observer are streamed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalRange {
    /// Fixed band of chunk Y coordinates, independent of the observer.
    Band { min_y: i32, max_y: i32 },
    /// Symmetric radius around the observer's chunk Y.
    Radius(i32),
}

impl VerticalRange {
    pub fn layers(&self, observer_y: i32) -> std::ops::RangeInclusive<i32> {
        match *self {
            Self::Band { min_y, max_y } => min_y..=max_y,
            Self::Radius(r) => (observer_y - r)..=(observer_y + r),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkSysConfig {
    /// Horizontal radius in chunks.
    pub render_distance: i32,
    pub vertical: VerticalRange,
    /// Idle block buffers kept for reuse.
    pub pool_capacity: usize,
    /// Mesh worker threads; 0 meshes inline on the calling thread.
    pub mesh_threads: usize,
}

impl Default for ChunkSysConfig {
    fn default() -> Self {
        Self {
            render_distance: 8,
            vertical: VerticalRange::Band { min_y: 0, max_y: 3 },
            pool_capacity: 256,
            mesh_threads: 4,
        }
    }
}
