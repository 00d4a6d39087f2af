use crate::render::job::MeshTicket;
use crate::render::mesh::ChunkMeshes;
use crate::utils::math::AABB;
use crate::world::chunk_coord::ChunkCoord;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Store-wide source of mesh versions. Versions never repeat, even across
/// an unload and reload of the same chunk.
#[derive(Debug, Clone, Default)]
pub struct VersionClock(Arc<AtomicU64>);

impl VersionClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u64 {
        self.0.fetch_add(1, Ordering::AcqRel) + 1
    }
}

/// Render-side state of one loaded chunk: its current geometry and the
/// version counter used to supersede in-flight mesh jobs.
#[derive(Debug)]
pub struct ChunkRendering {
    coord: ChunkCoord,
    lod: u32,
    version: Arc<AtomicU64>,
    clock: VersionClock,
    meshes: Option<Arc<ChunkMeshes>>,
    applied_version: Option<u64>,
}

impl ChunkRendering {
    pub fn new(coord: ChunkCoord, lod: u32, clock: VersionClock) -> Self {
        Self {
            coord,
            lod,
            version: Arc::new(AtomicU64::new(0)),
            clock,
            meshes: None,
            applied_version: None,
        }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn lod(&self) -> u32 {
        self.lod
    }

    pub fn set_lod(&mut self, lod: u32) {
        self.lod = lod;
    }

    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Starts a new mesh generation, invalidating any job already running.
    pub fn next_ticket(&self) -> MeshTicket {
        let issued = self.clock.next();
        self.version.store(issued, Ordering::Release);
        MeshTicket::new(self.coord, issued, Arc::clone(&self.version))
    }

    /// Invalidates in-flight jobs without starting a new one.
    pub fn cancel(&self) {
        self.version.store(self.clock.next(), Ordering::Release);
    }

    /// Replaces the geometry if `version` is still current. Returns whether
    /// the meshes were applied.
    pub fn apply(&mut self, version: u64, meshes: ChunkMeshes) -> bool {
        if version != self.version() {
            return false;
        }
        self.meshes = if meshes.is_empty() {
            None
        } else {
            Some(Arc::new(meshes))
        };
        self.applied_version = Some(version);
        true
    }

    pub fn meshes(&self) -> Option<&Arc<ChunkMeshes>> {
        self.meshes.as_ref()
    }

    pub fn has_geometry(&self) -> bool {
        self.meshes.is_some()
    }

    /// True when the shown geometry matches the latest version.
    pub fn is_current(&self) -> bool {
        self.applied_version == Some(self.version())
    }

    pub fn bounds(&self) -> AABB {
        self.coord.world_bounds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::mesh::MeshData;
    use glam::Vec3;

    fn one_quad() -> ChunkMeshes {
        let mut opaque = MeshData::new();
        opaque.add_quad([Vec3::ZERO; 4], [[0.0; 2]; 4], 1.0);
        ChunkMeshes {
            opaque,
            translucent: MeshData::new(),
        }
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let mut rendering = ChunkRendering::new(ChunkCoord::new(0, 0, 0), 1, VersionClock::new());
        let first = rendering.next_ticket();
        let second = rendering.next_ticket();
        assert!(first.is_stale());
        assert!(!second.is_stale());

        assert!(!rendering.apply(first.version(), one_quad()));
        assert!(!rendering.has_geometry());

        assert!(rendering.apply(second.version(), one_quad()));
        assert!(rendering.has_geometry());
        assert!(rendering.is_current());
    }

    #[test]
    fn test_cancel_invalidates_running_job() {
        let rendering = ChunkRendering::new(ChunkCoord::new(1, 0, 0), 2, VersionClock::new());
        let ticket = rendering.next_ticket();
        rendering.cancel();
        assert!(ticket.is_stale());
    }

    #[test]
    fn test_reloaded_chunk_rejects_old_version() {
        let clock = VersionClock::new();
        let coord = ChunkCoord::new(4, 0, 4);

        let old = ChunkRendering::new(coord, 1, clock.clone());
        let old_ticket = old.next_ticket();
        old.cancel();

        let mut reloaded = ChunkRendering::new(coord, 1, clock);
        let ticket = reloaded.next_ticket();
        assert_ne!(ticket.version(), old_ticket.version());

        assert!(!reloaded.apply(old_ticket.version(), one_quad()));
        assert!(reloaded.apply(ticket.version(), one_quad()));
        assert!(reloaded.is_current());
    }

    #[test]
    fn test_empty_result_clears_geometry() {
        let mut rendering = ChunkRendering::new(ChunkCoord::new(0, 0, 0), 1, VersionClock::new());
        let ticket = rendering.next_ticket();
        assert!(rendering.apply(ticket.version(), one_quad()));

        let ticket = rendering.next_ticket();
        assert!(rendering.apply(ticket.version(), ChunkMeshes::default()));
        assert!(!rendering.has_geometry());
        assert!(rendering.is_current());
    }
}
