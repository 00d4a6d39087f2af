use crate::config::chunksys::ChunkSysConfig;
use crate::config::worldgen::WorldGenConfig;
use crate::physics::collision::SolidQuery;
use crate::render::job::{MeshOutcome, MeshScheduler};
use crate::render::mesher::ChunkSource;
use crate::render::rendering::{ChunkRendering, VersionClock};
use crate::render::texture::{TextureAtlas, UvLookup};
use crate::utils::error::{Result, WorldError};
use crate::utils::math::ViewFrustum;
use crate::world::block_id::{BlockId, BlockRegistry};
use crate::world::chunk::{Chunk, SharedChunk, CHUNK_SIZE};
use crate::world::chunk_coord::ChunkCoord;
use crate::world::generator::TerrainGenerator;
use crate::world::pool::{ChunkPool, PoolStats};
use crate::world::spatial::StreamingWindow;
use glam::{IVec3, Vec3};
use log::{debug, trace};
use parking_lot::RwLock;
use rayon::ThreadPoolBuilder;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Live chunks keyed by coordinate. Shared with mesh workers, which only
/// take read locks.
#[derive(Default)]
pub struct ChunkMap {
    chunks: RwLock<HashMap<ChunkCoord, SharedChunk>>,
}

impl ChunkMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        self.chunks.read().get(&coord).cloned()
    }

    pub fn insert(&self, coord: ChunkCoord, chunk: SharedChunk) {
        self.chunks.write().insert(coord, chunk);
    }

    pub fn remove(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        self.chunks.write().remove(&coord)
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunks.read().contains_key(&coord)
    }

    pub fn len(&self) -> usize {
        self.chunks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.read().is_empty()
    }

    /// Handles to every live chunk, taken under one short read lock.
    pub fn entries(&self) -> Vec<(ChunkCoord, SharedChunk)> {
        self.chunks
            .read()
            .iter()
            .map(|(coord, chunk)| (*coord, Arc::clone(chunk)))
            .collect()
    }
}

impl ChunkSource for ChunkMap {
    fn chunk(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        self.get(coord)
    }
}

/// Counts from one streaming pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamingStats {
    pub loaded: usize,
    pub unloaded: usize,
    pub meshes_scheduled: usize,
}

/// Owns the loaded chunk set around the observer: generation, block
/// edits, and mesh scheduling.
pub struct ChunkStore {
    registry: Arc<BlockRegistry>,
    generator: TerrainGenerator,
    pool: ChunkPool,
    chunks: Arc<ChunkMap>,
    renderings: HashMap<ChunkCoord, ChunkRendering>,
    versions: VersionClock,
    window: StreamingWindow,
    scheduler: MeshScheduler,
}

impl ChunkStore {
    pub fn new(
        config: &ChunkSysConfig,
        worldgen: WorldGenConfig,
        registry: Arc<BlockRegistry>,
    ) -> Result<Self> {
        let atlas: Arc<dyn UvLookup> = Arc::new(TextureAtlas::standard(Arc::clone(&registry)));
        Self::with_atlas(config, worldgen, registry, atlas)
    }

    pub fn with_atlas(
        config: &ChunkSysConfig,
        worldgen: WorldGenConfig,
        registry: Arc<BlockRegistry>,
        atlas: Arc<dyn UvLookup>,
    ) -> Result<Self> {
        let workers = if config.mesh_threads == 0 {
            None
        } else {
            Some(
                ThreadPoolBuilder::new()
                    .num_threads(config.mesh_threads)
                    .thread_name(|i| format!("mesh-worker-{}", i))
                    .build()?,
            )
        };

        let pool = ChunkPool::new(config.pool_capacity);
        let scheduler = MeshScheduler::new(workers, Arc::clone(&registry), atlas);

        Ok(Self {
            registry,
            generator: TerrainGenerator::new(worldgen),
            pool,
            chunks: Arc::new(ChunkMap::new()),
            renderings: HashMap::new(),
            versions: VersionClock::new(),
            window: StreamingWindow::from_config(config),
            scheduler,
        })
    }

    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    pub fn generator(&self) -> &TerrainGenerator {
        &self.generator
    }

    pub fn window(&self) -> &StreamingWindow {
        &self.window
    }

    /// Loads every chunk in the window around `observer`, unloads the rest
    /// and schedules meshes for whatever changed. Loads and unloads are
    /// settled before this returns.
    pub fn update_loaded_chunks(&mut self, observer: Vec3) -> StreamingStats {
        let retain = self.window.retain_set(observer);
        let mut stats = StreamingStats::default();

        let mut wanted: Vec<(ChunkCoord, u32)> = retain.iter().map(|(c, l)| (*c, *l)).collect();
        wanted.sort_by_key(|(coord, lod)| (*lod, *coord));

        for (coord, lod) in wanted {
            match self.renderings.get_mut(&coord) {
                Some(rendering) => {
                    if rendering.lod() != lod {
                        rendering.set_lod(lod);
                        if let Some(chunk) = self.chunks.get(coord) {
                            chunk.write().mark_dirty();
                        }
                    }
                }
                None => {
                    if self.load_chunk(coord, lod) {
                        stats.loaded += 1;
                    }
                }
            }
        }

        let stale: Vec<ChunkCoord> = self
            .renderings
            .keys()
            .filter(|coord| !retain.contains_key(*coord))
            .copied()
            .collect();
        for coord in stale {
            if self.unload_chunk(coord) {
                stats.unloaded += 1;
            }
        }

        stats.meshes_scheduled = self.schedule_dirty_meshes();
        if stats.loaded > 0 || stats.unloaded > 0 {
            debug!(
                "Streaming: +{} -{} chunks, {} loaded, {} meshes queued",
                stats.loaded,
                stats.unloaded,
                self.chunks.len(),
                stats.meshes_scheduled
            );
        }
        stats
    }

    /// Generates a chunk into a pooled buffer and inserts it. Returns false
    /// if it was already loaded.
    pub(crate) fn load_chunk(&mut self, coord: ChunkCoord, lod: u32) -> bool {
        if self.chunks.contains(coord) {
            return false;
        }

        let mut blocks = self.pool.acquire();
        let own = self.generator.generate_chunk_content(coord, &mut blocks);
        let stamped = self.generator.populate_structures(coord, &mut blocks);

        let mut chunk = Chunk::new(coord, blocks);
        chunk.recompute_light(&self.registry);
        if !chunk.is_empty() {
            chunk.mark_dirty();
        }

        self.chunks.insert(coord, Arc::new(RwLock::new(chunk)));
        self.renderings.insert(coord, ChunkRendering::new(coord, lod, self.versions.clone()));
        trace!("Loaded chunk {:?} ({} structures)", coord, stamped);

        // Trees scanned here may reach chunks that were generated earlier.
        for structure in &own {
            for neighbor in coord.get_neighbors() {
                if !structure.intersects_chunk(neighbor) {
                    continue;
                }
                if let Some(shared) = self.chunks.get(neighbor) {
                    let mut chunk = shared.write();
                    if chunk.is_released() {
                        continue;
                    }
                    structure.stamp(neighbor, chunk.blocks_mut());
                    chunk.recompute_light(&self.registry);
                    chunk.mark_dirty();
                }
            }
        }

        for neighbor in coord.face_neighbors() {
            self.mark_dirty(neighbor);
        }
        true
    }

    /// Removes a chunk, cancels its pending mesh and returns its block
    /// buffer to the pool.
    pub(crate) fn unload_chunk(&mut self, coord: ChunkCoord) -> bool {
        if let Some(rendering) = self.renderings.get(&coord) {
            rendering.cancel();
        }

        let Some(shared) = self.chunks.remove(coord) else {
            self.renderings.remove(&coord);
            return false;
        };

        let blocks = shared.write().take_blocks();
        self.pool.release(blocks);
        self.renderings.remove(&coord);
        self.generator.forget_source(coord);

        for neighbor in coord.face_neighbors() {
            self.mark_dirty(neighbor);
        }
        trace!("Unloaded chunk {:?}", coord);
        true
    }

    fn mark_dirty(&self, coord: ChunkCoord) {
        if let Some(shared) = self.chunks.get(coord) {
            shared.write().mark_dirty();
        }
    }

    /// Starts a mesh job for every dirty chunk. Returns how many were
    /// dispatched.
    pub fn schedule_dirty_meshes(&mut self) -> usize {
        let mut dirty: Vec<ChunkCoord> = self
            .chunks
            .entries()
            .into_iter()
            .filter(|(_, shared)| shared.write().take_dirty())
            .map(|(coord, _)| coord)
            .collect();
        dirty.sort();

        let source: Arc<dyn ChunkSource> = self.chunks.clone();
        let mut scheduled = 0;
        for coord in dirty {
            let Some(rendering) = self.renderings.get(&coord) else {
                continue;
            };
            let ticket = rendering.next_ticket();
            self.scheduler
                .dispatch(ticket, rendering.lod(), Arc::clone(&source));
            scheduled += 1;
        }
        scheduled
    }

    /// Applies every finished mesh job. Superseded results are dropped.
    /// Returns how many meshes were applied.
    pub fn process_mesh_results(&mut self) -> usize {
        let outcomes = self.scheduler.drain();
        self.apply_outcomes(outcomes)
    }

    /// Blocks until all dispatched jobs finish or `timeout` passes, then
    /// applies them.
    pub fn wait_for_meshes(&mut self, timeout: Duration) -> usize {
        let outcomes = self.scheduler.wait_all(timeout);
        self.apply_outcomes(outcomes)
    }

    fn apply_outcomes(&mut self, outcomes: Vec<MeshOutcome>) -> usize {
        let mut applied = 0;
        for outcome in outcomes {
            match outcome.result {
                Ok(meshes) => {
                    let Some(rendering) = self.renderings.get_mut(&outcome.coord) else {
                        continue;
                    };
                    if rendering.apply(outcome.version, meshes) {
                        applied += 1;
                    }
                }
                Err(e) => trace!("{}", e),
            }
        }
        applied
    }

    pub fn pending_meshes(&self) -> usize {
        self.scheduler.in_flight()
    }

    /// Block at a world cell, or `None` when its chunk is not loaded.
    pub fn try_block_at(&self, world: IVec3) -> Option<BlockId> {
        let shared = self.chunks.get(ChunkCoord::from_world_block(world))?;
        let chunk = shared.read();
        if chunk.is_released() {
            return None;
        }
        Some(chunk.get(ChunkCoord::local_of(world)))
    }

    /// Unloaded cells read as air.
    pub fn get_block_at(&self, world: IVec3) -> BlockId {
        self.try_block_at(world).unwrap_or(BlockId::AIR)
    }

    pub fn is_block_solid_at(&self, world: IVec3) -> bool {
        self.try_block_at(world)
            .map_or(false, |id| self.registry.is_solid(id))
    }

    pub fn light_at(&self, world: IVec3) -> Option<u8> {
        let shared = self.chunks.get(ChunkCoord::from_world_block(world))?;
        let chunk = shared.read();
        if chunk.is_released() {
            return None;
        }
        Some(chunk.light(ChunkCoord::local_of(world)))
    }

    /// Writes a block and marks its chunk and every loaded chunk touching
    /// the edited cell for remeshing.
    pub fn set_block(&mut self, world: IVec3, id: BlockId) -> std::result::Result<(), WorldError> {
        self.registry.try_get(id)?;

        let coord = ChunkCoord::from_world_block(world);
        let shared = self
            .chunks
            .get(coord)
            .ok_or(WorldError::ChunkNotLoaded(coord))?;
        let local = ChunkCoord::local_of(world);

        {
            let mut chunk = shared.write();
            if chunk.is_released() {
                return Err(WorldError::ChunkNotLoaded(coord));
            }
            if chunk.get(local) == id {
                return Ok(());
            }
            chunk.set(local, id);
            chunk.recompute_light(&self.registry);
        }

        for neighbor in touching_chunks(coord, local) {
            self.mark_dirty(neighbor);
        }
        Ok(())
    }

    pub fn chunk(&self, coord: ChunkCoord) -> Option<SharedChunk> {
        self.chunks.get(coord)
    }

    pub fn rendering(&self, coord: ChunkCoord) -> Option<&ChunkRendering> {
        self.renderings.get(&coord)
    }

    pub fn all_chunk_renderings(&self) -> impl Iterator<Item = &ChunkRendering> {
        self.renderings.values()
    }

    /// Renderings with geometry whose bounds intersect the frustum.
    pub fn visible_renderings(&self, frustum: &ViewFrustum) -> Vec<&ChunkRendering> {
        self.renderings
            .values()
            .filter(|r| r.has_geometry() && frustum.intersects_aabb(&r.bounds()))
            .collect()
    }

    pub fn loaded_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.chunks.contains(coord)
    }

    pub fn lod_of(&self, coord: ChunkCoord) -> Option<u32> {
        self.renderings.get(&coord).map(ChunkRendering::lod)
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }
}

impl SolidQuery for ChunkStore {
    fn is_solid_at(&self, block: IVec3) -> bool {
        self.is_block_solid_at(block)
    }
}

/// The chunk holding `local` plus every chunk sharing a face, edge or
/// corner with that cell.
fn touching_chunks(coord: ChunkCoord, local: IVec3) -> Vec<ChunkCoord> {
    let span = |v: i32| -> Vec<i32> {
        if v == 0 {
            vec![0, -1]
        } else if v == CHUNK_SIZE - 1 {
            vec![0, 1]
        } else {
            vec![0]
        }
    };

    let mut touched = Vec::new();
    for dy in span(local.y) {
        for dz in span(local.z) {
            for dx in span(local.x) {
                touched.push(coord.offset(IVec3::new(dx, dy, dz)));
            }
        }
    }
    touched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::chunksys::VerticalRange;
    use crate::config::worldgen::{HeightNoise, WorldType};

    fn store(worldgen: WorldGenConfig, render_distance: i32) -> ChunkStore {
        threaded_store(worldgen, render_distance, 0)
    }

    fn threaded_store(
        worldgen: WorldGenConfig,
        render_distance: i32,
        mesh_threads: usize,
    ) -> ChunkStore {
        let config = ChunkSysConfig {
            render_distance,
            vertical: VerticalRange::Band { min_y: 0, max_y: 0 },
            pool_capacity: 64,
            mesh_threads,
        };
        ChunkStore::new(&config, worldgen, Arc::new(BlockRegistry::standard())).unwrap()
    }

    fn forest() -> WorldGenConfig {
        WorldGenConfig {
            world_seed: 11,
            base_height: 6,
            height_noise: HeightNoise::Jitter { amplitude: 0 },
            decoration_chance: 0.0,
            tree_chance: 1.0,
            ..Default::default()
        }
    }

    fn blocks_of(store: &ChunkStore, coord: ChunkCoord) -> Vec<BlockId> {
        store.chunk(coord).unwrap().read().blocks().to_vec()
    }

    fn all_faces(store: &ChunkStore) -> Vec<(ChunkCoord, usize)> {
        let mut faces: Vec<_> = store
            .all_chunk_renderings()
            .map(|r| (r.coord(), face_count(store, r.coord())))
            .collect();
        faces.sort();
        faces
    }

    fn flat(height: i32) -> WorldGenConfig {
        WorldGenConfig {
            world_type: WorldType::Flat { height },
            ..Default::default()
        }
    }

    fn face_count(store: &ChunkStore, coord: ChunkCoord) -> usize {
        store
            .rendering(coord)
            .and_then(|r| r.meshes())
            .map_or(0, |m| m.opaque.quad_count())
    }

    #[test]
    fn test_streaming_loads_window_once() {
        let worldgen = WorldGenConfig {
            world_seed: 1234,
            ..Default::default()
        };
        let mut store = store(worldgen, 2);

        let first = store.update_loaded_chunks(Vec3::ZERO);
        assert_eq!(first.loaded, 25);
        assert_eq!(store.loaded_count(), (2 * 2 + 1) * (2 * 2 + 1));

        let second = store.update_loaded_chunks(Vec3::ZERO);
        assert_eq!(second.loaded, 0);
        assert_eq!(second.unloaded, 0);
        assert_eq!(store.loaded_count(), 25);
    }

    #[test]
    fn test_surface_query_returns_grass() {
        let worldgen = WorldGenConfig {
            world_seed: 1234,
            ..Default::default()
        };
        let mut store = store(worldgen, 2);
        store.update_loaded_chunks(Vec3::ZERO);

        let surface = store.generator().surface_height(0, 0);
        assert_eq!(
            store.try_block_at(IVec3::new(0, surface - 1, 0)),
            Some(BlockId::GRASS)
        );
        assert_eq!(
            store.try_block_at(IVec3::new(0, surface - 2, 0)),
            Some(BlockId::DIRT)
        );
        assert!(store.is_block_solid_at(IVec3::new(0, surface - 1, 0)));
        assert_eq!(store.try_block_at(IVec3::new(0, 100, 0)), None);
    }

    #[test]
    fn test_moving_observer_unloads_far_chunks() {
        let mut store = store(flat(5), 1);
        store.update_loaded_chunks(Vec3::ZERO);
        assert!(store.is_loaded(ChunkCoord::new(-1, 0, 0)));

        let stats = store.update_loaded_chunks(Vec3::new(48.0, 0.0, 0.0));
        assert_eq!(stats.unloaded, 9);
        assert_eq!(stats.loaded, 9);
        assert!(!store.is_loaded(ChunkCoord::new(-1, 0, 0)));
        assert!(store.rendering(ChunkCoord::new(-1, 0, 0)).is_none());
        assert_eq!(store.pool_stats().available, 9);
    }

    #[test]
    fn test_reloaded_chunk_starts_from_zeroed_buffer() {
        let mut store = store(flat(5), 0);
        let coord = ChunkCoord::new(0, 0, 0);
        assert!(store.load_chunk(coord, 1));

        let edit = IVec3::new(3, 12, 3);
        store.set_block(edit, BlockId::STONE).unwrap();
        assert_eq!(store.try_block_at(edit), Some(BlockId::STONE));

        assert!(store.unload_chunk(coord));
        assert!(!store.is_loaded(coord));
        assert_eq!(store.try_block_at(edit), None);

        assert!(store.load_chunk(coord, 1));
        assert_eq!(store.try_block_at(edit), Some(BlockId::AIR));
        assert_eq!(store.try_block_at(IVec3::new(3, 4, 3)), Some(BlockId::GRASS));
        assert_eq!(store.pool_stats().reused, 1);
    }

    #[test]
    fn test_set_block_on_unloaded_chunk_fails() {
        let mut store = store(flat(5), 0);
        let result = store.set_block(IVec3::new(1000, 5, 1000), BlockId::STONE);
        assert!(matches!(result, Err(WorldError::ChunkNotLoaded(_))));
    }

    #[test]
    fn test_set_block_rejects_unknown_id() {
        let mut store = store(flat(5), 0);
        store.load_chunk(ChunkCoord::new(0, 0, 0), 1);
        let result = store.set_block(IVec3::new(1, 8, 1), BlockId(999));
        assert!(matches!(result, Err(WorldError::UnknownBlock(999))));
    }

    #[test]
    fn test_boundary_edit_remeshes_neighbor() {
        let mut store = store(flat(5), 1);
        store.update_loaded_chunks(Vec3::new(8.0, 8.0, 8.0));
        store.process_mesh_results();

        let neighbor = ChunkCoord::new(1, 0, 0);
        let before = face_count(&store, neighbor);
        let version = store.rendering(neighbor).map(ChunkRendering::version);
        assert!(before > 0);

        store.set_block(IVec3::new(15, 4, 8), BlockId::AIR).unwrap();
        assert!(store.chunk(neighbor).unwrap().read().is_dirty());

        assert!(store.schedule_dirty_meshes() >= 2);
        store.process_mesh_results();

        // The neighbour's grass cell at its west edge is now exposed.
        assert_eq!(face_count(&store, neighbor), before + 1);
        assert_ne!(store.rendering(neighbor).map(ChunkRendering::version), version);
        assert!(store.rendering(neighbor).unwrap().is_current());
    }

    #[test]
    fn test_interior_edit_stays_local() {
        let mut store = store(flat(5), 1);
        store.update_loaded_chunks(Vec3::new(8.0, 8.0, 8.0));
        store.process_mesh_results();

        store.set_block(IVec3::new(8, 4, 8), BlockId::AIR).unwrap();
        assert_eq!(store.schedule_dirty_meshes(), 1);
    }

    #[test]
    fn test_trees_stamp_into_loaded_neighbors() {
        let worldgen = WorldGenConfig {
            world_seed: 7,
            base_height: 13,
            height_noise: HeightNoise::Jitter { amplitude: 0 },
            decoration_chance: 0.0,
            tree_chance: 1.0,
            ..Default::default()
        };
        let mut store = store(worldgen, 0);

        let above = ChunkCoord::new(0, 1, 0);
        store.load_chunk(above, 1);
        assert!(store.chunk(above).unwrap().read().is_empty());

        store.load_chunk(ChunkCoord::new(0, 0, 0), 1);
        let chunk = store.chunk(above).unwrap();
        let chunk = chunk.read();
        assert!(chunk.is_dirty());
        assert!(matches!(
            chunk.get(IVec3::new(5, 0, 5)),
            BlockId::LOG | BlockId::LEAVES
        ));
    }

    #[test]
    fn test_tree_stamping_ignores_load_order() {
        let west = ChunkCoord::new(0, 0, 0);
        let east = ChunkCoord::new(1, 0, 0);

        let mut west_first = store(forest(), 0);
        west_first.load_chunk(west, 1);
        west_first.load_chunk(east, 1);

        let mut east_first = store(forest(), 0);
        east_first.load_chunk(east, 1);
        east_first.load_chunk(west, 1);

        assert!(blocks_of(&west_first, east).contains(&BlockId::LOG));
        assert_eq!(blocks_of(&west_first, west), blocks_of(&east_first, west));
        assert_eq!(blocks_of(&west_first, east), blocks_of(&east_first, east));
    }

    #[test]
    fn test_result_from_before_reload_is_dropped() {
        let mut store = store(flat(5), 0);
        let coord = ChunkCoord::new(0, 0, 0);
        store.load_chunk(coord, 1);
        assert_eq!(store.schedule_dirty_meshes(), 1);

        // The first result is still queued when the chunk goes away.
        store.unload_chunk(coord);
        store.load_chunk(coord, 1);
        assert_eq!(store.schedule_dirty_meshes(), 1);

        assert_eq!(store.process_mesh_results(), 1);
        assert!(store.rendering(coord).unwrap().is_current());
    }

    #[test]
    fn test_worker_pool_meshes_whole_window() {
        let mut store = threaded_store(flat(5), 1, 2);
        let stats = store.update_loaded_chunks(Vec3::new(8.0, 8.0, 8.0));
        assert_eq!(stats.meshes_scheduled, 9);

        store.wait_for_meshes(Duration::from_secs(30));
        assert_eq!(store.pending_meshes(), 0);
        for rendering in store.all_chunk_renderings() {
            assert!(rendering.is_current(), "{:?}", rendering.coord());
            assert!(rendering.has_geometry());
        }
    }

    #[test]
    fn test_worker_pool_keeps_newest_edit() {
        let mut threaded = threaded_store(flat(5), 1, 2);
        let mut inline = store(flat(5), 1);

        for store in [&mut threaded, &mut inline] {
            store.update_loaded_chunks(Vec3::new(8.0, 8.0, 8.0));
            store.wait_for_meshes(Duration::from_secs(30));

            store.set_block(IVec3::new(8, 4, 8), BlockId::AIR).unwrap();
            store.schedule_dirty_meshes();
            store.set_block(IVec3::new(15, 4, 8), BlockId::AIR).unwrap();
            store.schedule_dirty_meshes();
            store.wait_for_meshes(Duration::from_secs(30));
        }

        let center = ChunkCoord::new(0, 0, 0);
        assert!(threaded.rendering(center).unwrap().is_current());
        assert_eq!(threaded.pending_meshes(), 0);
        assert_eq!(all_faces(&threaded), all_faces(&inline));
    }

    #[test]
    fn test_solid_query_treats_unloaded_as_air() {
        let mut store = store(flat(5), 0);
        store.load_chunk(ChunkCoord::new(0, 0, 0), 1);
        assert!(store.is_solid_at(IVec3::new(2, 2, 2)));
        assert!(!store.is_solid_at(IVec3::new(2, 10, 2)));
        assert!(!store.is_solid_at(IVec3::new(-20, 2, 2)));
        assert_eq!(store.get_block_at(IVec3::new(-20, 2, 2)), BlockId::AIR);
        assert_eq!(store.try_block_at(IVec3::new(-20, 2, 2)), None);
    }

    #[test]
    fn test_touching_chunks_at_corner() {
        let coord = ChunkCoord::new(0, 0, 0);
        assert_eq!(touching_chunks(coord, IVec3::new(5, 5, 5)).len(), 1);
        assert_eq!(touching_chunks(coord, IVec3::new(0, 5, 5)).len(), 2);
        assert_eq!(touching_chunks(coord, IVec3::new(0, 15, 0)).len(), 8);
    }
}
