use crate::{
    config::core::EngineConfig,
    physics::handler::PhysicsResolver,
    player::{controller::Player, input::InputState},
    render::rendering::ChunkRendering,
    world::{
        block_id::BlockRegistry,
        pool::PoolStats,
        store::{ChunkStore, StreamingStats},
    },
};
use anyhow::{Context, Result};
use glam::Vec3;
use log::{info, warn};
use std::{sync::Arc, time::Duration};

/// Owns every subsystem of one running world. There is no global state;
/// callers hold the engine and drive it with `tick`.
pub struct VoxelEngine {
    pub config: EngineConfig,
    block_registry: Arc<BlockRegistry>,
    store: ChunkStore,
    physics: PhysicsResolver,
    player: Player,
    frame_counter: u64,
}

impl VoxelEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate().context("Invalid engine config")?;

        let block_registry = Arc::new(BlockRegistry::standard());
        let mut store = ChunkStore::new(
            &config.chunks,
            config.worldgen.clone(),
            Arc::clone(&block_registry),
        )
        .context("Failed to create chunk store")?;

        let spawn = Self::spawn_point(&store);
        let stats = store.update_loaded_chunks(spawn);
        info!(
            "World ready: {} chunks around spawn {:?}, {} meshes queued",
            stats.loaded, spawn, stats.meshes_scheduled
        );

        let physics = PhysicsResolver::new(&config.gameplay);
        let player = Player::new(spawn, &config.gameplay);

        Ok(Self {
            config,
            block_registry,
            store,
            physics,
            player,
            frame_counter: 0,
        })
    }

    /// Top of the ground at the world origin column.
    fn spawn_point(store: &ChunkStore) -> Vec3 {
        let surface = store.generator().surface_height(0, 0).max(0);
        Vec3::new(0.5, surface as f32, 0.5)
    }

    /// Runs one frame: input, physics, streaming, then mesh hand-off.
    pub fn tick(&mut self, delta_time: Duration, input: &dyn InputState) -> StreamingStats {
        self.frame_counter += 1;
        let dt = delta_time.as_secs_f32().min(0.1);

        self.player.handle_input(input, dt);
        if let Err(e) = self.player.interact(input, &mut self.store) {
            warn!("Block interaction failed: {}", e);
        }

        self.physics
            .update(delta_time, &mut self.player.body, &self.store);
        self.player.sync_camera();

        let stats = self.store.update_loaded_chunks(self.player.position());
        self.store.process_mesh_results();
        stats
    }

    pub fn block_registry(&self) -> &Arc<BlockRegistry> {
        &self.block_registry
    }

    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ChunkStore {
        &mut self.store
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Chunk geometry inside the player's view.
    pub fn visible_renderings(&self) -> Vec<&ChunkRendering> {
        self.store.visible_renderings(&self.player.camera.frustum())
    }

    pub fn get_stats(&self) -> EngineStats {
        EngineStats {
            frame_count: self.frame_counter,
            loaded_chunks: self.store.loaded_count(),
            pending_meshes: self.store.pending_meshes(),
            pending_structures: self.store.generator().pending_structures(),
            pool: self.store.pool_stats(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineStats {
    pub frame_count: u64,
    pub loaded_chunks: usize,
    pub pending_meshes: usize,
    pub pending_structures: usize,
    pub pool: PoolStats,
}
