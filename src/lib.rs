pub mod config;
pub mod engine;
pub mod physics;
pub mod player;
pub mod render;
pub mod utils;
pub mod world;

// Re-export commonly used types
pub use config::chunksys::ChunkSysConfig;
pub use config::core::EngineConfig;
pub use config::gameplay::GameplayConfig;
pub use config::worldgen::WorldGenConfig;
pub use engine::{EngineStats, VoxelEngine};
pub use physics::{PhysicalEntity, PhysicsResolver, SolidQuery};
pub use player::{InputSnapshot, InputState, Key, Player};
pub use render::{Camera, ChunkMeshes, ChunkRendering, TextureAtlas, UvLookup};
pub use utils::error::{ConfigError, EngineError, MeshError, WorldError};
pub use utils::math::{Plane, ViewFrustum, AABB};
pub use utils::ray::{Ray, RayHit};
pub use world::block_id::{BlockId, BlockRegistry};
pub use world::chunk::Chunk;
pub use world::chunk_coord::ChunkCoord;
pub use world::generator::terrain::TerrainGenerator;
pub use world::store::ChunkStore;
