pub mod block_facing;
pub mod block_id;
pub mod chunk;
pub mod chunk_coord;
pub mod generator;
pub mod noise_field;
pub mod pool;
pub mod spatial;
pub mod store;

// Re-export commonly used types
pub use block_facing::BlockFace;
pub use block_id::{BlockDefinition, BlockId, BlockKind, BlockRegistry, FaceTextures};
pub use chunk::{Chunk, SharedChunk, CHUNK_SIZE, CHUNK_VOLUME};
pub use chunk_coord::ChunkCoord;
pub use generator::{PendingStructure, StructureIndex, TerrainGenerator};
pub use noise_field::NoiseField;
pub use pool::{ChunkPool, PoolStats};
pub use spatial::{lod_for_distance, StreamingWindow};
pub use store::{ChunkMap, ChunkStore, StreamingStats};
