pub mod camera;
pub mod job;
pub mod mesh;
pub mod mesher;
pub mod rendering;
pub mod texture;

pub use camera::Camera;
pub use job::{MeshOutcome, MeshScheduler, MeshTicket};
pub use mesh::{ChunkMeshes, MeshData, Vertex};
pub use mesher::{ChunkMesher, ChunkSnapshot, ChunkSource, FaceMask};
pub use rendering::ChunkRendering;
pub use texture::{TextureAtlas, UvLookup};
