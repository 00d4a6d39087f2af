pub mod chunksys;
pub mod core;
pub mod gameplay;
pub mod worldgen;

pub use chunksys::{ChunkSysConfig, VerticalRange};
pub use self::core::EngineConfig;
pub use gameplay::GameplayConfig;
pub use worldgen::{HeightNoise, WorldGenConfig, WorldType};
