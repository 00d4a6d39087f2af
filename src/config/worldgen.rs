use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WorldType {
    /// Heightmap terrain with decorations and trees.
    Normal,
    /// Grass surface at a fixed world height, nothing else.
    Flat { height: i32 },
    /// Empty world.
    Void,
}

/// Height offset added to the base height at each lattice sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeightNoise {
    /// Uniform integer in `[-amplitude, amplitude)` drawn per sample.
    Jitter { amplitude: i32 },
    Fractal {
        octaves: usize,
        frequency: f64,
        persistence: f64,
        lacunarity: f64,
        amplitude: f64,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenConfig {
    pub world_seed: u64,
    pub world_type: WorldType,
    pub base_height: i32,
    /// Grass plus dirt layers above stone.
    pub ground_thickness: i32,
    /// Lattice cells per chunk edge.
    pub lattice_resolution: i32,
    pub height_noise: HeightNoise,
    pub decoration_chance: f32,
    pub tree_chance: f32,
    /// When set, decorations and trees only spawn in chunks at this Y.
    pub decoration_chunk_y: Option<i32>,
}

impl Default for WorldGenConfig {
    fn default() -> Self {
        Self {
            world_seed: 0,
            world_type: WorldType::Normal,
            base_height: 10,
            ground_thickness: 3,
            lattice_resolution: 5,
            height_noise: HeightNoise::Jitter { amplitude: 2 },
            decoration_chance: 0.2,
            tree_chance: 0.01,
            decoration_chunk_y: None,
        }
    }
}
