use crate::world::block_facing::BlockFace;
use crate::world::block_id::{textures, BlockId, BlockRegistry};
use std::sync::Arc;

/// Maps a block face to the top-left UV corner of its atlas tile.
pub trait UvLookup: Send + Sync {
    fn uv(&self, block: BlockId, face: BlockFace) -> [f32; 2];

    /// Width and height of one tile in UV space.
    fn unit(&self) -> f32;
}

/// Square atlas of equally sized tiles, `ceil(sqrt(n))` per row, laid out
/// row-major by texture slot.
pub struct TextureAtlas {
    registry: Arc<BlockRegistry>,
    tiles_per_row: u32,
}

impl TextureAtlas {
    pub fn new(registry: Arc<BlockRegistry>, texture_count: u32) -> Self {
        let tiles_per_row = (texture_count.max(1) as f32).sqrt().ceil() as u32;
        Self {
            registry,
            tiles_per_row,
        }
    }

    /// Atlas holding every built-in texture slot.
    pub fn standard(registry: Arc<BlockRegistry>) -> Self {
        Self::new(registry, textures::COUNT as u32)
    }

    pub fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }

    pub fn tile_uv(&self, texture: u16) -> [f32; 2] {
        let slot = texture as u32;
        let unit = self.unit();
        [
            (slot % self.tiles_per_row) as f32 * unit,
            (slot / self.tiles_per_row) as f32 * unit,
        ]
    }
}

impl UvLookup for TextureAtlas {
    fn uv(&self, block: BlockId, face: BlockFace) -> [f32; 2] {
        let texture = self
            .registry
            .get(block)
            .texture(face)
            .unwrap_or(textures::DIRT);
        self.tile_uv(texture)
    }

    fn unit(&self) -> f32 {
        1.0 / self.tiles_per_row as f32
    }
}
