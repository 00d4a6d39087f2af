use crate::world::block_id::{BlockId, BlockRegistry};
use crate::world::chunk_coord::ChunkCoord;
use glam::IVec3;
use parking_lot::RwLock;
use std::sync::Arc;

pub const CHUNK_SIZE: i32 = 16;
pub const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

pub const MAX_LIGHT: u8 = 15;

/// Chunk handle shared between the store and mesh workers.
pub type SharedChunk = Arc<RwLock<Chunk>>;

/// Packs sky light into the high nibble and block light into the low nibble.
pub fn pack_light(sky: u8, block: u8) -> u8 {
    (sky.min(MAX_LIGHT) << 4) | block.min(MAX_LIGHT)
}

pub fn sky_light(packed: u8) -> u8 {
    packed >> 4
}

pub fn block_light(packed: u8) -> u8 {
    packed & 0x0F
}

/// Flat array index of a local cell: `x + z*S + y*S*S`.
#[inline]
pub fn local_index(x: i32, y: i32, z: i32) -> usize {
    debug_assert!(
        in_bounds(IVec3::new(x, y, z)),
        "local cell ({x}, {y}, {z}) outside chunk"
    );
    (x + z * CHUNK_SIZE + y * CHUNK_SIZE * CHUNK_SIZE) as usize
}

#[inline]
pub fn in_bounds(local: IVec3) -> bool {
    local.cmpge(IVec3::ZERO).all() && local.cmplt(IVec3::splat(CHUNK_SIZE)).all()
}

/// A cube of `CHUNK_SIZE`^3 block ids with a packed light byte per cell.
///
/// Only the main thread mutates a chunk; mesh workers take read locks.
#[derive(Debug)]
pub struct Chunk {
    coord: ChunkCoord,
    blocks: Box<[BlockId]>,
    light: Box<[u8]>,
    dirty: bool,
}

impl Chunk {
    /// Wraps a zeroed block buffer, typically one taken from the pool.
    pub fn new(coord: ChunkCoord, blocks: Box<[BlockId]>) -> Self {
        debug_assert_eq!(blocks.len(), CHUNK_VOLUME);
        Self {
            coord,
            blocks,
            light: vec![pack_light(MAX_LIGHT, 0); CHUNK_VOLUME].into_boxed_slice(),
            dirty: false,
        }
    }

    pub fn empty(coord: ChunkCoord) -> Self {
        Self::new(coord, vec![BlockId::AIR; CHUNK_VOLUME].into_boxed_slice())
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    pub fn get(&self, local: IVec3) -> BlockId {
        self.blocks
            .get(local_index(local.x, local.y, local.z))
            .copied()
            .unwrap_or(BlockId::AIR)
    }

    /// Writes a cell and flags the chunk for remeshing.
    pub fn set(&mut self, local: IVec3, id: BlockId) {
        let index = local_index(local.x, local.y, local.z);
        if let Some(cell) = self.blocks.get_mut(index) {
            *cell = id;
            self.dirty = true;
        }
    }

    pub fn light(&self, local: IVec3) -> u8 {
        self.light
            .get(local_index(local.x, local.y, local.z))
            .copied()
            .unwrap_or(pack_light(MAX_LIGHT, 0))
    }

    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [BlockId] {
        &mut self.blocks
    }

    pub fn light_data(&self) -> &[u8] {
        &self.light
    }

    /// True once the block buffer has been handed back to the pool.
    pub fn is_released(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Detaches the block buffer so it can be pooled. The chunk is
    /// unusable afterwards.
    pub fn take_blocks(&mut self) -> Box<[BlockId]> {
        std::mem::take(&mut self.blocks)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(BlockId::is_air)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Clears the dirty flag, returning whether it was set.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }

    /// Single-pass light approximation. Sky light is full above the first
    /// solid cell of each column (scanning down from the chunk top) and
    /// zero below it. Emitters add block light that falls off by one per
    /// Manhattan step, ignoring occlusion.
    pub fn recompute_light(&mut self, registry: &BlockRegistry) {
        if self.is_released() {
            return;
        }
        let mut emitters = Vec::new();

        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let mut sky = MAX_LIGHT;
                for y in (0..CHUNK_SIZE).rev() {
                    let index = local_index(x, y, z);
                    let id = self.blocks[index];
                    let def = registry.get(id);
                    if def.is_solid() {
                        sky = 0;
                    }
                    if def.light_emission > 0 {
                        emitters.push((IVec3::new(x, y, z), def.light_emission));
                    }
                    self.light[index] = pack_light(sky, 0);
                }
            }
        }

        for (origin, emission) in emitters {
            let reach = emission as i32 - 1;
            for dy in -reach..=reach {
                for dz in -reach..=reach {
                    for dx in -reach..=reach {
                        let distance = dx.abs() + dy.abs() + dz.abs();
                        if distance > reach {
                            continue;
                        }
                        let cell = origin + IVec3::new(dx, dy, dz);
                        if !in_bounds(cell) {
                            continue;
                        }
                        let index = local_index(cell.x, cell.y, cell.z);
                        let value = emission - distance as u8;
                        let packed = self.light[index];
                        if value > block_light(packed) {
                            self.light[index] = pack_light(sky_light(packed), value);
                        }
                    }
                }
            }
        }
    }
}
