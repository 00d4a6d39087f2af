use crate::config::worldgen::{WorldGenConfig, WorldType};
use crate::world::block_id::BlockId;
use crate::world::chunk::{local_index, CHUNK_SIZE, CHUNK_VOLUME};
use crate::world::chunk_coord::ChunkCoord;
use crate::world::generator::structures::{
    PendingStructure, StructureIndex, MAX_TRUNK_HEIGHT, MIN_TRUNK_HEIGHT,
};
use crate::world::noise_field::NoiseField;
use glam::IVec3;
use log::debug;
use parking_lot::Mutex;

const DECORATION_SALT: u64 = 9999;
const TREE_SALT: u64 = 7331;
const TRUNK_SALT: u64 = 4242;

/// Fills chunk block arrays from world coordinates.
///
/// Terrain is a pure function of the seed and the chunk coordinate.
/// Trees are recorded in a structure index while their source chunk is
/// generated and stamped into every chunk their bounds overlap.
pub struct TerrainGenerator {
    config: WorldGenConfig,
    noise: NoiseField,
    structures: Mutex<StructureIndex>,
}

impl TerrainGenerator {
    pub fn new(config: WorldGenConfig) -> Self {
        let noise = NoiseField::new(config.world_seed, config.height_noise);
        Self {
            config,
            noise,
            structures: Mutex::new(StructureIndex::new()),
        }
    }

    pub fn config(&self) -> &WorldGenConfig {
        &self.config
    }

    fn resolution(&self) -> i32 {
        self.config.lattice_resolution.max(1)
    }

    fn cell_size(&self) -> f32 {
        CHUNK_SIZE as f32 / self.resolution() as f32
    }

    /// Height samples at `(R+1)^2` lattice points spanning the chunk column.
    fn height_lattice(&self, chunk_x: i32, chunk_z: i32) -> Vec<f32> {
        let res = self.resolution();
        let cell = self.cell_size();
        let world_x0 = chunk_x * CHUNK_SIZE;
        let world_z0 = chunk_z * CHUNK_SIZE;

        let mut lattice = Vec::with_capacity(((res + 1) * (res + 1)) as usize);
        for hx in 0..=res {
            for hz in 0..=res {
                let world_x = world_x0 + (hx as f32 * cell) as i32;
                let world_z = world_z0 + (hz as f32 * cell) as i32;
                let height = self.config.base_height + self.noise.height_offset(world_x, world_z);
                lattice.push(height as f32);
            }
        }
        lattice
    }

    /// Bilinear interpolation of the lattice at a local column. Lattice
    /// indices are clamped so the `+1` neighbour always exists.
    fn interpolate(&self, lattice: &[f32], local_x: i32, local_z: i32) -> i32 {
        let res = self.resolution();
        let cell = self.cell_size();
        let sample = |ix: i32, iz: i32| lattice[(ix * (res + 1) + iz) as usize];

        let fx = local_x as f32 / cell;
        let fz = local_z as f32 / cell;
        let ix = (fx as i32).clamp(0, res - 1);
        let iz = (fz as i32).clamp(0, res - 1);
        let dx = fx - ix as f32;
        let dz = fz - iz as f32;

        let h0 = sample(ix, iz) * (1.0 - dx) + sample(ix + 1, iz) * dx;
        let h1 = sample(ix, iz + 1) * (1.0 - dx) + sample(ix + 1, iz + 1) * dx;
        (h0 * (1.0 - dz) + h1 * dz) as i32
    }

    /// World Y of the first air cell above the ground in a column.
    pub fn surface_height(&self, world_x: i32, world_z: i32) -> i32 {
        match self.config.world_type {
            WorldType::Normal => {
                let chunk_x = world_x.div_euclid(CHUNK_SIZE);
                let chunk_z = world_z.div_euclid(CHUNK_SIZE);
                let lattice = self.height_lattice(chunk_x, chunk_z);
                self.interpolate(
                    &lattice,
                    world_x.rem_euclid(CHUNK_SIZE),
                    world_z.rem_euclid(CHUNK_SIZE),
                )
            }
            WorldType::Flat { height } => height,
            WorldType::Void => i32::MIN,
        }
    }

    /// Block a column with the given surface holds at `world_y`.
    fn layer_block(&self, world_y: i32, surface: i32) -> BlockId {
        if world_y >= surface {
            BlockId::AIR
        } else if world_y < surface - self.config.ground_thickness {
            BlockId::STONE
        } else if world_y < surface - 1 {
            BlockId::DIRT
        } else {
            BlockId::GRASS
        }
    }

    /// Fills `out` with the terrain of one chunk and records the chunk's
    /// tree requests. Returns the requests found.
    pub fn generate_chunk_content(
        &self,
        coord: ChunkCoord,
        out: &mut [BlockId],
    ) -> Vec<PendingStructure> {
        debug_assert_eq!(out.len(), CHUNK_VOLUME);
        out.fill(BlockId::AIR);

        let surfaces: Vec<i32> = match self.config.world_type {
            WorldType::Void => return Vec::new(),
            WorldType::Flat { height } => vec![height; (CHUNK_SIZE * CHUNK_SIZE) as usize],
            WorldType::Normal => {
                let lattice = self.height_lattice(coord.x(), coord.z());
                let mut columns = Vec::with_capacity((CHUNK_SIZE * CHUNK_SIZE) as usize);
                for x in 0..CHUNK_SIZE {
                    for z in 0..CHUNK_SIZE {
                        columns.push(self.interpolate(&lattice, x, z));
                    }
                }
                columns
            }
        };

        let world_y0 = coord.y() * CHUNK_SIZE;
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let surface = surfaces[(x * CHUNK_SIZE + z) as usize];
                for y in 0..CHUNK_SIZE {
                    out[local_index(x, y, z)] = self.layer_block(world_y0 + y, surface);
                }
            }
        }

        if !matches!(self.config.world_type, WorldType::Normal) {
            return Vec::new();
        }

        let structures = self.decorate(coord, out);
        self.structures.lock().record(coord, structures.clone());
        structures
    }

    /// Second pass: grass plants and tree requests on exposed grass.
    fn decorate(&self, coord: ChunkCoord, out: &mut [BlockId]) -> Vec<PendingStructure> {
        let mut structures = Vec::new();
        if let Some(gate) = self.config.decoration_chunk_y {
            if coord.y() != gate {
                return structures;
            }
        }

        let origin = coord.origin();
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                let world_x = origin.x + x;
                let world_z = origin.z + z;

                for y in (0..CHUNK_SIZE - 1).rev() {
                    let below = local_index(x, y, z);
                    let above = local_index(x, y + 1, z);
                    if out[below] != BlockId::GRASS || out[above] != BlockId::AIR {
                        continue;
                    }

                    if self.noise.chance(world_x, world_z, DECORATION_SALT)
                        < self.config.decoration_chance
                    {
                        out[above] = BlockId::GRASS_PLANT;
                    } else if self.noise.chance(world_x, world_z, TREE_SALT)
                        < self.config.tree_chance
                    {
                        let trunk_height = self.noise.range(
                            world_x,
                            world_z,
                            TRUNK_SALT,
                            MIN_TRUNK_HEIGHT,
                            MAX_TRUNK_HEIGHT + 1,
                        );
                        let base = IVec3::new(world_x, origin.y + y + 1, world_z);
                        structures.push(PendingStructure::tree(base, trunk_height));
                    }
                    break;
                }
            }
        }

        if !structures.is_empty() {
            debug!("Chunk {:?} queued {} trees", coord, structures.len());
        }
        structures
    }

    /// Stamps every recorded structure overlapping `coord` into `out`.
    /// Returns how many were applied.
    pub fn populate_structures(&self, coord: ChunkCoord, out: &mut [BlockId]) -> usize {
        let overlapping = self.structures.lock().overlapping(coord);
        for structure in &overlapping {
            structure.stamp(coord, out);
        }
        overlapping.len()
    }

    /// Adds a structure request on behalf of `source`.
    pub fn enqueue_structure(&self, source: ChunkCoord, structure: PendingStructure) {
        self.structures.lock().insert(source, structure);
    }

    pub fn structures_from(&self, source: ChunkCoord) -> Vec<PendingStructure> {
        self.structures.lock().from_source(source).to_vec()
    }

    /// Drops the requests a chunk produced. Called when it unloads.
    pub fn forget_source(&self, source: ChunkCoord) {
        self.structures.lock().forget_source(source);
    }

    pub fn pending_structures(&self) -> usize {
        self.structures.lock().len()
    }
}
