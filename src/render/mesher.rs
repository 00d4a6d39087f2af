use crate::render::job::MeshTicket;
use crate::render::mesh::{ChunkMeshes, MeshData};
use crate::render::texture::UvLookup;
use crate::utils::error::MeshError;
use crate::world::block_facing::BlockFace;
use crate::world::block_id::{BlockId, BlockKind, BlockRegistry};
use crate::world::chunk::{block_light, pack_light, sky_light, SharedChunk, CHUNK_SIZE, MAX_LIGHT};
use crate::world::chunk_coord::ChunkCoord;
use bitflags::bitflags;
use glam::{IVec3, Vec3};

const PADDED: i32 = CHUNK_SIZE + 2;
const PADDED_VOLUME: usize = (PADDED * PADDED * PADDED) as usize;

/// Read access to loaded chunks for mesh workers.
pub trait ChunkSource: Send + Sync {
    fn chunk(&self, coord: ChunkCoord) -> Option<SharedChunk>;
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FaceMask: u8 {
        const TOP = 1 << 0;
        const BOTTOM = 1 << 1;
        const NORTH = 1 << 2;
        const SOUTH = 1 << 3;
        const EAST = 1 << 4;
        const WEST = 1 << 5;
    }
}

impl FaceMask {
    pub fn from_face(face: BlockFace) -> Self {
        match face {
            BlockFace::Top => Self::TOP,
            BlockFace::Bottom => Self::BOTTOM,
            BlockFace::North => Self::NORTH,
            BlockFace::South => Self::SOUTH,
            BlockFace::East => Self::EAST,
            BlockFace::West => Self::WEST,
        }
    }
}

/// Copy of a chunk plus a one-cell border taken from its face neighbours.
/// Border cells of unloaded neighbours are `None`.
pub struct ChunkSnapshot {
    blocks: Vec<Option<BlockId>>,
    light: Vec<u8>,
}

fn padded_index(cell: IVec3) -> usize {
    let p = cell + IVec3::ONE;
    debug_assert!(p.cmpge(IVec3::ZERO).all() && p.cmplt(IVec3::splat(PADDED)).all());
    (p.x + p.z * PADDED + p.y * PADDED * PADDED) as usize
}

/// Local cells of a neighbour at `offset` (-1, 0, 1 on one axis) that
/// border the centre chunk.
fn border_range(offset: i32) -> std::ops::Range<i32> {
    match offset {
        -1 => (CHUNK_SIZE - 1)..CHUNK_SIZE,
        0 => 0..CHUNK_SIZE,
        _ => 0..1,
    }
}

const CAPTURE_OFFSETS: [IVec3; 7] = [
    IVec3::ZERO,
    IVec3::X,
    IVec3::NEG_X,
    IVec3::Y,
    IVec3::NEG_Y,
    IVec3::Z,
    IVec3::NEG_Z,
];

impl ChunkSnapshot {
    pub fn empty() -> Self {
        Self {
            blocks: vec![None; PADDED_VOLUME],
            light: vec![pack_light(MAX_LIGHT, 0); PADDED_VOLUME],
        }
    }

    /// Reads the chunk at `coord` and its six face neighbours under read
    /// locks. Fails if the ticket goes stale or the chunk is gone.
    pub fn capture(
        coord: ChunkCoord,
        source: &dyn ChunkSource,
        ticket: &MeshTicket,
    ) -> Result<Self, MeshError> {
        let mut snapshot = Self::empty();

        for offset in CAPTURE_OFFSETS {
            ticket.check()?;
            let Some(shared) = source.chunk(coord.offset(offset)) else {
                if offset == IVec3::ZERO {
                    return Err(MeshError::Cancelled {
                        coord,
                        version: ticket.version(),
                    });
                }
                continue;
            };

            let chunk = shared.read();
            if chunk.is_released() {
                continue;
            }

            for y in border_range(offset.y) {
                for z in border_range(offset.z) {
                    for x in border_range(offset.x) {
                        let local = IVec3::new(x, y, z);
                        let cell = local + offset * CHUNK_SIZE;
                        let index = padded_index(cell);
                        snapshot.blocks[index] = Some(chunk.get(local));
                        snapshot.light[index] = chunk.light(local);
                    }
                }
            }
        }

        if snapshot.blocks[padded_index(IVec3::ZERO)].is_none() {
            return Err(MeshError::Cancelled {
                coord,
                version: ticket.version(),
            });
        }
        Ok(snapshot)
    }

    /// Block at a cell in `-1..=CHUNK_SIZE` on each axis.
    pub fn block(&self, cell: IVec3) -> Option<BlockId> {
        self.blocks[padded_index(cell)]
    }

    pub fn light(&self, cell: IVec3) -> u8 {
        self.light[padded_index(cell)]
    }

    pub fn set(&mut self, cell: IVec3, id: BlockId) {
        self.blocks[padded_index(cell)] = Some(id);
    }
}

/// Vertex light scalar with an ambient floor.
pub fn light_scalar(packed: u8) -> f32 {
    let level = sky_light(packed).max(block_light(packed)) as f32;
    level / MAX_LIGHT as f32 * 0.7 + 0.3
}

/// Corners of each face of the unit cube, counter-clockwise seen from
/// outside. The first two corners are the bottom edge of the texture.
fn face_corners(face: BlockFace) -> [Vec3; 4] {
    match face {
        BlockFace::Top => [
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        BlockFace::Bottom => [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(0.0, 0.0, 1.0),
        ],
        BlockFace::North => [
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
        ],
        BlockFace::South => [
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
        ],
        BlockFace::East => [
            Vec3::new(1.0, 0.0, 1.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 1.0),
        ],
        BlockFace::West => [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
    }
}

const CROSS_QUADS: [[Vec3; 4]; 2] = [
    [
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(0.0, 1.0, 0.0),
    ],
    [
        Vec3::new(1.0, 0.0, 0.0),
        Vec3::new(0.0, 0.0, 1.0),
        Vec3::new(0.0, 1.0, 1.0),
        Vec3::new(1.0, 1.0, 0.0),
    ],
];

fn tile_uvs(origin: [f32; 2], unit: f32) -> [[f32; 2]; 4] {
    let [u, v] = origin;
    [[u, v + unit], [u + unit, v + unit], [u + unit, v], [u, v]]
}

/// Turns a chunk snapshot into cube-face and foliage geometry.
pub struct ChunkMesher<'a> {
    registry: &'a BlockRegistry,
    atlas: &'a dyn UvLookup,
}

impl<'a> ChunkMesher<'a> {
    pub fn new(registry: &'a BlockRegistry, atlas: &'a dyn UvLookup) -> Self {
        Self { registry, atlas }
    }

    /// Meshes every `lod`-th cell. Checks the ticket before each cell and
    /// abandons the work once it goes stale.
    pub fn build(
        &self,
        snapshot: &ChunkSnapshot,
        lod: u32,
        ticket: &MeshTicket,
    ) -> Result<ChunkMeshes, MeshError> {
        let step = (lod.max(1) as i32).min(CHUNK_SIZE);
        let origin = ticket.coord().origin().as_vec3();
        let mut meshes = ChunkMeshes::default();

        for y in (0..CHUNK_SIZE).step_by(step as usize) {
            for z in (0..CHUNK_SIZE).step_by(step as usize) {
                for x in (0..CHUNK_SIZE).step_by(step as usize) {
                    ticket.check()?;

                    let cell = IVec3::new(x, y, z);
                    let Some(id) = snapshot.block(cell) else {
                        continue;
                    };
                    let base = origin + cell.as_vec3();

                    match self.registry.get(id).kind {
                        BlockKind::Air => {}
                        BlockKind::Cube { .. } => {
                            let mask = self.visible_faces(snapshot, cell, step);
                            for face in BlockFace::ALL {
                                if mask.contains(FaceMask::from_face(face)) {
                                    let light = snapshot.light(neighbor_cell(cell, face, step));
                                    self.emit_face(
                                        &mut meshes.opaque,
                                        id,
                                        face,
                                        base,
                                        step as f32,
                                        light_scalar(light),
                                    );
                                }
                            }
                        }
                        BlockKind::Cross { .. } => {
                            self.emit_cross(
                                &mut meshes.translucent,
                                id,
                                base,
                                light_scalar(snapshot.light(cell)),
                            );
                        }
                    }
                }
            }
        }

        Ok(meshes)
    }

    /// Faces whose neighbour does not occlude. Unknown neighbours (unloaded
    /// chunks) leave the face visible.
    pub fn visible_faces(&self, snapshot: &ChunkSnapshot, cell: IVec3, step: i32) -> FaceMask {
        let mut mask = FaceMask::empty();
        for face in BlockFace::ALL {
            let occluded = snapshot
                .block(neighbor_cell(cell, face, step))
                .map_or(false, |neighbor| self.registry.is_solid(neighbor));
            if !occluded {
                mask |= FaceMask::from_face(face);
            }
        }
        mask
    }

    fn emit_face(
        &self,
        mesh: &mut MeshData,
        id: BlockId,
        face: BlockFace,
        base: Vec3,
        size: f32,
        light: f32,
    ) {
        let corners = face_corners(face).map(|c| base + c * size);
        let uvs = tile_uvs(self.atlas.uv(id, face), self.atlas.unit());
        mesh.add_quad(corners, uvs, light);
    }

    fn emit_cross(&self, mesh: &mut MeshData, id: BlockId, base: Vec3, light: f32) {
        let uvs = tile_uvs(self.atlas.uv(id, BlockFace::North), self.atlas.unit());
        for quad in CROSS_QUADS {
            mesh.add_quad(quad.map(|c| base + c), uvs, light);
        }
    }
}

/// Cell `step` blocks away across `face`, clamped to the snapshot border.
fn neighbor_cell(cell: IVec3, face: BlockFace, step: i32) -> IVec3 {
    (cell + face.normal() * step).clamp(IVec3::splat(-1), IVec3::splat(CHUNK_SIZE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::texture::TextureAtlas;
    use crate::world::chunk::Chunk;
    use parking_lot::RwLock;
    use std::collections::HashMap;
    use std::sync::atomic::AtomicU64;
    use std::sync::Arc;

    #[derive(Default)]
    struct TestChunks(HashMap<ChunkCoord, SharedChunk>);

    impl TestChunks {
        fn insert(&mut self, chunk: Chunk) {
            self.0.insert(chunk.coord(), Arc::new(RwLock::new(chunk)));
        }
    }

    impl ChunkSource for TestChunks {
        fn chunk(&self, coord: ChunkCoord) -> Option<SharedChunk> {
            self.0.get(&coord).cloned()
        }
    }

    fn ticket(coord: ChunkCoord) -> MeshTicket {
        MeshTicket::new(coord, 0, Arc::new(AtomicU64::new(0)))
    }

    fn mesh(chunks: &TestChunks, coord: ChunkCoord, lod: u32) -> ChunkMeshes {
        let registry = BlockRegistry::standard();
        let atlas = TextureAtlas::standard(Arc::new(BlockRegistry::standard()));
        let ticket = ticket(coord);
        let snapshot = ChunkSnapshot::capture(coord, chunks, &ticket).unwrap();
        ChunkMesher::new(&registry, &atlas)
            .build(&snapshot, lod, &ticket)
            .unwrap()
    }

    fn slab_chunk(coord: ChunkCoord) -> Chunk {
        let mut chunk = Chunk::empty(coord);
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                chunk.set(IVec3::new(x, 0, z), BlockId::STONE);
            }
        }
        chunk
    }

    #[test]
    fn test_isolated_block_has_six_faces() {
        let coord = ChunkCoord::new(0, 0, 0);
        let mut chunk = Chunk::empty(coord);
        chunk.set(IVec3::new(5, 5, 5), BlockId::STONE);
        let mut chunks = TestChunks::default();
        chunks.insert(chunk);

        let meshes = mesh(&chunks, coord, 1);
        assert_eq!(meshes.opaque.quad_count(), 6);
        assert_eq!(meshes.opaque.vertices.len(), 24);
        assert!(meshes.translucent.is_empty());
    }

    #[test]
    fn test_slab_hides_faces_at_chunk_boundary() {
        let west = ChunkCoord::new(0, 0, 0);
        let east = ChunkCoord::new(1, 0, 0);
        let mut chunks = TestChunks::default();
        chunks.insert(slab_chunk(west));

        // Alone: top + bottom + four open rims.
        let alone = mesh(&chunks, west, 1);
        assert_eq!(alone.opaque.quad_count(), 256 + 256 + 4 * 16);

        chunks.insert(slab_chunk(east));
        let joined = mesh(&chunks, west, 1);
        assert_eq!(joined.opaque.quad_count(), 256 + 256 + 3 * 16);

        let boundary_faces = joined
            .opaque
            .vertices
            .chunks(4)
            .filter(|quad| quad.iter().all(|v| v.position[0] == 16.0))
            .count();
        assert_eq!(boundary_faces, 0);
    }

    #[test]
    fn test_foliage_does_not_occlude() {
        let coord = ChunkCoord::new(0, 0, 0);
        let mut chunk = Chunk::empty(coord);
        chunk.set(IVec3::new(4, 4, 4), BlockId::STONE);
        chunk.set(IVec3::new(4, 5, 4), BlockId::GRASS_PLANT);
        let mut chunks = TestChunks::default();
        chunks.insert(chunk);

        let meshes = mesh(&chunks, coord, 1);
        assert_eq!(meshes.opaque.quad_count(), 6);
        assert_eq!(meshes.translucent.quad_count(), 2);
    }

    #[test]
    fn test_adjacent_blocks_share_no_faces() {
        let coord = ChunkCoord::new(0, 0, 0);
        let mut chunk = Chunk::empty(coord);
        chunk.set(IVec3::new(4, 4, 4), BlockId::STONE);
        chunk.set(IVec3::new(5, 4, 4), BlockId::DIRT);
        let mut chunks = TestChunks::default();
        chunks.insert(chunk);

        assert_eq!(mesh(&chunks, coord, 1).opaque.quad_count(), 10);
    }

    #[test]
    fn test_coarse_lod_merges_cells() {
        let coord = ChunkCoord::new(0, 0, 0);
        let mut chunk = Chunk::empty(coord);
        chunk.blocks_mut().fill(BlockId::STONE);
        let mut chunks = TestChunks::default();
        chunks.insert(chunk);

        assert_eq!(mesh(&chunks, coord, 1).opaque.quad_count(), 6 * 16 * 16);
        let coarse = mesh(&chunks, coord, 2);
        assert_eq!(coarse.opaque.quad_count(), 6 * 8 * 8);
        let max_x = coarse
            .opaque
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_x, 16.0);
    }

    #[test]
    fn test_light_scalar_floor_and_ceiling() {
        assert!((light_scalar(pack_light(0, 0)) - 0.3).abs() < 1e-6);
        assert!((light_scalar(pack_light(15, 0)) - 1.0).abs() < 1e-6);
        assert!((light_scalar(pack_light(0, 15)) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_face_light_samples_adjacent_cell() {
        let registry = BlockRegistry::standard();
        let coord = ChunkCoord::new(0, 0, 0);
        let mut chunk = Chunk::empty(coord);
        // Roof at y 10 shades everything below; stone at y 2 sits in shadow.
        for x in 0..CHUNK_SIZE {
            for z in 0..CHUNK_SIZE {
                chunk.set(IVec3::new(x, 10, z), BlockId::STONE);
            }
        }
        chunk.set(IVec3::new(8, 2, 8), BlockId::STONE);
        chunk.recompute_light(&registry);
        let mut chunks = TestChunks::default();
        chunks.insert(chunk);

        let meshes = mesh(&chunks, coord, 1);
        let lowest = meshes
            .opaque
            .vertices
            .iter()
            .filter(|v| v.position[1] <= 3.0)
            .map(|v| v.light)
            .fold(f32::MAX, f32::min);
        assert!((lowest - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_stale_ticket_cancels_build() {
        let coord = ChunkCoord::new(0, 0, 0);
        let mut chunks = TestChunks::default();
        chunks.insert(slab_chunk(coord));

        let version = Arc::new(AtomicU64::new(1));
        let stale = MeshTicket::new(coord, 0, Arc::clone(&version));
        assert!(matches!(
            ChunkSnapshot::capture(coord, &chunks, &stale),
            Err(MeshError::Cancelled { version: 0, .. })
        ));

        let fresh = MeshTicket::new(coord, 1, Arc::clone(&version));
        let snapshot = ChunkSnapshot::capture(coord, &chunks, &fresh).unwrap();
        version.store(2, std::sync::atomic::Ordering::Release);

        let registry = BlockRegistry::standard();
        let atlas = TextureAtlas::standard(Arc::new(BlockRegistry::standard()));
        let result = ChunkMesher::new(&registry, &atlas).build(&snapshot, 1, &fresh);
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_chunk_cannot_be_captured() {
        let chunks = TestChunks::default();
        let coord = ChunkCoord::new(9, 9, 9);
        assert!(ChunkSnapshot::capture(coord, &chunks, &ticket(coord)).is_err());
    }
}
