use crate::utils::math::AABB;
use crate::world::chunk::CHUNK_SIZE;
use glam::{IVec3, Vec3};
use std::cmp::Ordering;

/// Integer grid position of a chunk. World block `p` lives in chunk
/// `p.div_euclid(CHUNK_SIZE)` at local cell `p.rem_euclid(CHUNK_SIZE)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord(pub IVec3);

impl PartialOrd for ChunkCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ChunkCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.0.x.cmp(&other.0.x) {
            Ordering::Equal => match self.0.y.cmp(&other.0.y) {
                Ordering::Equal => self.0.z.cmp(&other.0.z),
                ord => ord,
            },
            ord => ord,
        }
    }
}

impl ChunkCoord {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self(IVec3::new(x, y, z))
    }

    pub fn from_world_pos(pos: Vec3) -> Self {
        Self::from_world_block(pos.floor().as_ivec3())
    }

    pub fn from_world_block(block: IVec3) -> Self {
        Self(block.div_euclid(IVec3::splat(CHUNK_SIZE)))
    }

    /// Local cell of a world block inside its owning chunk.
    pub fn local_of(block: IVec3) -> IVec3 {
        block.rem_euclid(IVec3::splat(CHUNK_SIZE))
    }

    pub fn x(&self) -> i32 {
        self.0.x
    }

    pub fn y(&self) -> i32 {
        self.0.y
    }

    pub fn z(&self) -> i32 {
        self.0.z
    }

    /// World block position of local cell (0, 0, 0).
    pub fn origin(&self) -> IVec3 {
        self.0 * CHUNK_SIZE
    }

    pub fn to_world_pos(&self) -> Vec3 {
        self.origin().as_vec3()
    }

    pub fn to_world_center(&self) -> Vec3 {
        self.to_world_pos() + Vec3::splat(CHUNK_SIZE as f32 / 2.0)
    }

    pub fn world_bounds(&self) -> AABB {
        let min = self.to_world_pos();
        AABB::new(min, min + Vec3::splat(CHUNK_SIZE as f32))
    }

    pub fn offset(&self, delta: IVec3) -> Self {
        Self(self.0 + delta)
    }

    pub fn get_neighbors(&self) -> Vec<Self> {
        let mut neighbors = Vec::with_capacity(26);
        for x in -1..=1 {
            for y in -1..=1 {
                for z in -1..=1 {
                    if x == 0 && y == 0 && z == 0 {
                        continue;
                    }
                    neighbors.push(Self(self.0 + IVec3::new(x, y, z)));
                }
            }
        }
        neighbors
    }

    pub fn face_neighbors(&self) -> [Self; 6] {
        [
            self.offset(IVec3::X),
            self.offset(IVec3::NEG_X),
            self.offset(IVec3::Y),
            self.offset(IVec3::NEG_Y),
            self.offset(IVec3::Z),
            self.offset(IVec3::NEG_Z),
        ]
    }

    /// Distance in chunks ignoring height.
    pub fn horizontal_distance(&self, other: &Self) -> f32 {
        let dx = (self.0.x - other.0.x) as f32;
        let dz = (self.0.z - other.0.z) as f32;
        (dx * dx + dz * dz).sqrt()
    }
}

impl From<IVec3> for ChunkCoord {
    fn from(vec: IVec3) -> Self {
        Self(vec)
    }
}

impl From<ChunkCoord> for IVec3 {
    fn from(coord: ChunkCoord) -> Self {
        coord.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_world_blocks_map_to_negative_chunks() {
        let block = IVec3::new(-1, 0, -17);
        assert_eq!(ChunkCoord::from_world_block(block), ChunkCoord::new(-1, 0, -2));
        assert_eq!(ChunkCoord::local_of(block), IVec3::new(15, 0, 15));
    }

    #[test]
    fn test_from_world_pos_floors() {
        let coord = ChunkCoord::from_world_pos(Vec3::new(-0.25, 15.9, 16.0));
        assert_eq!(coord, ChunkCoord::new(-1, 0, 1));
    }

    #[test]
    fn test_neighbor_counts() {
        let c = ChunkCoord::new(3, -2, 7);
        let all = c.get_neighbors();
        assert_eq!(all.len(), 26);
        assert!(!all.contains(&c));
        assert!(c.face_neighbors().iter().all(|n| all.contains(n)));
    }
}
