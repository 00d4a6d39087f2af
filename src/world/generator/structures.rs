use crate::world::block_id::BlockId;
use crate::world::chunk::{in_bounds, local_index, CHUNK_SIZE};
use crate::world::chunk_coord::ChunkCoord;
use glam::IVec3;
use std::collections::HashMap;

/// Canopy radius per layer, bottom layer first.
const CANOPY_LAYERS: [i32; 4] = [2, 2, 1, 1];
/// Canopy starts this many blocks below the trunk top.
const CANOPY_DROP: i32 = 2;

pub const MIN_TRUNK_HEIGHT: i32 = 4;
pub const MAX_TRUNK_HEIGHT: i32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Tree { trunk_height: i32 },
}

/// Placement request in world coordinates, recorded while generating the
/// chunk that owns the ground it stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PendingStructure {
    pub kind: StructureKind,
    /// World position of the lowest structure cell (first trunk log).
    pub origin: IVec3,
}

impl PendingStructure {
    pub fn tree(origin: IVec3, trunk_height: i32) -> Self {
        Self {
            kind: StructureKind::Tree { trunk_height },
            origin,
        }
    }

    /// Inclusive world-space bounds of every cell the structure may write.
    pub fn bounds(&self) -> (IVec3, IVec3) {
        match self.kind {
            StructureKind::Tree { trunk_height } => {
                let radius = CANOPY_LAYERS[0];
                let top = trunk_height - CANOPY_DROP + CANOPY_LAYERS.len() as i32 - 1;
                (
                    self.origin - IVec3::new(radius, 0, radius),
                    self.origin + IVec3::new(radius, top.max(trunk_height - 1), radius),
                )
            }
        }
    }

    pub fn intersects_chunk(&self, coord: ChunkCoord) -> bool {
        let (min, max) = self.bounds();
        let chunk_min = coord.origin();
        let chunk_max = chunk_min + IVec3::splat(CHUNK_SIZE - 1);
        max.cmpge(chunk_min).all() && min.cmple(chunk_max).all()
    }

    /// Writes the part of the structure that falls inside the chunk at
    /// `coord`. Cells outside the chunk are skipped.
    pub fn stamp(&self, coord: ChunkCoord, out: &mut [BlockId]) {
        let chunk_origin = coord.origin();
        let mut write = |world: IVec3, id: BlockId, overwrite: fn(BlockId) -> bool| {
            let local = world - chunk_origin;
            if !in_bounds(local) {
                return;
            }
            let index = local_index(local.x, local.y, local.z);
            if let Some(cell) = out.get_mut(index) {
                if overwrite(*cell) {
                    *cell = id;
                }
            }
        };

        match self.kind {
            StructureKind::Tree { trunk_height } => {
                for dy in 0..trunk_height {
                    // Logs win over leaves so overlapping trees stamp the
                    // same cells in any order.
                    write(self.origin + IVec3::new(0, dy, 0), BlockId::LOG, |cell| {
                        cell.is_air() || cell == BlockId::GRASS_PLANT || cell == BlockId::LEAVES
                    });
                }

                let base = trunk_height - CANOPY_DROP;
                for (layer, radius) in CANOPY_LAYERS.iter().copied().enumerate() {
                    let y = base + layer as i32;
                    for dx in -radius..=radius {
                        for dz in -radius..=radius {
                            if radius > 1 && dx.abs() == radius && dz.abs() == radius {
                                continue;
                            }
                            write(
                                self.origin + IVec3::new(dx, y, dz),
                                BlockId::LEAVES,
                                |cell| cell.is_air(),
                            );
                        }
                    }
                }
            }
        }
    }
}

/// Pending structures grouped by the chunk whose generation produced them.
///
/// A structure never reaches further than one chunk from its source, so
/// lookups for a target chunk only visit the 27 surrounding sources.
/// Entries live as long as their source chunk is loaded.
#[derive(Debug, Default)]
pub struct StructureIndex {
    by_source: HashMap<ChunkCoord, Vec<PendingStructure>>,
}

impl StructureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the structures recorded for `source`.
    pub fn record(&mut self, source: ChunkCoord, structures: Vec<PendingStructure>) {
        if structures.is_empty() {
            self.by_source.remove(&source);
        } else {
            self.by_source.insert(source, structures);
        }
    }

    pub fn insert(&mut self, source: ChunkCoord, structure: PendingStructure) {
        self.by_source.entry(source).or_default().push(structure);
    }

    pub fn forget_source(&mut self, source: ChunkCoord) {
        self.by_source.remove(&source);
    }

    pub fn from_source(&self, source: ChunkCoord) -> &[PendingStructure] {
        self.by_source
            .get(&source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every recorded structure whose bounds overlap `target`.
    pub fn overlapping(&self, target: ChunkCoord) -> Vec<PendingStructure> {
        let mut found = Vec::new();
        for dy in -1..=1 {
            for dz in -1..=1 {
                for dx in -1..=1 {
                    let source = target.offset(IVec3::new(dx, dy, dz));
                    if let Some(list) = self.by_source.get(&source) {
                        found.extend(list.iter().filter(|s| s.intersects_chunk(target)));
                    }
                }
            }
        }
        found
    }

    pub fn len(&self) -> usize {
        self.by_source.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.by_source.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::chunk::CHUNK_VOLUME;

    fn empty_blocks() -> Vec<BlockId> {
        vec![BlockId::AIR; CHUNK_VOLUME]
    }

    #[test]
    fn test_tree_bounds_cover_canopy() {
        let tree = PendingStructure::tree(IVec3::new(10, 20, 10), 5);
        let (min, max) = tree.bounds();
        assert_eq!(min, IVec3::new(8, 20, 8));
        assert_eq!(max, IVec3::new(12, 26, 12));
    }

    #[test]
    fn test_tree_stamps_trunk_and_leaves() {
        let coord = ChunkCoord::new(0, 0, 0);
        let tree = PendingStructure::tree(IVec3::new(8, 4, 8), 5);
        let mut blocks = empty_blocks();
        tree.stamp(coord, &mut blocks);

        for y in 4..9 {
            assert_eq!(blocks[local_index(8, y, 8)], BlockId::LOG);
        }
        // Bottom canopy layer at trunk top - 2, corners cut.
        assert_eq!(blocks[local_index(10, 7, 8)], BlockId::LEAVES);
        assert_eq!(blocks[local_index(10, 7, 10)], BlockId::AIR);
        // Top layer above the trunk.
        assert_eq!(blocks[local_index(8, 10, 8)], BlockId::LEAVES);
        assert_eq!(blocks[local_index(9, 10, 9)], BlockId::LEAVES);
        assert_eq!(blocks[local_index(10, 10, 8)], BlockId::AIR);
    }

    #[test]
    fn test_leaves_never_overwrite_ground() {
        let coord = ChunkCoord::new(0, 0, 0);
        let mut blocks = empty_blocks();
        blocks[local_index(9, 7, 8)] = BlockId::STONE;
        let tree = PendingStructure::tree(IVec3::new(8, 4, 8), 5);
        tree.stamp(coord, &mut blocks);
        assert_eq!(blocks[local_index(9, 7, 8)], BlockId::STONE);
    }

    #[test]
    fn test_overlapping_trees_stamp_in_any_order() {
        let coord = ChunkCoord::new(0, 0, 0);
        let west = PendingStructure::tree(IVec3::new(6, 4, 8), 5);
        let east = PendingStructure::tree(IVec3::new(8, 4, 8), 5);

        let mut west_first = empty_blocks();
        west.stamp(coord, &mut west_first);
        east.stamp(coord, &mut west_first);

        let mut east_first = empty_blocks();
        east.stamp(coord, &mut east_first);
        west.stamp(coord, &mut east_first);

        assert_eq!(west_first, east_first);
        // The west canopy covers the east trunk top.
        assert_eq!(west_first[local_index(8, 7, 8)], BlockId::LOG);
    }

    #[test]
    fn test_stamp_clips_to_neighbor_chunk() {
        let tree = PendingStructure::tree(IVec3::new(15, 4, 8), 5);
        let east = ChunkCoord::new(1, 0, 0);
        assert!(tree.intersects_chunk(east));

        let mut blocks = empty_blocks();
        tree.stamp(east, &mut blocks);
        // World x 16 and 17 land in local x 0 and 1; the trunk stays west.
        assert_eq!(blocks[local_index(0, 7, 8)], BlockId::LEAVES);
        assert_eq!(blocks[local_index(1, 7, 8)], BlockId::LEAVES);
        assert_eq!(blocks[local_index(2, 7, 8)], BlockId::AIR);
        assert!(!blocks.contains(&BlockId::LOG));
    }

    #[test]
    fn test_index_lookup_and_forget() {
        let mut index = StructureIndex::new();
        let source = ChunkCoord::new(0, 0, 0);
        index.insert(source, PendingStructure::tree(IVec3::new(15, 4, 8), 5));
        index.insert(source, PendingStructure::tree(IVec3::new(4, 4, 4), 5));

        assert_eq!(index.len(), 2);
        assert_eq!(index.overlapping(ChunkCoord::new(1, 0, 0)).len(), 1);
        assert!(index.overlapping(ChunkCoord::new(2, 0, 0)).is_empty());
        assert_eq!(index.overlapping(source).len(), 2);

        index.forget_source(source);
        assert!(index.is_empty());
        assert!(index.overlapping(ChunkCoord::new(1, 0, 0)).is_empty());
    }
}
