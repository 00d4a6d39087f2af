use crate::utils::math::AABB;
use glam::IVec3;

/// Per-cell solidity lookup used for collision. Cells in unloaded chunks
/// must report `false`.
pub trait SolidQuery {
    fn is_solid_at(&self, block: IVec3) -> bool;
}

impl<F> SolidQuery for F
where
    F: Fn(IVec3) -> bool,
{
    fn is_solid_at(&self, block: IVec3) -> bool {
        self(block)
    }
}

/// Boxes of every solid cell the AABB overlaps.
pub fn overlapping_solids<W: SolidQuery + ?Sized>(aabb: &AABB, world: &W) -> Vec<AABB> {
    let (lo, hi) = aabb.block_range();
    let mut boxes = Vec::new();
    for y in lo.y..=hi.y {
        for z in lo.z..=hi.z {
            for x in lo.x..=hi.x {
                let cell = IVec3::new(x, y, z);
                if world.is_solid_at(cell) {
                    let block = AABB::from_block(cell);
                    if aabb.intersects(&block) {
                        boxes.push(block);
                    }
                }
            }
        }
    }
    boxes
}

pub fn collides<W: SolidQuery + ?Sized>(aabb: &AABB, world: &W) -> bool {
    !overlapping_solids(aabb, world).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_resting_box_does_not_collide() {
        let floor = |p: IVec3| p.y < 10;
        let standing = AABB::from_feet(Vec3::new(0.5, 10.0, 0.5), 0.6, 1.8);
        assert!(!collides(&standing, &floor));
        assert!(collides(&standing.offset(Vec3::new(0.0, -0.01, 0.0)), &floor));
    }

    #[test]
    fn test_overlap_lists_each_cell() {
        let floor = |p: IVec3| p.y < 10;
        // Straddles four columns and sinks into one layer.
        let body = AABB::from_feet(Vec3::new(1.0, 9.5, 1.0), 0.6, 1.8);
        assert_eq!(overlapping_solids(&body, &floor).len(), 4);
    }
}
