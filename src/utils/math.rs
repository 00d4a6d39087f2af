//! src/utils/math.rs
//! Geometric types shared by collision, meshing and visibility
use glam::{IVec3, Mat4, Vec3, Vec4};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Unit cube occupied by the block at `pos`.
    pub fn from_block(pos: IVec3) -> Self {
        let min = pos.as_vec3();
        Self {
            min,
            max: min + Vec3::ONE,
        }
    }

    /// Box of `width` x `height` x `width` standing on `feet`.
    pub fn from_feet(feet: Vec3, width: f32, height: f32) -> Self {
        let half = width * 0.5;
        Self {
            min: Vec3::new(feet.x - half, feet.y, feet.z - half),
            max: Vec3::new(feet.x + half, feet.y + height, feet.z + half),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn offset(&self, delta: Vec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Strict overlap: boxes that only touch do not intersect.
    pub fn intersects(&self, other: &AABB) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Overlap depth per axis, zero on axes that do not overlap.
    pub fn penetration(&self, other: &AABB) -> Vec3 {
        let depth = self.max.min(other.max) - self.min.max(other.min);
        depth.max(Vec3::ZERO)
    }

    /// Inclusive range of block cells this box overlaps with positive volume.
    pub fn block_range(&self) -> (IVec3, IVec3) {
        let lo = self.min.floor().as_ivec3();
        let hi = self.max.ceil().as_ivec3() - IVec3::ONE;
        (lo, hi)
    }
}

/// View frustum for culling
#[derive(Debug, Clone)]
pub struct ViewFrustum {
    pub planes: [Plane; 6],
}

impl ViewFrustum {
    /// Extracts the six clip planes of a combined projection * view matrix.
    pub fn from_matrix(view_projection: Mat4) -> Self {
        let r0 = view_projection.row(0);
        let r1 = view_projection.row(1);
        let r2 = view_projection.row(2);
        let r3 = view_projection.row(3);

        let mut planes = [
            Plane::from_vec4(r3 + r0),
            Plane::from_vec4(r3 - r0),
            Plane::from_vec4(r3 + r1),
            Plane::from_vec4(r3 - r1),
            Plane::from_vec4(r3 + r2),
            Plane::from_vec4(r3 - r2),
        ];
        for plane in &mut planes {
            plane.normalize();
        }
        Self { planes }
    }

    pub fn contains_point(&self, point: Vec3) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.signed_distance(point) >= 0.0)
    }

    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        for plane in &self.planes {
            let p = Vec3::new(
                if plane.normal.x >= 0.0 {
                    aabb.max.x
                } else {
                    aabb.min.x
                },
                if plane.normal.y >= 0.0 {
                    aabb.max.y
                } else {
                    aabb.min.y
                },
                if plane.normal.z >= 0.0 {
                    aabb.max.z
                } else {
                    aabb.min.z
                },
            );

            if plane.signed_distance(p) < 0.0 {
                return false;
            }
        }
        true
    }
}

/// Geometric plane
#[derive(Debug, Clone, Copy, Default)]
pub struct Plane {
    pub normal: Vec3,
    pub distance: f32,
}

impl Plane {
    pub fn new(normal: Vec3, distance: f32) -> Self {
        Self { normal, distance }
    }

    fn from_vec4(v: Vec4) -> Self {
        Self {
            normal: v.truncate(),
            distance: v.w,
        }
    }

    pub fn normalize(&mut self) {
        let length = self.normal.length();
        if length > 0.0 {
            self.normal /= length;
            self.distance /= length;
        }
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}
