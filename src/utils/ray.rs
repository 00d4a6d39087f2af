use glam::{IVec3, Vec3};

#[derive(Debug, Clone)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// First cell hit by a block ray cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Cell that stopped the ray.
    pub block: IVec3,
    /// Last empty cell before `block`; where a placed block goes.
    pub previous: IVec3,
    pub distance: f32,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Walks the voxel grid cell by cell (Amanatides & Woo) until `hit`
    /// accepts a cell or `max_distance` is exceeded.
    pub fn cast_blocks<F>(&self, max_distance: f32, mut hit: F) -> Option<RayHit>
    where
        F: FnMut(IVec3) -> bool,
    {
        if self.direction == Vec3::ZERO {
            return None;
        }

        let mut cell = self.origin.floor().as_ivec3();
        let mut previous = cell;
        let step = IVec3::new(
            axis_step(self.direction.x),
            axis_step(self.direction.y),
            axis_step(self.direction.z),
        );

        let mut t_max = Vec3::ZERO;
        let mut t_delta = Vec3::ZERO;
        for i in 0..3 {
            let d = self.direction[i];
            if d == 0.0 {
                t_max[i] = f32::INFINITY;
                t_delta[i] = f32::INFINITY;
            } else {
                let boundary = if d > 0.0 {
                    cell[i] as f32 + 1.0
                } else {
                    cell[i] as f32
                };
                t_max[i] = (boundary - self.origin[i]) / d;
                t_delta[i] = 1.0 / d.abs();
            }
        }

        let mut distance = 0.0;
        while distance <= max_distance {
            if hit(cell) {
                return Some(RayHit {
                    block: cell,
                    previous,
                    distance,
                });
            }

            previous = cell;
            let axis = if t_max.x < t_max.y {
                if t_max.x < t_max.z {
                    0
                } else {
                    2
                }
            } else if t_max.y < t_max.z {
                1
            } else {
                2
            };
            distance = t_max[axis];
            cell[axis] += step[axis];
            t_max[axis] += t_delta[axis];
        }

        None
    }
}

fn axis_step(d: f32) -> i32 {
    if d > 0.0 {
        1
    } else if d < 0.0 {
        -1
    } else {
        0
    }
}
