use crate::utils::math::AABB;
use glam::Vec3;

pub const ENTITY_WIDTH: f32 = 0.6;
pub const ENTITY_HEIGHT: f32 = 1.8;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Health {
    current: f32,
    max: f32,
}

impl Health {
    pub fn new(current: f32, max: f32) -> Self {
        Self {
            current: current.clamp(0.0, max),
            max,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn set_current(&mut self, current: f32) {
        self.current = current.clamp(0.0, self.max);
    }

    /// Lowering the maximum also caps the current value.
    pub fn set_max(&mut self, max: f32) {
        self.max = max.max(0.0);
        self.current = self.current.min(self.max);
    }

    /// Returns true if this damage was lethal.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.is_alive();
        self.current = (self.current - amount.max(0.0)).max(0.0);
        was_alive && !self.is_alive()
    }

    pub fn heal(&mut self, amount: f32) {
        if self.is_alive() {
            self.current = (self.current + amount.max(0.0)).min(self.max);
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(50.0, 100.0)
    }
}

/// Box-shaped body moved by the physics resolver. `position` is the
/// centre of the feet.
#[derive(Debug, Clone)]
pub struct PhysicalEntity {
    pub position: Vec3,
    pub velocity: Vec3,
    pub width: f32,
    pub height: f32,
    pub on_ground: bool,
    pub health: Health,
}

impl PhysicalEntity {
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            width: ENTITY_WIDTH,
            height: ENTITY_HEIGHT,
            on_ground: false,
            health: Health::default(),
        }
    }

    pub fn aabb(&self) -> AABB {
        AABB::from_feet(self.position, self.width, self.height)
    }

    pub fn half_width(&self) -> f32 {
        self.width * 0.5
    }

    /// Moves the body without sweeping and drops all momentum.
    pub fn teleport(&mut self, position: Vec3) {
        self.position = position;
        self.velocity = Vec3::ZERO;
        self.on_ground = false;
    }
}
