//! Physics systems
pub mod collision;
pub mod entity;
pub mod handler;

pub use collision::{collides, overlapping_solids, SolidQuery};
pub use entity::{Health, PhysicalEntity};
pub use handler::PhysicsResolver;

/// Physics timestep (60Hz)
pub const PHYSICS_DT: f32 = 1.0 / 60.0;
