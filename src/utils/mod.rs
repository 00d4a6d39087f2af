pub mod error;
pub mod logging;
pub mod math;
pub mod ray;

pub use error::{ConfigError, EngineError, MeshError, WorldError};
pub use math::{Plane, ViewFrustum, AABB};
pub use ray::{Ray, RayHit};
