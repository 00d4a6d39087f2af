pub mod controller;
pub mod input;

pub use controller::{Player, EYE_HEIGHT};
pub use input::{InputSnapshot, InputState, Key};
