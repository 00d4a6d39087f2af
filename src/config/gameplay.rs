use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub substeps: u32,
    pub resolve_overlaps: bool,
    pub walk_speed: f32,
    pub sprint_speed: f32,
    pub crouch_speed: f32,
    pub jump_velocity: f32,
    pub acceleration: f32,
    pub air_acceleration: f32,
    pub ground_friction: f32,
    pub air_friction: f32,
    pub mouse_sensitivity: f32,
    pub reach: f32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            gravity: 9.81,
            terminal_velocity: 50.0,
            substeps: 10,
            resolve_overlaps: true,
            walk_speed: 3.0,
            sprint_speed: 6.0,
            crouch_speed: 1.5,
            jump_velocity: 5.0,
            acceleration: 20.0,
            air_acceleration: 4.0,
            ground_friction: 12.0,
            air_friction: 2.0,
            mouse_sensitivity: 0.1,
            reach: 5.0,
        }
    }
}
