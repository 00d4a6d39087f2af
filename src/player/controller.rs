use crate::config::gameplay::GameplayConfig;
use crate::physics::entity::PhysicalEntity;
use crate::player::input::{InputState, Key};
use crate::render::camera::Camera;
use crate::utils::error::WorldError;
use crate::utils::math::AABB;
use crate::utils::ray::{Ray, RayHit};
use crate::world::block_id::BlockId;
use crate::world::store::ChunkStore;
use glam::{IVec3, Vec2, Vec3};
use log::debug;

pub const EYE_HEIGHT: f32 = 1.62;

/// First-person player: a physics body with a camera at eye height.
#[derive(Debug, Clone)]
pub struct Player {
    pub body: PhysicalEntity,
    pub camera: Camera,
    pub eye_height: f32,
    pub selected_block: BlockId,
    settings: GameplayConfig,
}

impl Player {
    pub fn new(position: Vec3, settings: &GameplayConfig) -> Self {
        let mut player = Self {
            body: PhysicalEntity::new(position),
            camera: Camera::default(),
            eye_height: EYE_HEIGHT,
            selected_block: BlockId::STONE,
            settings: settings.clone(),
        };
        player.sync_camera();
        player
    }

    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    pub fn eye_position(&self) -> Vec3 {
        self.body.position + Vec3::new(0.0, self.eye_height, 0.0)
    }

    pub fn sync_camera(&mut self) {
        self.camera.position = self.eye_position();
    }

    /// Applies mouse look and turns held keys into body velocity.
    pub fn handle_input(&mut self, input: &dyn InputState, dt: f32) {
        self.camera
            .rotate(input.mouse_delta(), self.settings.mouse_sensitivity);

        let axis = |positive: Key, negative: Key| -> f32 {
            (input.is_key_down(positive) as i32 - input.is_key_down(negative) as i32) as f32
        };
        let forward = axis(Key::Forward, Key::Backward);
        let strafe = axis(Key::Right, Key::Left);

        let flat_right = self.camera.flat_front().cross(Vec3::Y);
        let direction = (self.camera.flat_front() * forward + flat_right * strafe).normalize_or_zero();

        let speed = if input.is_key_down(Key::Crouch) {
            self.settings.crouch_speed
        } else if input.is_key_down(Key::Sprint) {
            self.settings.sprint_speed
        } else {
            self.settings.walk_speed
        };

        self.apply_movement(Vec2::new(direction.x, direction.z) * speed, dt);

        if input.is_key_down(Key::Jump) {
            self.jump();
        }
    }

    /// Moves horizontal velocity towards `wish`, or lets friction bleed it
    /// off when there is no input.
    fn apply_movement(&mut self, wish: Vec2, dt: f32) {
        let grounded = self.body.on_ground;
        let mut horizontal = Vec2::new(self.body.velocity.x, self.body.velocity.z);

        if wish != Vec2::ZERO {
            let acceleration = if grounded {
                self.settings.acceleration
            } else {
                self.settings.air_acceleration
            };
            let change = (wish - horizontal).clamp_length_max(acceleration * dt);
            horizontal += change;
        } else {
            let friction = if grounded {
                self.settings.ground_friction
            } else {
                self.settings.air_friction
            };
            let speed = horizontal.length();
            let reduced = (speed - friction * dt).max(0.0);
            horizontal = if speed > 0.0 {
                horizontal * (reduced / speed)
            } else {
                Vec2::ZERO
            };
        }

        self.body.velocity.x = horizontal.x;
        self.body.velocity.z = horizontal.y;
    }

    /// Returns true if the player left the ground.
    pub fn jump(&mut self) -> bool {
        if !self.body.on_ground {
            return false;
        }
        self.body.velocity.y = self.settings.jump_velocity;
        self.body.on_ground = false;
        true
    }

    /// First non-air block along the view direction within reach.
    pub fn pick_block(&self, store: &ChunkStore) -> Option<RayHit> {
        let ray = Ray::new(self.eye_position(), self.camera.front());
        ray.cast_blocks(self.settings.reach, |cell| {
            store.try_block_at(cell).map_or(false, |id| !id.is_air())
        })
    }

    /// Removes the targeted block. Returns the cell that was cleared.
    pub fn break_block(&self, store: &mut ChunkStore) -> Result<Option<IVec3>, WorldError> {
        let Some(hit) = self.pick_block(store) else {
            return Ok(None);
        };
        store.set_block(hit.block, BlockId::AIR)?;
        debug!("Broke block at {}", hit.block);
        Ok(Some(hit.block))
    }

    /// Places `block` against the targeted face. Placement that would
    /// overlap the player's body is refused.
    pub fn place_block(
        &self,
        store: &mut ChunkStore,
        block: BlockId,
    ) -> Result<Option<IVec3>, WorldError> {
        let Some(hit) = self.pick_block(store) else {
            return Ok(None);
        };
        let target = hit.previous;
        if target == hit.block {
            return Ok(None);
        }
        if store.registry().is_solid(block)
            && AABB::from_block(target).intersects(&self.body.aabb())
        {
            return Ok(None);
        }
        if store.try_block_at(target) != Some(BlockId::AIR) {
            return Ok(None);
        }

        store.set_block(target, block)?;
        debug!("Placed {} at {}", block, target);
        Ok(Some(target))
    }

    /// Break and place on the frames their keys go down.
    pub fn interact(
        &self,
        input: &dyn InputState,
        store: &mut ChunkStore,
    ) -> Result<(), WorldError> {
        if input.just_down(Key::Break) {
            self.break_block(store)?;
        }
        if input.just_down(Key::Place) {
            self.place_block(store, self.selected_block)?;
        }
        Ok(())
    }
}
