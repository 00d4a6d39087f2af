use std::time::Duration;

use glam::Vec3;

use crate::config::gameplay::GameplayConfig;
use crate::physics::collision::{collides, overlapping_solids, SolidQuery};
use crate::physics::entity::PhysicalEntity;
use crate::physics::PHYSICS_DT;
use crate::utils::math::AABB;

const MAX_FRAME_TIME: f32 = 0.1;
const GROUND_PROBE: f32 = 1e-3;
const CONTACT_GAP: f32 = 1e-4;
const MAX_OVERLAP_ITERATIONS: usize = 4;

/// Moves entities through the voxel grid on a fixed 60 Hz step.
///
/// Each step is split into substeps and every substep resolves the axes
/// one at a time in Y, X, Z order.
pub struct PhysicsResolver {
    gravity: f32,
    terminal_velocity: f32,
    substeps: u32,
    resolve_overlaps: bool,
    accumulated_time: f32,
}

impl Default for PhysicsResolver {
    fn default() -> Self {
        Self::new(&GameplayConfig::default())
    }
}

impl PhysicsResolver {
    pub fn new(config: &GameplayConfig) -> Self {
        Self {
            gravity: config.gravity,
            terminal_velocity: config.terminal_velocity,
            substeps: config.substeps.max(1),
            resolve_overlaps: config.resolve_overlaps,
            accumulated_time: 0.0,
        }
    }

    /// Advances the simulation by a frame, returning the number of fixed
    /// steps taken. Leftover time carries into the next frame.
    pub fn update<W: SolidQuery + ?Sized>(
        &mut self,
        delta_time: Duration,
        entity: &mut PhysicalEntity,
        world: &W,
    ) -> u32 {
        let dt = delta_time.as_secs_f32().min(MAX_FRAME_TIME);
        self.accumulated_time += dt;

        let mut steps = 0;
        while self.accumulated_time >= PHYSICS_DT {
            self.step(entity, world, PHYSICS_DT);
            self.accumulated_time -= PHYSICS_DT;
            steps += 1;
        }
        steps
    }

    pub fn step<W: SolidQuery + ?Sized>(&self, entity: &mut PhysicalEntity, world: &W, dt: f32) {
        self.check_ground(entity, world);

        if entity.on_ground {
            entity.velocity.y = entity.velocity.y.max(0.0);
        } else {
            entity.velocity.y -= self.gravity * dt;
            entity.velocity.y = entity.velocity.y.max(-self.terminal_velocity);
        }

        let mut delta = entity.velocity * dt / self.substeps as f32;
        for _ in 0..self.substeps {
            for axis in [1, 0, 2] {
                if delta[axis] == 0.0 {
                    continue;
                }
                if self.move_axis(entity, world, axis, delta[axis]) {
                    delta[axis] = 0.0;
                }
            }
            if self.resolve_overlaps {
                self.push_out(entity, world);
            }
        }
    }

    /// Drops a grounded entity into the airborne state once nothing
    /// supports its feet.
    fn check_ground<W: SolidQuery + ?Sized>(&self, entity: &mut PhysicalEntity, world: &W) {
        if !entity.on_ground {
            return;
        }
        let feet = entity.aabb().offset(Vec3::new(0.0, -GROUND_PROBE, 0.0));
        if !collides(&feet, world) {
            entity.on_ground = false;
        }
    }

    /// Tentatively moves along one axis. Returns true when the move was
    /// blocked, in which case the entity rests against the contact face.
    fn move_axis<W: SolidQuery + ?Sized>(
        &self,
        entity: &mut PhysicalEntity,
        world: &W,
        axis: usize,
        distance: f32,
    ) -> bool {
        let old = entity.position[axis];
        entity.position[axis] = old + distance;

        let solids = overlapping_solids(&entity.aabb(), world);
        if solids.is_empty() {
            if axis == 1 {
                entity.on_ground = false;
            }
            return false;
        }

        let extent = self.lower_extent(entity, axis);
        let snapped = if distance < 0.0 {
            let contact = solids
                .iter()
                .map(|b| b.max[axis])
                .fold(f32::NEG_INFINITY, f32::max);
            let gap = if axis == 1 { 0.0 } else { CONTACT_GAP };
            (contact + extent + gap).min(old)
        } else {
            let contact = solids
                .iter()
                .map(|b| b.min[axis])
                .fold(f32::INFINITY, f32::min);
            (contact - self.upper_extent(entity, axis) - CONTACT_GAP).max(old)
        };

        entity.position[axis] = snapped;
        entity.velocity[axis] = 0.0;
        if axis == 1 && distance < 0.0 {
            entity.on_ground = true;
        }
        true
    }

    /// Distance from the entity's position to the low face of its box.
    fn lower_extent(&self, entity: &PhysicalEntity, axis: usize) -> f32 {
        if axis == 1 {
            0.0
        } else {
            entity.half_width()
        }
    }

    /// Distance from the entity's position to the high face of its box.
    fn upper_extent(&self, entity: &PhysicalEntity, axis: usize) -> f32 {
        if axis == 1 {
            entity.height
        } else {
            entity.half_width()
        }
    }

    /// Pushes the entity out of any block it still overlaps along the axis
    /// of least penetration.
    fn push_out<W: SolidQuery + ?Sized>(&self, entity: &mut PhysicalEntity, world: &W) {
        for _ in 0..MAX_OVERLAP_ITERATIONS {
            let aabb = entity.aabb();
            let solids = overlapping_solids(&aabb, world);
            let Some(block) = solids.first() else {
                return;
            };

            let depth = aabb.penetration(block);
            let axis = smallest_axis(depth);
            let upward = aabb.center()[axis] >= block.center()[axis];
            self.resolve_against(entity, block, axis, upward);
        }
    }

    fn resolve_against(&self, entity: &mut PhysicalEntity, block: &AABB, axis: usize, positive: bool) {
        if positive {
            let gap = if axis == 1 { 0.0 } else { CONTACT_GAP };
            entity.position[axis] = block.max[axis] + self.lower_extent(entity, axis) + gap;
        } else {
            entity.position[axis] = block.min[axis] - self.upper_extent(entity, axis) - CONTACT_GAP;
        }

        if axis == 1 {
            entity.velocity.y = 0.0;
            if positive {
                entity.on_ground = true;
            }
        } else {
            entity.velocity[axis] = 0.0;
        }
    }
}

fn smallest_axis(depth: Vec3) -> usize {
    let mut axis = 1;
    for candidate in [0, 2] {
        if depth[candidate] < depth[axis] {
            axis = candidate;
        }
    }
    axis
}
