//! Per-entity kinematic state shared by the movement pipeline.

use glam::Vec2;

/// Velocity, acceleration and movement flags of an entity.
///
/// `acceleration` is the exertion-authored acceleration for the current tick
/// and is zeroed by the physics integrator once consumed;
/// `last_acceleration` keeps the total the integrator actually applied.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MoveState {
    /// Velocity in world units per second.
    pub velocity: Vec2,
    /// Authored acceleration for this tick.
    pub acceleration: Vec2,
    /// Total acceleration integrated on the last tick.
    pub last_acceleration: Vec2,
    /// At rest with no active intent.
    pub settled: bool,
    /// A seek is in progress.
    pub seeking: bool,
    /// Distance left to the seek target.
    pub remaining_distance: f32,
    /// Standing on a surface.
    pub grounded: bool,
    /// Normal of the surface when grounded.
    pub ground_normal: Vec2,
    /// Fraction of authored acceleration available while airborne, in `[0, 1]`.
    pub air_control: f32,
}

impl Default for MoveState {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            last_acceleration: Vec2::ZERO,
            settled: true,
            seeking: false,
            remaining_distance: 0.0,
            grounded: false,
            ground_normal: Vec2::Y,
            air_control: 1.0,
        }
    }
}

impl MoveState {
    /// State with an initial velocity.
    pub fn with_velocity(velocity: Vec2) -> Self {
        Self {
            velocity,
            settled: false,
            ..Self::default()
        }
    }

    /// Mark the entity as standing on a surface with `normal`.
    pub fn ground(&mut self, normal: Vec2) {
        self.grounded = true;
        self.ground_normal = normal.normalize_or(Vec2::Y);
    }

    /// Mark the entity as airborne.
    pub fn unground(&mut self) {
        self.grounded = false;
    }

    /// Clear velocity, acceleration and seek bookkeeping.
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.acceleration = Vec2::ZERO;
        self.last_acceleration = Vec2::ZERO;
        self.seeking = false;
        self.remaining_distance = 0.0;
    }
}
