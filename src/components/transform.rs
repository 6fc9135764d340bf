//! World-space pose with a previous-tick snapshot.
//!
//! [`Transform2D`] replaces the separate position/rotation/scale components
//! of a render-driven engine: the simulation writes the current pose every
//! tick and snapshots the previous one first, so a renderer can blend the two
//! with the clock's interpolation alpha.

use glam::Vec2;

/// Interpolated pose handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    /// World position (pivot).
    pub position: Vec2,
    /// Rotation in radians, counter-clockwise.
    pub rotation: f32,
    /// Non-uniform scale.
    pub scale: Vec2,
}

/// Current and previous world pose of an entity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    /// World position (pivot) this tick.
    pub position: Vec2,
    /// Rotation in radians this tick.
    pub rotation: f32,
    /// Scale this tick.
    pub scale: Vec2,
    /// Position at the start of the last committed tick.
    pub prev_position: Vec2,
    /// Rotation at the start of the last committed tick.
    pub prev_rotation: f32,
    /// Scale at the start of the last committed tick.
    pub prev_scale: Vec2,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl Transform2D {
    /// Place an entity at `(x, y)` with no rotation and unit scale.
    pub fn new(x: f32, y: f32) -> Self {
        let position = Vec2::new(x, y);
        Self {
            position,
            rotation: 0.0,
            scale: Vec2::ONE,
            prev_position: position,
            prev_rotation: 0.0,
            prev_scale: Vec2::ONE,
        }
    }

    /// Builder-style rotation setter.
    pub fn with_rotation(mut self, radians: f32) -> Self {
        self.rotation = radians;
        self.prev_rotation = radians;
        self
    }

    /// Builder-style scale setter.
    pub fn with_scale(mut self, sx: f32, sy: f32) -> Self {
        self.scale = Vec2::new(sx, sy);
        self.prev_scale = self.scale;
        self
    }

    /// Copy the current pose into the previous-pose slots.
    pub fn snapshot(&mut self) {
        self.prev_position = self.position;
        self.prev_rotation = self.rotation;
        self.prev_scale = self.scale;
    }

    /// Move to `position` without leaving an interpolation trail.
    pub fn place(&mut self, position: Vec2) {
        self.position = position;
        self.prev_position = position;
    }

    /// Blend previous and current pose; `alpha` is clamped to `[0, 1]`.
    pub fn interpolated(&self, alpha: f32) -> Pose {
        let t = alpha.clamp(0.0, 1.0);
        Pose {
            position: self.prev_position.lerp(self.position, t),
            rotation: self.prev_rotation + (self.rotation - self.prev_rotation) * t,
            scale: self.prev_scale.lerp(self.scale, t),
        }
    }

    /// Rotate a local-space vector into world space.
    #[inline]
    pub fn to_world(&self, local: Vec2) -> Vec2 {
        Vec2::from_angle(self.rotation).rotate(local)
    }
}
