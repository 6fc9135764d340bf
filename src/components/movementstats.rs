//! Stat-driven movement limits and tuning.
//!
//! Optional per-entity overrides of the movement defaults in
//! [`SimConfig`](crate::resources::simconfig::SimConfig). When present, the
//! speed cap here is applied after the body's material cap.

/// Character-level movement stats.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MovementStats {
    /// Hard speed cap in world units per second.
    pub max_speed: Option<f32>,
    /// Cruise speed used by direction commands.
    pub cruise_speed: f32,
    /// Upward impulse applied by a jump command.
    pub jump_impulse: f32,
}

impl MovementStats {
    /// Stats with a speed cap and cruise speed.
    pub fn new(max_speed: Option<f32>, cruise_speed: f32, jump_impulse: f32) -> Self {
        Self {
            max_speed,
            cruise_speed,
            jump_impulse,
        }
    }
}
