//! Declarative movement goal of an entity.
//!
//! The command dispatcher writes an [`ExertionIntent`] plus PD gains into the
//! [`Exertion`] component; the exertion controller turns it into a desired
//! acceleration each tick and the movement committer handles the one-shot
//! parts (teleport, arrival snap).

use glam::Vec2;

/// What the entity is currently trying to do.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ExertionIntent {
    /// No goal: acceleration is zero and the entity coasts to rest.
    #[default]
    None,
    /// PD-seek toward a world point and stop on it.
    Seek {
        /// World-space target.
        target: Vec2,
    },
    /// Cruise along a direction at a desired speed.
    Direction {
        /// Direction of travel; normalized by the controller.
        direction: Vec2,
        /// Desired cruise speed in world units per second.
        speed: f32,
    },
    /// Jump straight to a world point on the next commit.
    Teleport {
        /// World-space target.
        target: Vec2,
    },
}

impl ExertionIntent {
    /// Whether any goal is active.
    #[inline]
    pub fn is_active(&self) -> bool {
        !matches!(self, ExertionIntent::None)
    }
}

/// Intent plus the tunables used to pursue it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Exertion {
    /// Current goal.
    pub intent: ExertionIntent,
    /// Proportional gain (position error for seek, velocity error for direction).
    pub gain: f32,
    /// Derivative gain applied against current velocity.
    pub damping: f32,
    /// Distance at which a seek counts as arrived.
    pub arrive_epsilon: f32,
    /// Magnitude cap of the authored acceleration.
    pub max_acceleration: f32,
    /// One-shot: zero velocity on the next controller pass.
    pub kill_velocity: bool,
}

impl Default for Exertion {
    fn default() -> Self {
        Self {
            intent: ExertionIntent::None,
            gain: 40.0,
            damping: 2.0 * 40.0f32.sqrt(),
            arrive_epsilon: 0.01,
            max_acceleration: f32::INFINITY,
            kill_velocity: false,
        }
    }
}

impl Exertion {
    /// Exertion with the given PD gains and no goal.
    pub fn with_gains(gain: f32, damping: f32) -> Self {
        Self {
            gain,
            damping,
            ..Self::default()
        }
    }

    /// Seek `target` with the current gains.
    pub fn seek(&mut self, target: Vec2) {
        self.intent = ExertionIntent::Seek { target };
    }

    /// Cruise along `direction` at `speed`.
    pub fn move_in(&mut self, direction: Vec2, speed: f32) {
        self.intent = ExertionIntent::Direction { direction, speed };
    }

    /// Teleport to `target` on the next commit.
    pub fn teleport(&mut self, target: Vec2) {
        self.intent = ExertionIntent::Teleport { target };
    }

    /// Drop the goal; optionally stop dead.
    pub fn stop(&mut self, kill_velocity: bool) {
        self.intent = ExertionIntent::None;
        self.kill_velocity |= kill_velocity;
    }
}
