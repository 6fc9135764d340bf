//! Tick-stamped commands emitted by the input mapper.
//!
//! A [`Command`] abstracts physical input into a gameplay intent for one
//! controller. Commands are stamped with the simulation [`Tick`] current when
//! they were mapped and only become eligible once the clock has moved
//! strictly past that tick. The dispatcher consumes each command once.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Identifier of an input source (a local player, an AI, a replay stream).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ControllerId(pub u32);

impl fmt::Display for ControllerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "controller#{}", self.0)
    }
}

/// Simulation tick index.
///
/// The counter wraps; ordering is only meaningful between ticks less than
/// half the counter range apart, which [`Tick::is_later_than`] relies on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tick(pub u32);

impl Tick {
    /// The following tick, wrapping at `u32::MAX`.
    #[inline]
    pub const fn next(self) -> Self {
        Tick(self.0.wrapping_add(1))
    }

    /// Wraparound-safe "strictly later than".
    #[inline]
    pub const fn is_later_than(self, other: Tick) -> bool {
        (self.0.wrapping_sub(other.0) as i32) > 0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tick {}", self.0)
    }
}

/// Gameplay meaning of a command.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Seek to a point (screen position).
    MoveTo,
    /// Cruise along a direction (1D or 2D axis).
    Move,
    /// Instantaneous upward impulse (digital).
    Jump,
    /// Jump straight to a point (screen position).
    TeleportTo,
    /// Drop the current goal and stop dead (digital).
    Stop,
    /// Game-specific intent the core does not interpret.
    Custom(String),
}

/// Typed payload of a command.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandValue {
    /// Digital press (`true`) or release (`false`).
    Bool(bool),
    /// One analog axis, post dead zone and curve.
    Axis1D(f32),
    /// Two analog axes, inside the unit circle.
    Axis2D(Vec2),
    /// Pointer location in screen pixels.
    ScreenPoint(Vec2),
}

/// One mapped input, addressed to a controller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// Controller that issued the command.
    pub controller: ControllerId,
    /// What the command asks for.
    pub intent: Intent,
    /// Payload.
    pub value: CommandValue,
    /// Tick current when the command was mapped.
    pub tick: Tick,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tick_is_later_than() {
        assert!(Tick(6).is_later_than(Tick(5)));
        assert!(!Tick(5).is_later_than(Tick(5)));
        assert!(!Tick(4).is_later_than(Tick(5)));
    }

    #[test]
    fn test_tick_ordering_survives_wraparound() {
        let before_wrap = Tick(u32::MAX - 1);
        let after_wrap = before_wrap.next().next().next();
        assert_eq!(after_wrap, Tick(1));
        assert!(after_wrap.is_later_than(before_wrap));
        assert!(!before_wrap.is_later_than(after_wrap));
    }

    #[test]
    fn test_intent_serde_names() {
        let json = serde_json::to_string(&Intent::TeleportTo).unwrap();
        assert_eq!(json, "\"teleport_to\"");
        let custom: Intent = serde_json::from_str("{\"custom\":\"dash\"}").unwrap();
        assert_eq!(custom, Intent::Custom("dash".into()));
    }
}
