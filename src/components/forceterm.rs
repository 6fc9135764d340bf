//! Continuous, optionally decaying force contributors.
//!
//! A [`ForceTerm`] is owned by a [`RigidBody`](super::rigidbody::RigidBody)
//! and summed into the body's acceleration every tick by the physics
//! integrator. Terms are named so gameplay code can toggle or retune them
//! (gravity, wind, a thruster) without keeping handles around.
//!
//! # Decay
//!
//! | policy        | strength after advancing by `dt`              | expiry                          |
//! |---------------|-----------------------------------------------|---------------------------------|
//! | `Infinite`    | `1`                                           | only when a lifetime is set     |
//! | `Linear`      | `remaining / duration`                        | when `remaining <= 0`           |
//! | `Exponential` | previous strength × `0.5^(dt / half_life)`    | lifetime elapsed or below floor |

use glam::Vec2;
use log::warn;

/// Exponential terms weaker than this are dropped.
pub const MIN_EXPONENTIAL_SCALE: f32 = 1e-3;

/// What the term's vector means.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ForceQuantity {
    /// A force in newtons-like units; divided by mass.
    Force(Vec2),
    /// An acceleration applied regardless of mass.
    Acceleration(Vec2),
}

impl ForceQuantity {
    /// The raw vector.
    pub fn vector(self) -> Vec2 {
        match self {
            ForceQuantity::Force(v) | ForceQuantity::Acceleration(v) => v,
        }
    }
}

/// Coordinate space of the term's vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ForceSpace {
    /// Already in world space.
    #[default]
    World,
    /// Relative to the entity's rotation.
    Local,
}

/// How a term's strength evolves over time.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub enum ForceDecay {
    /// Constant strength.
    #[default]
    Infinite,
    /// Fades linearly to zero over `duration` seconds.
    Linear {
        /// Fade duration in seconds.
        duration: f32,
    },
    /// Halves every `half_life` seconds.
    Exponential {
        /// Half-life in seconds.
        half_life: f32,
    },
}

/// A named contributor to a body's acceleration.
#[derive(Clone, Debug, PartialEq)]
pub struct ForceTerm {
    /// Name used by the toggle/retune helpers on the body.
    pub name: String,
    /// Force or acceleration vector at full strength.
    pub quantity: ForceQuantity,
    /// World or entity-local.
    pub space: ForceSpace,
    /// Decay policy.
    pub decay: ForceDecay,
    /// Remaining lifetime in seconds; `None` means unbounded.
    pub remaining: Option<f32>,
    /// Current exponential strength multiplier.
    pub scale: f32,
    /// Disabled terms still age and expire but contribute nothing.
    pub enabled: bool,
}

impl ForceTerm {
    fn new(name: impl Into<String>, quantity: ForceQuantity) -> Self {
        Self {
            name: name.into(),
            quantity,
            space: ForceSpace::World,
            decay: ForceDecay::Infinite,
            remaining: None,
            scale: 1.0,
            enabled: true,
        }
    }

    /// A mass-scaled force term.
    pub fn force(name: impl Into<String>, value: Vec2) -> Self {
        Self::new(name, ForceQuantity::Force(value))
    }

    /// A mass-independent acceleration term.
    pub fn acceleration(name: impl Into<String>, value: Vec2) -> Self {
        Self::new(name, ForceQuantity::Acceleration(value))
    }

    /// Interpret the vector in entity-local space.
    pub fn local(mut self) -> Self {
        self.space = ForceSpace::Local;
        self
    }

    /// Fade linearly to zero over `duration` seconds, then expire.
    pub fn with_linear_decay(mut self, duration: f32) -> Self {
        self.decay = ForceDecay::Linear { duration };
        self.remaining = Some(duration);
        self
    }

    /// Halve every `half_life` seconds.
    pub fn with_exponential_decay(mut self, half_life: f32) -> Self {
        self.decay = ForceDecay::Exponential { half_life };
        self
    }

    /// Expire after `seconds` regardless of decay policy.
    pub fn with_lifetime(mut self, seconds: f32) -> Self {
        self.remaining = Some(seconds);
        self
    }

    /// Start disabled.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Age the term by `dt` and return its strength multiplier, or `None`
    /// once it has expired and should be pruned.
    ///
    /// Unusable parameters (non-positive duration or half-life) are logged and
    /// the term is treated as expired.
    pub fn advance(&mut self, dt: f32) -> Option<f32> {
        // a linear term assigned without a lifetime fades over its own duration
        if let ForceDecay::Linear { duration } = self.decay {
            if duration > 0.0 && self.remaining.is_none() {
                self.remaining = Some(duration);
            }
        }
        if let Some(remaining) = self.remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                return None;
            }
        }
        match self.decay {
            ForceDecay::Infinite => Some(1.0),
            ForceDecay::Linear { duration } => {
                if duration <= 0.0 {
                    warn!(
                        "force term '{}': linear duration {duration} is not positive; dropped",
                        self.name
                    );
                    return None;
                }
                let remaining = self.remaining.unwrap_or(duration);
                Some((remaining / duration).clamp(0.0, 1.0))
            }
            ForceDecay::Exponential { half_life } => {
                if half_life <= 0.0 {
                    warn!(
                        "force term '{}': half-life {half_life} is not positive; dropped",
                        self.name
                    );
                    return None;
                }
                self.scale *= 0.5f32.powf(dt / half_life);
                (self.scale >= MIN_EXPONENTIAL_SCALE).then_some(self.scale)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_infinite_term_never_expires() {
        let mut term = ForceTerm::acceleration("gravity", Vec2::new(0.0, -9.8));
        for _ in 0..1000 {
            assert_eq!(term.advance(0.1), Some(1.0));
        }
    }

    #[test]
    fn test_linear_decay_fades_then_expires() {
        let mut term = ForceTerm::force("kick", Vec2::X).with_linear_decay(1.0);
        assert!(approx_eq(term.advance(0.25).unwrap(), 0.75));
        assert!(approx_eq(term.advance(0.25).unwrap(), 0.5));
        assert!(approx_eq(term.advance(0.25).unwrap(), 0.25));
        assert_eq!(term.advance(0.25), None);
    }

    #[test]
    fn test_linear_decay_without_lifetime_still_fades() {
        let mut term = ForceTerm::force("kick", Vec2::X);
        term.decay = ForceDecay::Linear { duration: 1.0 };
        assert_eq!(term.remaining, None);
        assert!(approx_eq(term.advance(0.25).unwrap(), 0.75));
        assert!(approx_eq(term.remaining.unwrap(), 0.75));
        assert!(approx_eq(term.advance(0.5).unwrap(), 0.25));
        assert_eq!(term.advance(0.25), None);
    }

    #[test]
    fn test_exponential_decay_halves_per_half_life() {
        let mut term = ForceTerm::acceleration("wind", Vec2::X).with_exponential_decay(0.5);
        assert!(approx_eq(term.advance(0.5).unwrap(), 0.5));
        assert!(approx_eq(term.advance(0.5).unwrap(), 0.25));
    }

    #[test]
    fn test_exponential_decay_drops_below_floor() {
        let mut term = ForceTerm::acceleration("puff", Vec2::X).with_exponential_decay(0.1);
        let mut steps = 0;
        while term.advance(0.1).is_some() {
            steps += 1;
            assert!(steps < 100);
        }
        assert_eq!(steps, 9);
    }

    #[test]
    fn test_lifetime_expires_infinite_term() {
        let mut term = ForceTerm::acceleration("burst", Vec2::Y).with_lifetime(0.25);
        assert_eq!(term.advance(0.125), Some(1.0));
        assert_eq!(term.advance(0.125), None);
    }

    #[test]
    fn test_invalid_parameters_expire_immediately() {
        let mut linear = ForceTerm::force("bad", Vec2::X);
        linear.decay = ForceDecay::Linear { duration: 0.0 };
        assert_eq!(linear.advance(0.1), None);

        let mut exp = ForceTerm::force("bad", Vec2::X).with_exponential_decay(-1.0);
        assert_eq!(exp.advance(0.1), None);
    }
}
