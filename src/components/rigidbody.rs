//! Physical body with mass, drag and a list of named force terms.
//!
//! The [`RigidBody`] component stores the material parameters the physics
//! integrator needs plus the continuous [`ForceTerm`]s and one-shot impulses
//! acting on the entity. Velocity itself lives in
//! [`MoveState`](super::movestate::MoveState) so that bodies and purely
//! kinematic movers share one movement pipeline.
//!
//! A body with `mass <= 0.0` is kinematic: its terms still age and its
//! impulses are still drained, but it never moves. The `frozen` flag goes
//! further and makes the integrator skip the body entirely, which is useful
//! when an entity's position is driven externally.

use glam::Vec2;
use smallvec::SmallVec;

use super::forceterm::{ForceQuantity, ForceTerm};

/// Mass, drag and accumulated forces of an entity.
///
/// # Fields
/// - `mass` - `<= 0.0` marks the body kinematic
/// - `linear_drag` - contributes `-velocity * linear_drag / mass`
/// - `damping` - exponential damping rate: `velocity *= exp(-damping * dt)`
/// - `air_drag` / `ground_friction` - extra velocity-proportional
///   deceleration while airborne / grounded
/// - `max_speed` - material speed cap applied before any stat cap
/// - `frozen` - when true, the integrator skips this body
///
/// # Example
/// ```
/// use drift2d::components::rigidbody::RigidBody;
/// use drift2d::components::forceterm::ForceTerm;
/// use glam::Vec2;
///
/// let mut rb = RigidBody::with_physics(2.0, 0.5, Some(300.0));
/// rb.add_force(ForceTerm::acceleration("gravity", Vec2::new(0.0, -980.0)));
/// rb.add_force(ForceTerm::force("wind", Vec2::new(50.0, 0.0)).with_linear_decay(2.0));
///
/// // Disable gravity while on a ladder
/// rb.set_force_enabled("gravity", false);
/// rb.apply_impulse(Vec2::new(0.0, 400.0));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct RigidBody {
    /// Mass; `<= 0.0` means kinematic.
    pub mass: f32,
    /// Linear drag coefficient (mass-scaled).
    pub linear_drag: f32,
    /// Exponential damping rate per second.
    pub damping: f32,
    /// Deceleration rate applied while airborne.
    pub air_drag: f32,
    /// Deceleration rate applied while grounded.
    pub ground_friction: f32,
    /// Optional material speed cap.
    pub max_speed: Option<f32>,
    /// Skip the integrator entirely.
    pub frozen: bool,
    /// Continuous force terms, in insertion order.
    pub forces: Vec<ForceTerm>,
    /// Impulses queued for the next tick.
    pub impulses: SmallVec<[Vec2; 4]>,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RigidBody {
    /// Unit mass, no drag, no forces.
    pub fn new() -> Self {
        Self {
            mass: 1.0,
            linear_drag: 0.0,
            damping: 0.0,
            air_drag: 0.0,
            ground_friction: 0.0,
            max_speed: None,
            frozen: false,
            forces: Vec::new(),
            impulses: SmallVec::new(),
        }
    }

    /// Body with mass, exponential damping and an optional speed cap.
    pub fn with_physics(mass: f32, damping: f32, max_speed: Option<f32>) -> Self {
        Self {
            mass,
            damping,
            max_speed,
            ..Self::new()
        }
    }

    /// An immovable body.
    pub fn kinematic() -> Self {
        Self {
            mass: 0.0,
            ..Self::new()
        }
    }

    /// Builder-style linear drag setter.
    pub fn with_linear_drag(mut self, coefficient: f32) -> Self {
        self.linear_drag = coefficient;
        self
    }

    /// Builder-style air drag / ground friction setter.
    pub fn with_surface_drag(mut self, air_drag: f32, ground_friction: f32) -> Self {
        self.air_drag = air_drag;
        self.ground_friction = ground_friction;
        self
    }

    /// Whether the body is immovable.
    #[inline]
    pub fn is_kinematic(&self) -> bool {
        self.mass <= 0.0
    }

    /// Add a term, replacing any existing term with the same name.
    pub fn add_force(&mut self, term: ForceTerm) {
        match self.forces.iter_mut().find(|t| t.name == term.name) {
            Some(existing) => *existing = term,
            None => self.forces.push(term),
        }
    }

    /// Remove a named term, returning it if it existed.
    pub fn remove_force(&mut self, name: &str) -> Option<ForceTerm> {
        let position = self.forces.iter().position(|t| t.name == name)?;
        Some(self.forces.remove(position))
    }

    /// Enable or disable a named term.
    /// Returns false if the term doesn't exist.
    pub fn set_force_enabled(&mut self, name: &str, enabled: bool) -> bool {
        if let Some(term) = self.forces.iter_mut().find(|t| t.name == name) {
            term.enabled = enabled;
            true
        } else {
            false
        }
    }

    /// Whether a named term exists and is enabled.
    pub fn is_force_enabled(&self, name: &str) -> bool {
        self.get_force(name).is_some_and(|t| t.enabled)
    }

    /// Replace the vector of a named term, keeping its quantity type.
    /// Returns false if the term doesn't exist.
    pub fn set_force_value(&mut self, name: &str, value: Vec2) -> bool {
        if let Some(term) = self.forces.iter_mut().find(|t| t.name == name) {
            term.quantity = match term.quantity {
                ForceQuantity::Force(_) => ForceQuantity::Force(value),
                ForceQuantity::Acceleration(_) => ForceQuantity::Acceleration(value),
            };
            true
        } else {
            false
        }
    }

    /// Borrow a named term.
    pub fn get_force(&self, name: &str) -> Option<&ForceTerm> {
        self.forces.iter().find(|t| t.name == name)
    }

    /// Queue an instantaneous momentum change for the next tick.
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.impulses.push(impulse);
    }

    /// Freeze the body, preventing the integrator from touching it.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Unfreeze the body.
    pub fn unfreeze(&mut self) {
        self.frozen = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_dynamic_unit_mass() {
        let rb = RigidBody::new();
        assert_eq!(rb.mass, 1.0);
        assert!(!rb.is_kinematic());
        assert!(rb.forces.is_empty());
        assert!(rb.impulses.is_empty());
        assert!(!rb.frozen);
    }

    #[test]
    fn test_kinematic_has_no_mass() {
        assert!(RigidBody::kinematic().is_kinematic());
        assert!(RigidBody::with_physics(-1.0, 0.0, None).is_kinematic());
    }

    #[test]
    fn test_add_force_replaces_same_name() {
        let mut rb = RigidBody::new();
        rb.add_force(ForceTerm::acceleration("gravity", Vec2::new(0.0, -1.0)));
        rb.add_force(ForceTerm::acceleration("gravity", Vec2::new(0.0, -2.0)));
        assert_eq!(rb.forces.len(), 1);
        assert_eq!(
            rb.get_force("gravity").unwrap().quantity.vector(),
            Vec2::new(0.0, -2.0)
        );
    }

    #[test]
    fn test_toggle_and_retune_forces() {
        let mut rb = RigidBody::new();
        rb.add_force(ForceTerm::force("motor", Vec2::X));
        assert!(rb.is_force_enabled("motor"));

        assert!(rb.set_force_enabled("motor", false));
        assert!(!rb.is_force_enabled("motor"));
        assert!(!rb.set_force_enabled("missing", true));

        assert!(rb.set_force_value("motor", Vec2::Y));
        assert_eq!(
            rb.get_force("motor").unwrap().quantity,
            ForceQuantity::Force(Vec2::Y)
        );
        assert!(!rb.set_force_value("missing", Vec2::Y));
    }

    #[test]
    fn test_remove_force() {
        let mut rb = RigidBody::new();
        rb.add_force(ForceTerm::force("a", Vec2::X));
        rb.add_force(ForceTerm::force("b", Vec2::Y));
        assert_eq!(rb.remove_force("a").unwrap().name, "a");
        assert!(rb.remove_force("a").is_none());
        assert_eq!(rb.forces.len(), 1);
    }

    #[test]
    fn test_freeze_unfreeze() {
        let mut rb = RigidBody::new();
        rb.freeze();
        assert!(rb.frozen);
        rb.unfreeze();
        assert!(!rb.frozen);
    }

    #[test]
    fn test_apply_impulse_queues() {
        let mut rb = RigidBody::new();
        rb.apply_impulse(Vec2::X);
        rb.apply_impulse(Vec2::Y);
        assert_eq!(rb.impulses.len(), 2);
    }
}
