//! Components attachable to entities.
//!
//! Every component type is registered below with a fixed numeric id. The
//! registration generates [`ComponentKind`], the [`AnyComponent`] sum type
//! and the typed [`Columns`] the store keeps one arena per kind in. Ids are
//! part of the public contract: append new kinds, never renumber.
//!
//! Submodules overview:
//! - [`exertion`] – declarative movement intent and PD gains
//! - [`forceterm`] – named, decaying force/acceleration contributors
//! - [`group`] – name tag for filtered queries
//! - [`inputcontrolled`] – binds an entity to a controller's commands
//! - [`movementstats`] – stat-driven speed cap, cruise speed and jump impulse
//! - [`movestate`] – velocity, acceleration and movement flags
//! - [`rigidbody`] – mass, drag, force terms and impulses
//! - [`sprite`] – renderable sprite description
//! - [`transform`] – current and previous pose for interpolation

pub mod exertion;
pub mod forceterm;
pub mod group;
pub mod inputcontrolled;
pub mod movementstats;
pub mod movestate;
pub mod rigidbody;
pub mod sprite;
pub mod transform;

pub use exertion::{Exertion, ExertionIntent};
pub use forceterm::{ForceDecay, ForceQuantity, ForceSpace, ForceTerm};
pub use group::Group;
pub use inputcontrolled::InputControlled;
pub use movementstats::MovementStats;
pub use movestate::MoveState;
pub use rigidbody::RigidBody;
pub use sprite::Sprite;
pub use transform::{Pose, Transform2D};

crate::store::define_components! {
    /// World pose with previous-tick snapshot.
    Transform2D = 0 => transforms,
    /// Mass, drag, force terms and impulses.
    RigidBody = 1 => bodies,
    /// Movement intent and PD gains.
    Exertion = 2 => exertions,
    /// Velocity and movement flags.
    MoveState = 3 => move_states,
    /// Stat-driven movement limits.
    MovementStats = 4 => stats,
    /// Controller possession.
    InputControlled = 5 => controlled,
    /// Renderable sprite.
    Sprite = 6 => sprites,
    /// Name tag.
    Group = 7 => groups,
}
