//! Controller possession.
//!
//! An entity with [`InputControlled`] is the thrall of a controller: the
//! command dispatcher applies every command that controller emits to it.
//! Several entities may share one controller.

use crate::events::command::ControllerId;

/// Binds an entity to the commands of one controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InputControlled {
    /// Controller whose commands drive this entity.
    pub controller: ControllerId,
}

impl InputControlled {
    /// Possess the entity with `controller`.
    pub fn new(controller: ControllerId) -> Self {
        Self { controller }
    }
}
