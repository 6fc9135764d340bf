//! Entity identifiers.
//!
//! An [`Entity`] carries no data of its own. It only exists as a key into the
//! [`ComponentStore`](super::ComponentStore) and is alive exactly while at
//! least one component is attached to it.

use std::fmt;

/// Opaque, globally unique entity identifier.
///
/// Identifiers are handed out by the store in increasing order and are never
/// reused by `spawn`. Ordering follows allocation order, which systems use to
/// iterate entities deterministically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u64);

impl Entity {
    /// Build an entity id from its raw value.
    #[inline]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value of the id.
    #[inline]
    pub const fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}
