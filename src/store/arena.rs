//! Per-kind component arenas with generational handles.
//!
//! Every component kind lives in its own [`Arena`]. Slots are reused through
//! a free list, and each slot carries a generation counter that is bumped on
//! removal so that a stale [`Handle`] never resolves to a newer occupant.
//! Each occupied slot also records its owning [`Entity`], which gives O(1)
//! owner lookup without consulting the entity index.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use super::entity::Entity;

/// Untyped slot address: index plus generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RawHandle {
    /// Slot index inside the arena.
    pub index: u32,
    /// Generation of the slot at insertion time.
    pub generation: u32,
}

/// Typed handle to a component of kind `T`.
pub struct Handle<T> {
    raw: RawHandle,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    /// Reinterpret a raw handle as a typed one.
    #[inline]
    pub const fn from_raw(raw: RawHandle) -> Self {
        Self {
            raw,
            _marker: PhantomData,
        }
    }

    /// The untyped slot address.
    #[inline]
    pub const fn raw(self) -> RawHandle {
        self.raw
    }
}

// Manual impls: derives would require `T: Clone` etc.
impl<T> Clone for Handle<T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for Handle<T> {}
impl<T> PartialEq for Handle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}
impl<T> Eq for Handle<T> {}
impl<T> Hash for Handle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}
impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({}v{})", self.raw.index, self.raw.generation)
    }
}

struct Occupant<T> {
    owner: Entity,
    value: T,
}

struct Slot<T> {
    generation: u32,
    occupant: Option<Occupant<T>>,
}

/// Dense-ish storage for one component kind.
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Create an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live components.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the arena holds no live components.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Store `value` owned by `owner`, reusing a free slot when possible.
    pub fn insert(&mut self, owner: Entity, value: T) -> Handle<T> {
        self.len += 1;
        let occupant = Some(Occupant { owner, value });
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.occupant = occupant;
            return Handle::from_raw(RawHandle {
                index,
                generation: slot.generation,
            });
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            occupant,
        });
        Handle::from_raw(RawHandle {
            index,
            generation: 0,
        })
    }

    /// Remove the component behind `handle`, returning its owner and value.
    pub fn remove(&mut self, handle: Handle<T>) -> Option<(Entity, T)> {
        let raw = handle.raw();
        let slot = self.slots.get_mut(raw.index as usize)?;
        if slot.generation != raw.generation {
            return None;
        }
        let occupant = slot.occupant.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(raw.index);
        self.len -= 1;
        Some((occupant.owner, occupant.value))
    }

    fn occupant(&self, raw: RawHandle) -> Option<&Occupant<T>> {
        let slot = self.slots.get(raw.index as usize)?;
        if slot.generation != raw.generation {
            return None;
        }
        slot.occupant.as_ref()
    }

    /// Whether `handle` still points at a live component.
    #[inline]
    pub fn contains(&self, handle: Handle<T>) -> bool {
        self.occupant(handle.raw()).is_some()
    }

    /// Borrow the component behind `handle`.
    #[inline]
    pub fn get(&self, handle: Handle<T>) -> Option<&T> {
        self.occupant(handle.raw()).map(|o| &o.value)
    }

    /// Mutably borrow the component behind `handle`.
    pub fn get_mut(&mut self, handle: Handle<T>) -> Option<&mut T> {
        let raw = handle.raw();
        let slot = self.slots.get_mut(raw.index as usize)?;
        if slot.generation != raw.generation {
            return None;
        }
        slot.occupant.as_mut().map(|o| &mut o.value)
    }

    /// Owning entity of the component behind `handle`.
    #[inline]
    pub fn owner(&self, handle: Handle<T>) -> Option<Entity> {
        self.occupant(handle.raw()).map(|o| o.owner)
    }

    /// Iterate live components in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Handle<T>, Entity, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.occupant.as_ref().map(|o| {
                (
                    Handle::from_raw(RawHandle {
                        index: index as u32,
                        generation: slot.generation,
                    }),
                    o.owner,
                    &o.value,
                )
            })
        })
    }

    /// Iterate live components mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Handle<T>, Entity, &mut T)> {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.occupant.as_mut().map(|o| {
                (
                    Handle::from_raw(RawHandle {
                        index: index as u32,
                        generation,
                    }),
                    o.owner,
                    &mut o.value,
                )
            })
        })
    }
}
