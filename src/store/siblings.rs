//! Per-entity sibling sets.
//!
//! A [`SiblingSet`] maps component kind to the handle of the entity's live
//! component of that kind. Components never point at each other directly;
//! a sibling is found by resolving `(entity, kind)` through this set.

use smallvec::SmallVec;

use super::Component;
use super::arena::{Handle, RawHandle};
use crate::components::ComponentKind;

/// Kind-tagged reference to a stored component.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ComponentRef {
    /// Kind of the referenced component.
    pub kind: ComponentKind,
    /// Slot of the component inside its kind's arena.
    pub handle: RawHandle,
}

/// The live components of one entity, in attach order.
///
/// The first entry is the entity's anchor. Removing the anchor promotes the
/// next entry in attach order.
#[derive(Clone, Debug, Default)]
pub struct SiblingSet {
    entries: SmallVec<[ComponentRef; 8]>,
}

impl SiblingSet {
    /// Number of live components on the entity.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no components remain.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The anchor (first attached live component).
    #[inline]
    pub fn anchor(&self) -> Option<ComponentRef> {
        self.entries.first().copied()
    }

    /// Handle of the component of `kind`, if attached.
    pub fn get(&self, kind: ComponentKind) -> Option<RawHandle> {
        self.entries
            .iter()
            .find(|r| r.kind == kind)
            .map(|r| r.handle)
    }

    /// Typed handle of the `T` component, if attached.
    #[inline]
    pub fn handle<T: Component>(&self) -> Option<Handle<T>> {
        self.get(T::KIND).map(Handle::from_raw)
    }

    /// Whether a component of `kind` is attached.
    #[inline]
    pub fn contains(&self, kind: ComponentKind) -> bool {
        self.get(kind).is_some()
    }

    /// Link `component`, returning the handle it displaced for the same kind.
    ///
    /// A replaced entry keeps its position so the anchor does not move.
    pub fn link(&mut self, component: ComponentRef) -> Option<RawHandle> {
        if let Some(existing) = self.entries.iter_mut().find(|r| r.kind == component.kind) {
            let previous = existing.handle;
            existing.handle = component.handle;
            return Some(previous);
        }
        self.entries.push(component);
        None
    }

    /// Unlink the entry of `kind`, returning its handle.
    pub fn unlink(&mut self, kind: ComponentKind) -> Option<RawHandle> {
        let position = self.entries.iter().position(|r| r.kind == kind)?;
        Some(self.entries.remove(position).handle)
    }

    /// Iterate entries in attach order (anchor first).
    pub fn iter(&self) -> impl Iterator<Item = ComponentRef> + '_ {
        self.entries.iter().copied()
    }
}
