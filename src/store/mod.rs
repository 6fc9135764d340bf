//! Entity/component storage.
//!
//! The [`ComponentStore`] keeps one generational [`Arena`] per component kind
//! and an entity index mapping every live [`Entity`] to its [`SiblingSet`].
//!
//! Lifetime rules:
//! - an entity comes into existence when its first component is attached
//! - the first attached component is the entity's anchor; removing it promotes
//!   the next sibling in attach order
//! - removing the last component destroys the entity, which removal calls
//!   report through [`Detached::entity_destroyed`]
//!
//! Missing entities or components are reported as [`StoreError`] values and
//! logged at `warn`. A sibling entry that does not resolve to a live slot
//! owned by its entity means the store itself is corrupted: development
//! builds panic, release builds log an error and return
//! [`StoreError::Corrupted`].
//!
//! The store has no internal locking and expects a single writer per tick.

pub mod arena;
pub mod entity;
mod registry;
pub mod siblings;

use log::{debug, error, warn};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use thiserror::Error;

pub use arena::{Arena, Handle, RawHandle};
pub use entity::Entity;
pub(crate) use registry::define_components;
pub use siblings::{ComponentRef, SiblingSet};

use crate::components::{AnyComponent, Columns, ComponentKind};

/// A type registered in the component table.
///
/// Implementations are generated by the registration macro; do not implement
/// this by hand.
pub trait Component: Sized + 'static {
    /// Stable kind id of this type.
    const KIND: ComponentKind;

    /// The arena holding every component of this type.
    fn column(columns: &Columns) -> &Arena<Self>;

    /// Mutable access to the arena holding every component of this type.
    fn column_mut(columns: &mut Columns) -> &mut Arena<Self>;

    /// Unwrap from the heterogeneous form, if the kind matches.
    fn from_any(component: AnyComponent) -> Option<Self>;
}

/// Errors reported by [`ComponentStore`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No live entity with this id.
    #[error("entity {0} not found")]
    EntityNotFound(Entity),

    /// The entity exists but has no component of the requested kind.
    #[error("entity {entity} has no {} component", .kind.name())]
    ComponentNotFound {
        /// Entity that was searched.
        entity: Entity,
        /// Kind that was missing.
        kind: ComponentKind,
    },

    /// A component reference no longer points at a live component.
    #[error("stale {} component reference", .kind.name())]
    StaleReference {
        /// Kind of the stale reference.
        kind: ComponentKind,
    },

    /// Attach was called without any component.
    #[error("refusing to attach an empty component set")]
    EmptyComponentSet,

    /// Sibling bookkeeping and arenas disagree.
    #[error("component store corrupted: {0}")]
    Corrupted(String),
}

/// A component removed from the store.
#[derive(Debug, Clone)]
pub struct Detached<T> {
    /// The removed component value.
    pub component: T,
    /// Entity it was attached to.
    pub entity: Entity,
    /// Whether this removal destroyed the entity.
    pub entity_destroyed: bool,
}

fn corruption(detail: String) -> StoreError {
    error!("component store corrupted: {detail}");
    if cfg!(debug_assertions) {
        panic!("component store corrupted: {detail}");
    }
    StoreError::Corrupted(detail)
}

/// Owner of every entity and component in one simulation.
#[derive(Default)]
pub struct ComponentStore {
    columns: Columns,
    index: FxHashMap<Entity, SiblingSet>,
    next_entity: u64,
}

impl ComponentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.index.len()
    }

    /// Number of live components of every kind.
    pub fn component_count(&self) -> usize {
        self.columns.len()
    }

    /// Whether `entity` is alive.
    pub fn contains(&self, entity: Entity) -> bool {
        self.index.contains_key(&entity)
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self.index.keys().copied().collect();
        entities.sort_unstable();
        entities
    }

    /// Attach `components` to a brand new entity.
    pub fn spawn<I>(&mut self, components: I) -> Result<Entity, StoreError>
    where
        I: IntoIterator<Item = AnyComponent>,
    {
        let components: Vec<AnyComponent> = components.into_iter().collect();
        if components.is_empty() {
            warn!("spawn called with no components; no entity created");
            return Err(StoreError::EmptyComponentSet);
        }
        let entity = Entity::from_raw(self.next_entity);
        self.next_entity += 1;
        self.link_all(entity, components);
        Ok(entity)
    }

    /// Attach `components` to `entity`, creating the entity if it is not alive.
    ///
    /// A component whose kind is already present replaces the old one.
    pub fn attach<I>(
        &mut self,
        entity: Entity,
        components: I,
    ) -> Result<SmallVec<[ComponentRef; 4]>, StoreError>
    where
        I: IntoIterator<Item = AnyComponent>,
    {
        let components: Vec<AnyComponent> = components.into_iter().collect();
        if components.is_empty() {
            warn!("attach to {entity} called with no components; ignored");
            return Err(StoreError::EmptyComponentSet);
        }
        self.reserve_id(entity);
        Ok(self.link_all(entity, components))
    }

    /// Attach one typed component to `entity`, creating the entity if needed.
    pub fn insert<T: Component>(&mut self, entity: Entity, component: T) -> Handle<T> {
        self.reserve_id(entity);
        let handle = T::column_mut(&mut self.columns).insert(entity, component);
        self.link(
            entity,
            ComponentRef {
                kind: T::KIND,
                handle: handle.raw(),
            },
        );
        handle
    }

    /// Attach `component` to whichever entity owns `of`.
    pub fn attach_sibling(
        &mut self,
        of: ComponentRef,
        component: impl Into<AnyComponent>,
    ) -> Result<ComponentRef, StoreError> {
        let Some(owner) = self.columns.owner_raw(of) else {
            warn!("attach_sibling: {} reference is stale", of.kind.name());
            return Err(StoreError::StaleReference { kind: of.kind });
        };
        let refs = self.link_all(owner, vec![component.into()]);
        refs.first().copied().ok_or(StoreError::EmptyComponentSet)
    }

    /// Detach the `T` component of `entity`.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Result<Detached<T>, StoreError> {
        let detached = self.detach_kind(entity, T::KIND)?;
        let Detached {
            component,
            entity,
            entity_destroyed,
        } = detached;
        match T::from_any(component) {
            Some(component) => Ok(Detached {
                component,
                entity,
                entity_destroyed,
            }),
            None => Err(corruption(format!(
                "{} arena returned a component of another kind",
                T::KIND.name()
            ))),
        }
    }

    /// Detach the component of `kind` from `entity`.
    pub fn detach_kind(
        &mut self,
        entity: Entity,
        kind: ComponentKind,
    ) -> Result<Detached<AnyComponent>, StoreError> {
        let (raw, entity_destroyed) = {
            let Some(set) = self.index.get_mut(&entity) else {
                warn!("detach {}: entity {entity} not found", kind.name());
                return Err(StoreError::EntityNotFound(entity));
            };
            let Some(raw) = set.unlink(kind) else {
                warn!("detach: entity {entity} has no {} component", kind.name());
                return Err(StoreError::ComponentNotFound { entity, kind });
            };
            (raw, set.is_empty())
        };
        if entity_destroyed {
            self.index.remove(&entity);
            debug!("entity {entity} destroyed by removal of its last component");
        }
        let reference = ComponentRef { kind, handle: raw };
        match self.columns.remove_raw(reference) {
            Some((owner, component)) if owner == entity => Ok(Detached {
                component,
                entity,
                entity_destroyed,
            }),
            Some((owner, _)) => Err(corruption(format!(
                "{} sibling of {entity} was owned by {owner}",
                kind.name()
            ))),
            None => Err(corruption(format!(
                "{} sibling of {entity} has no live slot",
                kind.name()
            ))),
        }
    }

    /// Detach the component behind `reference`, resolving its owner.
    pub fn detach_ref(
        &mut self,
        reference: ComponentRef,
    ) -> Result<Detached<AnyComponent>, StoreError> {
        let Some(owner) = self.columns.owner_raw(reference) else {
            warn!("detach_ref: {} reference is stale", reference.kind.name());
            return Err(StoreError::StaleReference {
                kind: reference.kind,
            });
        };
        let linked = self
            .index
            .get(&owner)
            .and_then(|set| set.get(reference.kind));
        if linked != Some(reference.handle) {
            return Err(corruption(format!(
                "live {} slot of {owner} is missing from its sibling set",
                reference.kind.name()
            )));
        }
        self.detach_kind(owner, reference.kind)
    }

    /// Detach every component of `entity`, destroying it.
    ///
    /// Components are returned in attach order, anchor first.
    pub fn detach_entity(&mut self, entity: Entity) -> Result<Vec<AnyComponent>, StoreError> {
        let Some(set) = self.index.remove(&entity) else {
            warn!("detach_entity: entity {entity} not found");
            return Err(StoreError::EntityNotFound(entity));
        };
        let mut removed = Vec::with_capacity(set.len());
        let mut broken = None;
        for reference in set.iter() {
            match self.columns.remove_raw(reference) {
                Some((_, component)) => removed.push(component),
                None => broken = Some(reference.kind),
            }
        }
        if let Some(kind) = broken {
            return Err(corruption(format!(
                "{} sibling of {entity} has no live slot",
                kind.name()
            )));
        }
        debug!("entity {entity} detached with {} components", removed.len());
        Ok(removed)
    }

    /// Borrow the `T` component of `entity`.
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let handle = self.handle::<T>(entity)?;
        T::column(&self.columns).get(handle)
    }

    /// Mutably borrow the `T` component of `entity`.
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let handle = self.handle::<T>(entity)?;
        T::column_mut(&mut self.columns).get_mut(handle)
    }

    /// Handle of the `T` component of `entity`.
    pub fn handle<T: Component>(&self, entity: Entity) -> Option<Handle<T>> {
        self.index.get(&entity)?.handle::<T>()
    }

    /// Borrow the component behind a typed handle.
    pub fn resolve<T: Component>(&self, handle: Handle<T>) -> Option<&T> {
        T::column(&self.columns).get(handle)
    }

    /// Mutably borrow the component behind a typed handle.
    pub fn resolve_mut<T: Component>(&mut self, handle: Handle<T>) -> Option<&mut T> {
        T::column_mut(&mut self.columns).get_mut(handle)
    }

    /// Entity owning the component behind `handle`.
    pub fn owner<T: Component>(&self, handle: Handle<T>) -> Option<Entity> {
        T::column(&self.columns).owner(handle)
    }

    /// Entity owning the component behind an untyped reference.
    pub fn owner_of(&self, reference: ComponentRef) -> Option<Entity> {
        self.columns.owner_raw(reference)
    }

    /// The `T` sibling of the component behind `of`.
    pub fn sibling<T: Component>(&self, of: ComponentRef) -> Option<Handle<T>> {
        let owner = self.columns.owner_raw(of)?;
        self.handle::<T>(owner)
    }

    /// Sibling set of `entity`.
    pub fn siblings(&self, entity: Entity) -> Option<&SiblingSet> {
        self.index.get(&entity)
    }

    /// Anchor component of `entity`.
    pub fn anchor(&self, entity: Entity) -> Option<ComponentRef> {
        self.index.get(&entity)?.anchor()
    }

    /// All `T` components with their owners, in slot order.
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> {
        T::column(&self.columns)
            .iter()
            .map(|(_, owner, component)| (owner, component))
    }

    /// All `T` components matching `predicate`, in slot order.
    pub fn query_filtered<T, F>(&self, predicate: F) -> impl Iterator<Item = (Entity, &T)>
    where
        T: Component,
        F: Fn(&T) -> bool,
    {
        self.query::<T>().filter(move |entry| predicate(entry.1))
    }

    /// Owners of every `T` component, in ascending entity order.
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self.query::<T>().map(|(owner, _)| owner).collect();
        entities.sort_unstable();
        entities
    }

    /// Read-only view of the typed columns.
    pub fn columns(&self) -> &Columns {
        &self.columns
    }

    /// Split into the entity index and the mutable columns so systems can
    /// borrow several component kinds of one entity at once.
    pub(crate) fn split_mut(&mut self) -> (&FxHashMap<Entity, SiblingSet>, &mut Columns) {
        (&self.index, &mut self.columns)
    }

    /// Verify the storage invariants, reporting the first violation.
    ///
    /// Every sibling entry must resolve to a live slot owned by its entity,
    /// no set may be empty, and every live slot must be reachable from a set.
    pub fn check_integrity(&self) -> Result<(), StoreError> {
        let mut linked = 0usize;
        for (entity, set) in &self.index {
            if set.is_empty() {
                return Err(StoreError::Corrupted(format!(
                    "entity {entity} is indexed with an empty sibling set"
                )));
            }
            for reference in set.iter() {
                match self.columns.owner_raw(reference) {
                    Some(owner) if owner == *entity => linked += 1,
                    Some(owner) => {
                        return Err(StoreError::Corrupted(format!(
                            "{} sibling of {entity} is owned by {owner}",
                            reference.kind.name()
                        )));
                    }
                    None => {
                        return Err(StoreError::Corrupted(format!(
                            "{} sibling of {entity} is dangling",
                            reference.kind.name()
                        )));
                    }
                }
            }
        }
        let live = self.columns.len();
        if linked != live {
            return Err(StoreError::Corrupted(format!(
                "{live} live components but {linked} sibling entries"
            )));
        }
        Ok(())
    }

    fn reserve_id(&mut self, entity: Entity) {
        if entity.to_raw() >= self.next_entity {
            self.next_entity = entity.to_raw() + 1;
        }
    }

    fn link_all(
        &mut self,
        entity: Entity,
        components: Vec<AnyComponent>,
    ) -> SmallVec<[ComponentRef; 4]> {
        let mut refs = SmallVec::new();
        for component in components {
            let reference = self.columns.insert_any(entity, component);
            self.link(entity, reference);
            refs.push(reference);
        }
        refs
    }

    fn link(&mut self, entity: Entity, reference: ComponentRef) {
        let set = self.index.entry(entity).or_default();
        if let Some(displaced) = set.link(reference) {
            debug!(
                "entity {entity}: {} component replaced",
                reference.kind.name()
            );
            self.columns.remove_raw(ComponentRef {
                kind: reference.kind,
                handle: displaced,
            });
        }
    }
}
