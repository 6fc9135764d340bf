//! Component store integration tests.
//!
//! # Test Categories
//!
//! 1. **Lifetime** - implicit entity creation and destruction
//! 2. **Siblings & Anchors** - cross-component lookup and anchor promotion
//! 3. **Queries** - typed and filtered lookups
//! 4. **Failure reporting** - not-found and empty-set conditions
//! 5. **Properties** - integrity under random attach/detach sequences
//!
//! # Usage
//!
//! ```sh
//! cargo test --test store_integration
//! ```

use std::collections::{BTreeMap, BTreeSet};

use glam::Vec2;
use proptest::prelude::*;

use drift2d::components::{
    AnyComponent, ComponentKind, Exertion, Group, InputControlled, MoveState, MovementStats,
    RigidBody, Sprite, Transform2D,
};
use drift2d::events::command::ControllerId;
use drift2d::store::{Component, ComponentRef, ComponentStore, Entity, StoreError};

fn component_of(kind: ComponentKind) -> AnyComponent {
    match kind {
        ComponentKind::Transform2D => Transform2D::new(0.0, 0.0).into(),
        ComponentKind::RigidBody => RigidBody::new().into(),
        ComponentKind::Exertion => Exertion::default().into(),
        ComponentKind::MoveState => MoveState::default().into(),
        ComponentKind::MovementStats => MovementStats::new(None, 1.0, 1.0).into(),
        ComponentKind::InputControlled => InputControlled::new(ControllerId(0)).into(),
        ComponentKind::Sprite => Sprite::new("tile", 8.0, 8.0).into(),
        ComponentKind::Group => Group::new("walls").into(),
    }
}

fn reference<T: Component>(store: &ComponentStore, entity: Entity) -> ComponentRef {
    let handle = store.handle::<T>(entity).unwrap();
    ComponentRef {
        kind: T::KIND,
        handle: handle.raw(),
    }
}

// =============================================================================
// 1. Lifetime
// =============================================================================

#[test]
fn attach_creates_entity_and_last_detach_destroys_it() {
    let mut store = ComponentStore::new();
    let e = Entity::from_raw(7);
    assert!(!store.contains(e));

    store
        .attach(e, [Transform2D::new(1.0, 2.0).into(), Group::new("a").into()])
        .unwrap();
    assert!(store.contains(e));
    assert_eq!(store.entity_count(), 1);

    let first = store.detach::<Group>(e).unwrap();
    assert!(!first.entity_destroyed);
    assert_eq!(first.component, Group::new("a"));

    let last = store.detach::<Transform2D>(e).unwrap();
    assert!(last.entity_destroyed);
    assert!(!store.contains(e));
    assert_eq!(store.component_count(), 0);
}

#[test]
fn spawned_entities_never_collide_with_explicit_ids() {
    let mut store = ComponentStore::new();
    store.insert(Entity::from_raw(41), Group::new("explicit"));
    let spawned = store.spawn([Group::new("spawned").into()]).unwrap();
    assert!(spawned.to_raw() > 41);
}

#[test]
fn detach_entity_removes_everything_in_attach_order() {
    let mut store = ComponentStore::new();
    let e = store
        .spawn([
            Group::new("first").into(),
            Transform2D::new(0.0, 0.0).into(),
            MoveState::default().into(),
        ])
        .unwrap();
    let removed = store.detach_entity(e).unwrap();
    let kinds: Vec<ComponentKind> = removed.iter().map(AnyComponent::kind).collect();
    assert_eq!(
        kinds,
        vec![
            ComponentKind::Group,
            ComponentKind::Transform2D,
            ComponentKind::MoveState
        ]
    );
    assert!(!store.contains(e));
    assert!(store.check_integrity().is_ok());
}

// =============================================================================
// 2. Siblings & Anchors
// =============================================================================

#[test]
fn siblings_see_each_other_until_detached() {
    let mut store = ComponentStore::new();
    let e = store
        .spawn([Transform2D::new(0.0, 0.0).into(), MoveState::default().into()])
        .unwrap();
    let a = reference::<Transform2D>(&store, e);
    let b = reference::<MoveState>(&store, e);

    assert_eq!(
        store.sibling::<MoveState>(a).map(|h| h.raw()),
        Some(b.handle)
    );
    assert_eq!(
        store.sibling::<Transform2D>(b).map(|h| h.raw()),
        Some(a.handle)
    );

    store.detach::<MoveState>(e).unwrap();
    assert!(store.sibling::<MoveState>(a).is_none());
}

#[test]
fn removing_non_anchor_keeps_anchor_and_siblings() {
    let mut store = ComponentStore::new();
    let e = store
        .spawn([
            Transform2D::new(0.0, 0.0).into(),
            MoveState::default().into(),
            Group::new("g").into(),
        ])
        .unwrap();
    let anchor = store.anchor(e).unwrap();
    store.detach::<MoveState>(e).unwrap();

    assert_eq!(store.anchor(e), Some(anchor));
    assert!(store.get::<Group>(e).is_some());
    assert!(store.get::<Transform2D>(e).is_some());
}

#[test]
fn removing_anchor_promotes_next_sibling() {
    let mut store = ComponentStore::new();
    let e = store
        .spawn([Transform2D::new(0.0, 0.0).into(), Group::new("g").into()])
        .unwrap();
    assert_eq!(store.anchor(e).unwrap().kind, ComponentKind::Transform2D);
    store.detach::<Transform2D>(e).unwrap();
    assert_eq!(store.anchor(e).unwrap().kind, ComponentKind::Group);
}

#[test]
fn attach_sibling_resolves_owner() {
    let mut store = ComponentStore::new();
    let e = store.spawn([Transform2D::new(0.0, 0.0).into()]).unwrap();
    let of = reference::<Transform2D>(&store, e);

    let added = store.attach_sibling(of, MoveState::default()).unwrap();
    assert_eq!(store.owner_of(added), Some(e));
    assert!(store.get::<MoveState>(e).is_some());
}

#[test]
fn attaching_same_kind_replaces_and_invalidates_old_handle() {
    let mut store = ComponentStore::new();
    let e = Entity::from_raw(0);
    let old = store.insert(e, Group::new("old"));
    let new = store.insert(e, Group::new("new"));

    assert!(store.resolve(old).is_none());
    assert_eq!(store.resolve(new), Some(&Group::new("new")));
    assert_eq!(store.siblings(e).unwrap().len(), 1);
    assert!(store.check_integrity().is_ok());
}

#[test]
fn stale_handle_does_not_resolve_to_reused_slot() {
    let mut store = ComponentStore::new();
    let a = Entity::from_raw(0);
    let b = Entity::from_raw(1);
    let stale = store.insert(a, Group::new("a"));
    store.detach::<Group>(a).unwrap();
    store.insert(b, Group::new("b"));

    assert!(store.resolve(stale).is_none());
    assert!(store.owner(stale).is_none());
    assert!(matches!(
        store.detach_ref(ComponentRef {
            kind: ComponentKind::Group,
            handle: stale.raw(),
        }),
        Err(StoreError::StaleReference {
            kind: ComponentKind::Group
        })
    ));
    assert_eq!(store.get::<Group>(b), Some(&Group::new("b")));
}

// =============================================================================
// 3. Queries
// =============================================================================

#[test]
fn query_filtered_by_predicate() {
    let mut store = ComponentStore::new();
    let walls = [
        store.spawn([Group::new("walls").into()]).unwrap(),
        store.spawn([Group::new("walls").into()]).unwrap(),
    ];
    store.spawn([Group::new("enemies").into()]).unwrap();

    let mut found: Vec<Entity> = store
        .query_filtered::<Group, _>(|g| g.name == "walls")
        .map(|(e, _)| e)
        .collect();
    found.sort();
    assert_eq!(found, walls.to_vec());
    assert_eq!(store.query::<Group>().count(), 3);
}

#[test]
fn get_mut_changes_are_visible() {
    let mut store = ComponentStore::new();
    let e = store.spawn([Transform2D::new(0.0, 0.0).into()]).unwrap();
    store.get_mut::<Transform2D>(e).unwrap().position = Vec2::new(4.0, 5.0);
    assert_eq!(
        store.get::<Transform2D>(e).unwrap().position,
        Vec2::new(4.0, 5.0)
    );
}

// =============================================================================
// 4. Failure reporting
// =============================================================================

#[test]
fn empty_attach_is_rejected_without_creating_entity() {
    let mut store = ComponentStore::new();
    let e = Entity::from_raw(3);
    assert_eq!(
        store.attach(e, std::iter::empty()).unwrap_err(),
        StoreError::EmptyComponentSet
    );
    assert!(!store.contains(e));
    assert_eq!(
        store.spawn(Vec::new()).unwrap_err(),
        StoreError::EmptyComponentSet
    );
    assert_eq!(store.entity_count(), 0);
}

#[test]
fn missing_entity_and_component_are_reported() {
    let mut store = ComponentStore::new();
    let ghost = Entity::from_raw(99);
    assert!(matches!(
        store.detach::<Group>(ghost),
        Err(StoreError::EntityNotFound(e)) if e == ghost
    ));
    assert!(matches!(store.detach_entity(ghost), Err(StoreError::EntityNotFound(_))));

    let e = store.spawn([Transform2D::new(0.0, 0.0).into()]).unwrap();
    assert!(matches!(
        store.detach::<Group>(e),
        Err(StoreError::ComponentNotFound {
            kind: ComponentKind::Group,
            ..
        })
    ));
    assert!(store.contains(e));
    assert!(store.get::<Group>(ghost).is_none());
}

// =============================================================================
// 5. Properties
// =============================================================================

#[derive(Clone, Debug)]
enum Op {
    Attach(u64, u8),
    Detach(u64, u8),
    DetachEntity(u64),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0u64..4, 0u8..8).prop_map(|(e, k)| Op::Attach(e, k)),
        2 => (0u64..4, 0u8..8).prop_map(|(e, k)| Op::Detach(e, k)),
        1 => (0u64..4).prop_map(Op::DetachEntity),
    ]
}

proptest! {
    #[test]
    fn store_matches_model_under_random_ops(ops in prop::collection::vec(op(), 1..64)) {
        let mut store = ComponentStore::new();
        let mut model: BTreeMap<u64, BTreeSet<u8>> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Attach(e, k) => {
                    let kind = ComponentKind::from_id(k).unwrap();
                    store.attach(Entity::from_raw(e), [component_of(kind)]).unwrap();
                    model.entry(e).or_default().insert(k);
                }
                Op::Detach(e, k) => {
                    let kind = ComponentKind::from_id(k).unwrap();
                    let result = store.detach_kind(Entity::from_raw(e), kind);
                    let present = model.get(&e).is_some_and(|set| set.contains(&k));
                    prop_assert_eq!(result.is_ok(), present);
                    if let Ok(detached) = result {
                        let kinds = model.get_mut(&e).unwrap();
                        kinds.remove(&k);
                        prop_assert_eq!(detached.entity_destroyed, kinds.is_empty());
                        if kinds.is_empty() {
                            model.remove(&e);
                        }
                    }
                }
                Op::DetachEntity(e) => {
                    let result = store.detach_entity(Entity::from_raw(e));
                    prop_assert_eq!(result.is_ok(), model.remove(&e).is_some());
                }
            }

            prop_assert!(store.check_integrity().is_ok());
            prop_assert_eq!(store.entity_count(), model.len());
            for (e, kinds) in &model {
                let set = store.siblings(Entity::from_raw(*e)).unwrap();
                prop_assert_eq!(set.len(), kinds.len());
                for k in kinds {
                    prop_assert!(set.contains(ComponentKind::from_id(*k).unwrap()));
                }
            }
        }
    }
}
