//! Movement state committer.
//!
//! Snapshots the previous pose for interpolation, integrates position from
//! the velocity the integrator just produced, and resolves the one-shot parts
//! of an exertion: teleports snap and clear, seeks snap onto their target
//! once they cross it or get close enough.
use log::debug;

use crate::components::Columns;
use crate::components::exertion::{Exertion, ExertionIntent};
use crate::components::movementstats::MovementStats;
use crate::components::movestate::MoveState;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform2D;
use crate::store::ComponentStore;

/// Commit one fixed step of `dt` seconds.
///
/// `arrival_floor` is the smallest arrival distance honored regardless of an
/// exertion's own epsilon (one world unit per pixel keeps seeks from
/// oscillating below what the screen can show).
pub fn commit_movement(
    store: &mut ComponentStore,
    arrival_floor: f32,
    settle_epsilon: f32,
    dt: f32,
) {
    let (index, columns) = store.split_mut();
    let Columns {
        transforms,
        move_states,
        exertions,
        bodies,
        stats,
        ..
    } = columns;

    for (entity, set) in index.iter() {
        let Some(transform) = set.handle::<Transform2D>().and_then(|h| transforms.get_mut(h)) else {
            continue;
        };
        transform.snapshot();

        let Some(state) = set.handle::<MoveState>().and_then(|h| move_states.get_mut(h)) else {
            continue;
        };
        let mut exertion = set.handle::<Exertion>().and_then(|h| exertions.get_mut(h));
        let body = set.handle::<RigidBody>().and_then(|h| bodies.get(h));

        if body.is_some_and(|b| b.is_kinematic() || b.frozen) {
            if let Some(ex) = exertion.as_deref_mut() {
                if matches!(ex.intent, ExertionIntent::Teleport { .. }) {
                    debug!("{entity}: teleport on an immovable body discarded");
                    ex.intent = ExertionIntent::None;
                }
            }
            continue;
        }

        let intent = exertion.as_deref().map_or(ExertionIntent::None, |ex| ex.intent);
        match intent {
            ExertionIntent::Teleport { target } => {
                transform.place(target);
                state.halt();
                clear_intent(exertion.as_deref_mut());
            }
            ExertionIntent::Seek { target } => {
                let before = target - transform.position;
                transform.position += state.velocity * dt;
                let after = target - transform.position;
                state.remaining_distance = after.length();

                let epsilon = exertion
                    .as_deref()
                    .map_or(0.0, |ex| ex.arrive_epsilon)
                    .max(arrival_floor);
                let crossed = before.dot(after) < 0.0;
                if crossed || state.remaining_distance <= epsilon {
                    transform.position = target;
                    state.halt();
                    clear_intent(exertion.as_deref_mut());
                }
            }
            ExertionIntent::Direction { .. } | ExertionIntent::None => {
                transform.position += state.velocity * dt;
            }
        }

        if let Some(cap) = set
            .handle::<MovementStats>()
            .and_then(|h| stats.get(h))
            .and_then(|s| s.max_speed)
        {
            state.velocity = state.velocity.clamp_length_max(cap.max(0.0));
        }

        let active = exertion.as_deref().is_some_and(|ex| ex.intent.is_active());
        state.settled = state.velocity.length() < settle_epsilon && !active;
    }
}

fn clear_intent(exertion: Option<&mut Exertion>) {
    if let Some(ex) = exertion {
        ex.intent = ExertionIntent::None;
    }
}
