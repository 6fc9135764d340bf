//! Movement exertion controller.
//!
//! Turns each entity's [`ExertionIntent`] into the acceleration it wants this
//! tick, written to [`MoveState::acceleration`] for the physics integrator:
//!
//! - `None`: no acceleration; the entity settles once slow enough
//! - `Direction`: velocity-tracking P term plus damping
//! - `Seek`: PD on the position error; remaining distance is recorded
//! - `Teleport`: nothing here, the committer moves the entity
//!
//! Direction and seek output is clamped to the exertion's maximum, then
//! projected out of the ground when grounded or scaled by air control when
//! airborne.
use glam::Vec2;
use log::debug;

use crate::components::exertion::{Exertion, ExertionIntent};
use crate::components::movestate::MoveState;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform2D;
use crate::components::Columns;
use crate::store::ComponentStore;

/// Compute the authored acceleration of every entity with an exertion.
pub fn exertion_controller(store: &mut ComponentStore, settle_epsilon: f32) {
    let (index, columns) = store.split_mut();
    let Columns {
        exertions,
        move_states,
        bodies,
        transforms,
        ..
    } = columns;

    for (_, entity, exertion) in exertions.iter_mut() {
        let Some(set) = index.get(&entity) else {
            continue;
        };
        let Some(state) = set.handle::<MoveState>().and_then(|h| move_states.get_mut(h)) else {
            continue;
        };
        let kinematic = set
            .handle::<RigidBody>()
            .and_then(|h| bodies.get(h))
            .is_some_and(RigidBody::is_kinematic);

        if exertion.kill_velocity {
            exertion.kill_velocity = false;
            if !kinematic {
                state.velocity = Vec2::ZERO;
            }
        }
        if kinematic {
            state.acceleration = Vec2::ZERO;
            continue;
        }

        match exertion.intent {
            ExertionIntent::None => {
                state.acceleration = Vec2::ZERO;
                state.seeking = false;
                if state.velocity.length() < settle_epsilon {
                    state.settled = true;
                }
            }
            ExertionIntent::Direction { direction, speed } => {
                let desired = direction.normalize_or_zero() * speed;
                let raw = (desired - state.velocity) * exertion.gain
                    - state.velocity * exertion.damping;
                state.acceleration = shape(raw, exertion, state);
                state.seeking = false;
                state.settled = false;
            }
            ExertionIntent::Seek { target } => {
                let Some(position) = set
                    .handle::<Transform2D>()
                    .and_then(|h| transforms.get(h))
                    .map(|t| t.position)
                else {
                    debug!("{entity}: seek without a Transform2D");
                    state.acceleration = Vec2::ZERO;
                    continue;
                };
                let error = target - position;
                let raw = error * exertion.gain - state.velocity * exertion.damping;
                state.acceleration = shape(raw, exertion, state);
                state.remaining_distance = error.length();
                state.seeking = true;
                state.settled = false;
            }
            ExertionIntent::Teleport { .. } => {
                state.acceleration = Vec2::ZERO;
            }
        }
    }
}

/// Clamp to the exertion's maximum, then respect the ground or air control.
fn shape(acceleration: Vec2, exertion: &Exertion, state: &MoveState) -> Vec2 {
    let mut a = if exertion.max_acceleration.is_finite() {
        acceleration.clamp_length_max(exertion.max_acceleration.max(0.0))
    } else {
        acceleration
    };
    if state.grounded {
        let into_ground = a.dot(state.ground_normal);
        if into_ground < 0.0 {
            a -= state.ground_normal * into_ground;
        }
    } else {
        a *= state.air_control.clamp(0.0, 1.0);
    }
    a
}
