//! Physics integrator.
//!
//! Accumulates the authored acceleration, the body's force terms, impulses
//! and drag, then integrates velocity with semi-implicit Euler followed by
//! exponential damping and the speed caps.
//!
//! Entities with a [`MoveState`] but no [`RigidBody`] integrate as a unit
//! mass with no drag. Frozen bodies are skipped entirely. Kinematic bodies
//! (`mass <= 0`) age their terms and drain impulses but never change velocity.
use glam::Vec2;

use crate::components::Columns;
use crate::components::forceterm::{ForceQuantity, ForceSpace, ForceTerm};
use crate::components::movementstats::MovementStats;
use crate::components::movestate::MoveState;
use crate::components::rigidbody::RigidBody;
use crate::components::transform::Transform2D;
use crate::store::ComponentStore;

/// Advance velocities by one fixed step of `dt` seconds.
pub fn integrate_physics(store: &mut ComponentStore, dt: f32) {
    let (index, columns) = store.split_mut();
    let Columns {
        bodies,
        move_states,
        transforms,
        stats,
        ..
    } = columns;

    for set in index.values() {
        let body = set.handle::<RigidBody>().and_then(|h| bodies.get_mut(h));
        let state = set.handle::<MoveState>().and_then(|h| move_states.get_mut(h));

        let Some(body) = body else {
            if let Some(state) = state {
                let a = state.acceleration;
                state.velocity += a * dt;
                clamp_stat_speed(state, set.handle::<MovementStats>().and_then(|h| stats.get(h)));
                state.last_acceleration = a;
                state.acceleration = Vec2::ZERO;
            }
            continue;
        };
        if body.frozen {
            continue;
        }

        let rotation = set
            .handle::<Transform2D>()
            .and_then(|h| transforms.get(h))
            .map_or(0.0, |t| t.rotation);
        let term_acceleration = age_terms(body, rotation, dt);
        let impulse: Vec2 = body.impulses.drain(..).sum();

        let Some(state) = state else {
            continue;
        };
        if body.is_kinematic() {
            state.acceleration = Vec2::ZERO;
            state.last_acceleration = Vec2::ZERO;
            continue;
        }

        let velocity = state.velocity;
        let mut a = state.acceleration + term_acceleration;
        a -= velocity * (body.linear_drag / body.mass);
        a -= velocity
            * if state.grounded {
                body.ground_friction
            } else {
                body.air_drag
            };

        let mut v = velocity + impulse / body.mass + a * dt;
        v *= (-body.damping * dt).exp();
        if let Some(cap) = body.max_speed {
            v = v.clamp_length_max(cap.max(0.0));
        }
        state.velocity = v;
        clamp_stat_speed(state, set.handle::<MovementStats>().and_then(|h| stats.get(h)));

        state.last_acceleration = a;
        state.acceleration = Vec2::ZERO;
    }
}

/// Age every term by `dt`, prune the expired ones and return the summed
/// world-space acceleration of the enabled survivors.
///
/// Kinematic bodies still age their terms; the sum is then unused.
fn age_terms(body: &mut RigidBody, rotation: f32, dt: f32) -> Vec2 {
    let mass = body.mass;
    let mut total = Vec2::ZERO;
    body.forces.retain_mut(|term| match term.advance(dt) {
        Some(strength) => {
            if term.enabled && mass > 0.0 {
                total += term_acceleration(term, strength, mass, rotation);
            }
            true
        }
        None => false,
    });
    total
}

fn term_acceleration(term: &ForceTerm, strength: f32, mass: f32, rotation: f32) -> Vec2 {
    let vector = term.quantity.vector() * strength;
    let accel = match term.quantity {
        ForceQuantity::Force(_) => vector / mass,
        ForceQuantity::Acceleration(_) => vector,
    };
    match term.space {
        ForceSpace::World => accel,
        ForceSpace::Local => Vec2::from_angle(rotation).rotate(accel),
    }
}

fn clamp_stat_speed(state: &mut MoveState, stats: Option<&MovementStats>) {
    if let Some(cap) = stats.and_then(|s| s.max_speed) {
        state.velocity = state.velocity.clamp_length_max(cap.max(0.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Entity;

    const DT: f32 = 1.0 / 60.0;
    const EPSILON: f32 = 1e-4;

    fn vec_approx_eq(a: Vec2, b: Vec2) -> bool {
        (a - b).length() < EPSILON
    }

    fn body(store: &mut ComponentStore, body: RigidBody, state: MoveState) -> Entity {
        store
            .spawn([Transform2D::new(0.0, 0.0).into(), body.into(), state.into()])
            .unwrap()
    }

    #[test]
    fn test_force_divides_by_mass() {
        let mut store = ComponentStore::new();
        let mut rb = RigidBody::with_physics(2.0, 0.0, None);
        rb.add_force(ForceTerm::force("push", Vec2::new(4.0, 0.0)));
        let e = body(&mut store, rb, MoveState::default());

        integrate_physics(&mut store, 0.5);
        let state = store.get::<MoveState>(e).unwrap();
        assert!(vec_approx_eq(state.velocity, Vec2::new(1.0, 0.0)));
        assert!(vec_approx_eq(state.last_acceleration, Vec2::new(2.0, 0.0)));
        assert_eq!(state.acceleration, Vec2::ZERO);
    }

    #[test]
    fn test_local_terms_follow_rotation() {
        let mut store = ComponentStore::new();
        let mut rb = RigidBody::new();
        rb.add_force(ForceTerm::acceleration("thrust", Vec2::X).local());
        let e = store
            .spawn([
                Transform2D::new(0.0, 0.0)
                    .with_rotation(std::f32::consts::FRAC_PI_2)
                    .into(),
                rb.into(),
                MoveState::default().into(),
            ])
            .unwrap();
        integrate_physics(&mut store, 1.0);
        assert!(vec_approx_eq(
            store.get::<MoveState>(e).unwrap().velocity,
            Vec2::Y
        ));
    }

    #[test]
    fn test_impulse_is_one_shot() {
        let mut store = ComponentStore::new();
        let mut rb = RigidBody::with_physics(4.0, 0.0, None);
        rb.apply_impulse(Vec2::new(0.0, 8.0));
        let e = body(&mut store, rb, MoveState::default());

        integrate_physics(&mut store, DT);
        assert!(vec_approx_eq(
            store.get::<MoveState>(e).unwrap().velocity,
            Vec2::new(0.0, 2.0)
        ));
        assert!(store.get::<RigidBody>(e).unwrap().impulses.is_empty());
        integrate_physics(&mut store, DT);
        assert!(vec_approx_eq(
            store.get::<MoveState>(e).unwrap().velocity,
            Vec2::new(0.0, 2.0)
        ));
    }

    #[test]
    fn test_drag_damping_and_caps() {
        let mut store = ComponentStore::new();
        let rb = RigidBody::with_physics(2.0, 0.0, None).with_linear_drag(1.0);
        let dragged = body(&mut store, rb, MoveState::with_velocity(Vec2::new(10.0, 0.0)));

        let damped = body(
            &mut store,
            RigidBody::with_physics(1.0, 2.0, None),
            MoveState::with_velocity(Vec2::new(10.0, 0.0)),
        );

        let capped = body(
            &mut store,
            RigidBody::with_physics(1.0, 0.0, Some(5.0)),
            MoveState::with_velocity(Vec2::new(10.0, 0.0)),
        );
        store.insert(capped, MovementStats::new(Some(3.0), 1.0, 1.0));

        integrate_physics(&mut store, 0.1);
        // a = -10 * 1 / 2 = -5
        assert!(vec_approx_eq(
            store.get::<MoveState>(dragged).unwrap().velocity,
            Vec2::new(9.5, 0.0)
        ));
        assert!(vec_approx_eq(
            store.get::<MoveState>(damped).unwrap().velocity,
            Vec2::new(10.0 * (-0.2f32).exp(), 0.0)
        ));
        assert!(vec_approx_eq(
            store.get::<MoveState>(capped).unwrap().velocity,
            Vec2::new(3.0, 0.0)
        ));
    }

    #[test]
    fn test_surface_drag_follows_grounded_flag() {
        let mut store = ComponentStore::new();
        let rb = RigidBody::with_physics(2.0, 0.0, None).with_surface_drag(1.0, 4.0);
        let airborne = body(
            &mut store,
            rb.clone(),
            MoveState::with_velocity(Vec2::new(10.0, 0.0)),
        );
        let mut grounded_state = MoveState::with_velocity(Vec2::new(10.0, 0.0));
        grounded_state.ground(Vec2::Y);
        let grounded = body(&mut store, rb, grounded_state);

        integrate_physics(&mut store, 0.1);
        // not mass-scaled: a = -10 * 1 in the air, -10 * 4 on the ground
        assert!(vec_approx_eq(
            store.get::<MoveState>(airborne).unwrap().velocity,
            Vec2::new(9.0, 0.0)
        ));
        assert!(vec_approx_eq(
            store.get::<MoveState>(grounded).unwrap().velocity,
            Vec2::new(6.0, 0.0)
        ));
        assert!(vec_approx_eq(
            store.get::<MoveState>(grounded).unwrap().last_acceleration,
            Vec2::new(-40.0, 0.0)
        ));
    }

    #[test]
    fn test_linear_term_pruned_on_expiry() {
        let mut store = ComponentStore::new();
        let mut rb = RigidBody::new();
        rb.add_force(ForceTerm::acceleration("gust", Vec2::X).with_linear_decay(1.0));
        let e = body(&mut store, rb, MoveState::default());

        for _ in 0..3 {
            integrate_physics(&mut store, 0.25);
        }
        assert_eq!(store.get::<RigidBody>(e).unwrap().forces.len(), 1);
        integrate_physics(&mut store, 0.25);
        assert!(store.get::<RigidBody>(e).unwrap().forces.is_empty());
        assert_eq!(
            store.get::<MoveState>(e).unwrap().last_acceleration,
            Vec2::ZERO
        );
    }

    #[test]
    fn test_kinematic_ages_terms_without_moving() {
        let mut store = ComponentStore::new();
        let mut rb = RigidBody::kinematic();
        rb.add_force(ForceTerm::force("wind", Vec2::X).with_lifetime(0.5));
        rb.apply_impulse(Vec2::new(100.0, 0.0));
        let e = body(&mut store, rb, MoveState::with_velocity(Vec2::new(1.0, 1.0)));

        integrate_physics(&mut store, 0.25);
        integrate_physics(&mut store, 0.25);
        let rb = store.get::<RigidBody>(e).unwrap();
        assert!(rb.forces.is_empty());
        assert!(rb.impulses.is_empty());
        assert_eq!(
            store.get::<MoveState>(e).unwrap().velocity,
            Vec2::new(1.0, 1.0)
        );
    }

    #[test]
    fn test_frozen_body_is_untouched() {
        let mut store = ComponentStore::new();
        let mut rb = RigidBody::new();
        rb.apply_impulse(Vec2::X);
        rb.freeze();
        let e = body(&mut store, rb, MoveState::default());
        integrate_physics(&mut store, DT);
        assert_eq!(store.get::<RigidBody>(e).unwrap().impulses.len(), 1);
        assert_eq!(store.get::<MoveState>(e).unwrap().velocity, Vec2::ZERO);
    }
}
