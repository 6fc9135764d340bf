//! Command dispatch system.
//!
//! Hands each controller's eligible commands to the entities it possesses
//! (its thralls) and translates them into movement intents, impulses or stops.
//! A command is eligible once the current tick is strictly later than its
//! stamp; everything else stays queued for a later tick.
use glam::Vec2;
use log::{debug, warn};
use rustc_hash::FxHashMap;

use crate::components::exertion::Exertion;
use crate::components::inputcontrolled::InputControlled;
use crate::components::movementstats::MovementStats;
use crate::components::movestate::MoveState;
use crate::components::rigidbody::RigidBody;
use crate::events::command::{Command, CommandValue, ControllerId, Intent, Tick};
use crate::resources::commandqueue::CommandQueue;
use crate::resources::simconfig::SimConfig;
use crate::resources::viewport::Viewport;
use crate::store::{ComponentStore, Entity};

/// Consume eligible commands and apply them.
///
/// Every thrall of a controller receives every accepted command, in
/// ascending entity order. Eligible commands of a controller without thralls
/// are dropped. Returns the number of (command, entity) applications that
/// took effect.
pub fn dispatch_commands(
    store: &mut ComponentStore,
    queue: &mut CommandQueue,
    current: Tick,
    viewport: &Viewport,
    config: &SimConfig,
) -> usize {
    let mut thralls: FxHashMap<ControllerId, Vec<Entity>> = FxHashMap::default();
    for (entity, controlled) in store.query::<InputControlled>() {
        thralls.entry(controlled.controller).or_default().push(entity);
    }
    for entities in thralls.values_mut() {
        entities.sort_unstable();
    }

    let mut applied = 0;
    for controller in queue.controllers() {
        let eligible = queue.take_eligible(controller, current);
        if eligible.is_empty() {
            continue;
        }
        let Some(entities) = thralls.get(&controller) else {
            debug!(
                "{controller} has no thrall; dropping {} command(s) at {current}",
                eligible.len()
            );
            continue;
        };
        for command in &eligible {
            for &entity in entities {
                if apply_command(store, entity, command, viewport, config) {
                    applied += 1;
                }
            }
        }
    }
    applied
}

/// Translate one command for one entity. Returns whether it had an effect.
pub fn apply_command(
    store: &mut ComponentStore,
    entity: Entity,
    command: &Command,
    viewport: &Viewport,
    config: &SimConfig,
) -> bool {
    match (&command.intent, command.value) {
        (Intent::MoveTo, CommandValue::ScreenPoint(point)) => {
            let target = viewport.screen_to_world(point);
            let Some(exertion) = exertion_for(store, entity, config) else {
                return false;
            };
            exertion.gain = config.seek_gain;
            exertion.damping = config.seek_damping;
            exertion.arrive_epsilon = config.arrive_epsilon;
            exertion.seek(target);
            true
        }
        (Intent::TeleportTo, CommandValue::ScreenPoint(point)) => {
            let target = viewport.screen_to_world(point);
            let Some(exertion) = exertion_for(store, entity, config) else {
                return false;
            };
            exertion.teleport(target);
            true
        }
        (Intent::Move, CommandValue::Axis2D(axis)) => steer(store, entity, axis, config),
        (Intent::Move, CommandValue::Axis1D(value)) => {
            steer(store, entity, Vec2::new(value, 0.0), config)
        }
        (Intent::Jump, CommandValue::Bool(true)) => {
            let impulse = store
                .get::<MovementStats>(entity)
                .map_or(config.jump_impulse, |stats| stats.jump_impulse);
            match store.get_mut::<RigidBody>(entity) {
                Some(body) => {
                    body.apply_impulse(Vec2::new(0.0, impulse));
                    true
                }
                None => {
                    warn!("jump for {entity} ignored: no RigidBody");
                    false
                }
            }
        }
        (Intent::Stop, CommandValue::Bool(true)) => {
            let Some(exertion) = exertion_for(store, entity, config) else {
                return false;
            };
            exertion.stop(true);
            true
        }
        (Intent::Jump | Intent::Stop, CommandValue::Bool(false)) => {
            debug!("{:?} release for {entity} ignored", command.intent);
            false
        }
        (intent, value) => {
            warn!(
                "unhandled command {intent:?} with {value:?} from {} for {entity}",
                command.controller
            );
            false
        }
    }
}

/// Write a direction intent scaled by the axis magnitude; a zero axis drops
/// the goal so the entity coasts to rest.
fn steer(store: &mut ComponentStore, entity: Entity, axis: Vec2, config: &SimConfig) -> bool {
    let cruise = store
        .get::<MovementStats>(entity)
        .map_or(config.cruise_speed, |stats| stats.cruise_speed);
    let Some(exertion) = exertion_for(store, entity, config) else {
        return false;
    };
    let magnitude = axis.length().min(1.0);
    if magnitude <= f32::EPSILON {
        exertion.stop(false);
    } else {
        exertion.gain = config.direction_gain;
        exertion.damping = config.direction_damping;
        exertion.move_in(axis / axis.length(), cruise * magnitude);
    }
    true
}

/// The entity's exertion, created from the configured defaults (together
/// with a move state) when missing.
fn exertion_for<'a>(
    store: &'a mut ComponentStore,
    entity: Entity,
    config: &SimConfig,
) -> Option<&'a mut Exertion> {
    if store.handle::<MoveState>(entity).is_none() {
        store.insert(entity, MoveState::default());
    }
    let handle = match store.handle::<Exertion>(entity) {
        Some(handle) => handle,
        None => {
            let mut exertion = Exertion::with_gains(config.seek_gain, config.seek_damping);
            exertion.arrive_epsilon = config.arrive_epsilon;
            exertion.max_acceleration = config.max_acceleration;
            debug!("{entity}: created Exertion on first command");
            store.insert(entity, exertion)
        }
    };
    store.resolve_mut(handle)
}
