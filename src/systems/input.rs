//! Input mapping system.
//!
//! [`map_input`] turns one frame of raw input into tick-stamped commands:
//!
//! - digital edges fire digital bindings on down, up or first down
//! - edges update the held set, which backs digital-to-2D axes
//! - analog samples pass through dead zone, response curve and a per-binding
//!   change threshold; axes drop back to an explicit zero on release
//! - pointer events fire bindings listing their phase
//!
//! The one-frame buffers are cleared afterwards.
use glam::Vec2;
use log::trace;

use crate::events::command::{Command, CommandValue, ControllerId, Intent, Tick};
use crate::resources::bindings::{BindingTable, DigitalTrigger};
use crate::resources::commandqueue::CommandQueue;
use crate::resources::input::{InputId, InputState, ReportSlot};

/// Map the buffered input into `queue`, stamping every command with `tick`.
///
/// Returns the number of commands emitted.
pub fn map_input(
    input: &mut InputState,
    bindings: &BindingTable,
    queue: &mut CommandQueue,
    tick: Tick,
) -> usize {
    let before = queue.len();
    let mut emit = |controller: ControllerId, intent: &Intent, value: CommandValue| {
        queue.push(Command {
            controller,
            intent: intent.clone(),
            value,
            tick,
        });
    };

    map_digital_edges(input, bindings, &mut emit);
    map_digital_axes(input, bindings, &mut emit);
    map_analog(input, bindings, &mut emit);

    for event in &input.pointer_events {
        for binding in bindings.pointer.iter().filter(|b| b.phases.contains(&event.phase)) {
            emit(
                binding.controller,
                &binding.intent,
                CommandValue::ScreenPoint(event.location),
            );
        }
    }

    input.clear_frame();
    queue.len() - before
}

fn map_digital_edges(
    input: &mut InputState,
    bindings: &BindingTable,
    emit: &mut impl FnMut(ControllerId, &Intent, CommandValue),
) {
    for edge in &input.digital_edges {
        let was_held = input.held.contains(&edge.input);
        for binding in bindings
            .digital
            .iter()
            .filter(|b| b.inputs.contains(&edge.input))
        {
            let fire = match binding.trigger {
                DigitalTrigger::OnDown => edge.is_down,
                DigitalTrigger::OnUp => !edge.is_down,
                DigitalTrigger::OnHold => edge.is_down && !was_held,
                DigitalTrigger::RepeatEvery { interval } => {
                    trace!(
                        "repeat binding on {} (every {}s) is not driven by the mapper",
                        edge.input, interval
                    );
                    false
                }
            };
            if fire {
                emit(
                    binding.controller,
                    &binding.intent,
                    CommandValue::Bool(edge.is_down),
                );
            }
        }
        if edge.is_down {
            input.held.insert(edge.input.clone());
        } else {
            input.held.remove(&edge.input);
        }
    }
}

fn map_digital_axes(
    input: &mut InputState,
    bindings: &BindingTable,
    emit: &mut impl FnMut(ControllerId, &Intent, CommandValue),
) {
    for (index, binding) in bindings.digital_2d.iter().enumerate() {
        let any_held = |set: &[InputId]| set.iter().any(|i| input.held.contains(i));
        let mut axis = Vec2::ZERO;
        if any_held(&binding.right) {
            axis.x += 1.0;
        }
        if any_held(&binding.left) {
            axis.x -= 1.0;
        }
        if any_held(&binding.up) {
            axis.y += 1.0;
        }
        if any_held(&binding.down) {
            axis.y -= 1.0;
        }
        let axis = axis.clamp_length_max(1.0);
        if let Some(value) = report(input, ReportSlot::Digital2D(index), axis, binding.epsilon) {
            emit(binding.controller, &binding.intent, CommandValue::Axis2D(value));
        }
    }
}

fn map_analog(
    input: &mut InputState,
    bindings: &BindingTable,
    emit: &mut impl FnMut(ControllerId, &Intent, CommandValue),
) {
    for (index, binding) in bindings.analog_1d.iter().enumerate() {
        let raw = input.analog_value(&binding.input);
        let shaped = binding.tuning.shape(raw.abs()).copysign(raw);
        let sample = Vec2::new(shaped, 0.0);
        if let Some(value) = report(
            input,
            ReportSlot::Analog1D(index),
            sample,
            binding.tuning.epsilon,
        ) {
            emit(binding.controller, &binding.intent, CommandValue::Axis1D(value.x));
        }
    }

    for (index, binding) in bindings.analog_2d.iter().enumerate() {
        let mut raw = Vec2::new(
            input.analog_value(&binding.x),
            input.analog_value(&binding.y),
        );
        if binding.invert_y {
            raw.y = -raw.y;
        }
        // circular dead zone on the magnitude, direction preserved
        let magnitude = raw.length();
        let shaped = binding.tuning.shape(magnitude);
        let axis = if shaped > 0.0 {
            (raw / magnitude * shaped).clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
        if let Some(value) = report(
            input,
            ReportSlot::Analog2D(index),
            axis,
            binding.tuning.epsilon,
        ) {
            emit(binding.controller, &binding.intent, CommandValue::Axis2D(value));
        }
    }
}

/// Spam suppression: `Some(value)` when it differs enough from what `slot`
/// last reported, or when it returns to zero from anything else.
fn report(input: &mut InputState, slot: ReportSlot, value: Vec2, epsilon: f32) -> Option<Vec2> {
    let last = input.last_reported.get(&slot).copied().unwrap_or(Vec2::ZERO);
    let released = value == Vec2::ZERO && last != Vec2::ZERO;
    if released || (value - last).length() > epsilon {
        input.last_reported.insert(slot, value);
        Some(value)
    } else {
        None
    }
}
