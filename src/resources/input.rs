//! Raw input buffers fed by the platform layer.
//!
//! The platform appends digital edges and pointer events as they arrive and
//! updates analog samples whenever a device reports a new value. The input
//! mapper reads everything once per frame, then clears the one-frame buffers;
//! analog samples and the held set persist.
use std::fmt;

use glam::Vec2;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Name of a physical input ("w", "space", "left_stick_x", ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputId(pub String);

impl InputId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl From<&str> for InputId {
    fn from(name: &str) -> Self {
        Self(name.to_owned())
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Down or up transition of a digital input.
#[derive(Clone, Debug, PartialEq)]
pub struct DigitalEdge {
    pub input: InputId,
    pub is_down: bool,
    /// Platform timestamp in seconds.
    pub timestamp: f64,
}

/// Phase of a pointer contact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

/// Device behind a pointer event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    #[default]
    Touch,
    Mouse,
    Pen,
}

/// One pointer sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    /// Contact identifier, stable for the lifetime of a touch.
    pub id: u64,
    pub kind: PointerKind,
    pub phase: PointerPhase,
    /// Location in screen pixels.
    pub location: Vec2,
}

/// Identifies a binding whose last reported value is remembered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportSlot {
    Analog1D(usize),
    Analog2D(usize),
    Digital2D(usize),
}

/// Input buffers and mapper memory.
#[derive(Debug, Default, Clone)]
pub struct InputState {
    /// Digital transitions since the last mapping pass.
    pub digital_edges: Vec<DigitalEdge>,
    /// Pointer samples since the last mapping pass.
    pub pointer_events: Vec<PointerEvent>,
    /// Latest value of each analog input; persists across frames.
    pub analog: FxHashMap<InputId, f32>,
    /// Digital inputs currently held down.
    pub held: FxHashSet<InputId>,
    /// Last value each analog/axis binding reported, for spam suppression.
    pub last_reported: FxHashMap<ReportSlot, Vec2>,
}

impl InputState {
    pub fn push_digital_edge(&mut self, input: impl Into<InputId>, is_down: bool, timestamp: f64) {
        self.digital_edges.push(DigitalEdge {
            input: input.into(),
            is_down,
            timestamp,
        });
    }

    pub fn push_pointer_event(&mut self, event: PointerEvent) {
        self.pointer_events.push(event);
    }

    pub fn set_analog(&mut self, input: impl Into<InputId>, value: f32) {
        self.analog.insert(input.into(), value);
    }

    /// Current analog value, 0 when never reported.
    pub fn analog_value(&self, input: &InputId) -> f32 {
        self.analog.get(input).copied().unwrap_or(0.0)
    }

    pub fn is_held(&self, input: &InputId) -> bool {
        self.held.contains(input)
    }

    /// Drop the one-frame buffers.
    pub fn clear_frame(&mut self) {
        self.digital_edges.clear();
        self.pointer_events.clear();
    }

    /// Forget what every binding last reported.
    pub fn reset_reports(&mut self) {
        self.last_reported.clear();
    }
}

impl From<String> for InputId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analog_defaults_to_zero() {
        let mut input = InputState::default();
        assert_eq!(input.analog_value(&"left_stick_x".into()), 0.0);
        input.set_analog("left_stick_x", 0.5);
        assert_eq!(input.analog_value(&"left_stick_x".into()), 0.5);
    }

    #[test]
    fn test_clear_frame_keeps_persistent_state() {
        let mut input = InputState::default();
        input.push_digital_edge("w", true, 0.0);
        input.push_pointer_event(PointerEvent {
            id: 1,
            kind: PointerKind::Mouse,
            phase: PointerPhase::Began,
            location: Vec2::new(3.0, 4.0),
        });
        input.set_analog("trigger", 1.0);
        input.held.insert("w".into());
        input.clear_frame();
        assert!(input.digital_edges.is_empty());
        assert!(input.pointer_events.is_empty());
        assert!(input.is_held(&"w".into()));
        assert_eq!(input.analog_value(&"trigger".into()), 1.0);
    }
}
