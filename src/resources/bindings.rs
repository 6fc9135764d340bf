//! Input binding table.
//!
//! Declares how raw inputs turn into commands. The table is plain data,
//! loadable from JSON and swappable while the simulation runs.
//!
//! ```json
//! {
//!   "digital": [
//!     { "inputs": ["space"], "controller": 0, "intent": "jump", "trigger": "on_down" }
//!   ],
//!   "digital_2d": [
//!     { "up": ["w"], "down": ["s"], "left": ["a"], "right": ["d"],
//!       "controller": 0, "intent": "move" }
//!   ],
//!   "pointer": [
//!     { "phases": ["began", "moved"], "controller": 0, "intent": "move_to" }
//!   ]
//! }
//! ```
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::command::{ControllerId, Intent};
use crate::resources::input::{InputId, PointerPhase};

/// Exponential curves flatten into a division by ~0 as the base approaches 1.
pub const MIN_EXPONENTIAL_BASE: f32 = 1.0 + 1e-3;

/// Errors raised while loading a binding table.
#[derive(Debug, Error)]
pub enum BindingError {
    #[error("failed to open binding file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed binding table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// When a digital binding fires.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitalTrigger {
    /// Every down edge.
    #[default]
    OnDown,
    /// Every up edge.
    OnUp,
    /// The first down edge of a press; repeated downs while held are ignored.
    OnHold,
    /// Periodic repeat while held. Needs a timer, which the mapper does not
    /// keep; such bindings never fire at this layer.
    RepeatEvery { interval: f32 },
}

/// Shape applied to an analog magnitude after the dead zone.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseCurve {
    #[default]
    Linear,
    /// `x^exponent`.
    Power { exponent: f32 },
    /// `(base^x - 1) / (base - 1)`.
    Exponential { base: f32 },
}

impl ResponseCurve {
    /// Map a magnitude in `[0, 1]` onto `[0, 1]`.
    pub fn apply(&self, x: f32) -> f32 {
        let x = x.clamp(0.0, 1.0);
        match *self {
            ResponseCurve::Linear => x,
            ResponseCurve::Power { exponent } => {
                if exponent > 0.0 && exponent.is_finite() {
                    x.powf(exponent)
                } else {
                    warn!("power curve with exponent {} treated as linear", exponent);
                    x
                }
            }
            ResponseCurve::Exponential { base } => {
                let base = if base.is_finite() {
                    base.max(MIN_EXPONENTIAL_BASE)
                } else {
                    MIN_EXPONENTIAL_BASE
                };
                (base.powf(x) - 1.0) / (base - 1.0)
            }
        }
    }
}

/// Dead zone, curve and spam threshold of an analog binding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalogTuning {
    /// Magnitudes at or below this read as zero.
    pub dead_zone: f32,
    pub curve: ResponseCurve,
    /// Minimum change from the last reported value worth a new command.
    pub epsilon: f32,
}

impl Default for AnalogTuning {
    fn default() -> Self {
        Self {
            dead_zone: 0.1,
            curve: ResponseCurve::Linear,
            epsilon: 0.01,
        }
    }
}

impl AnalogTuning {
    /// Dead zone then curve, applied to a non-negative magnitude.
    ///
    /// The range past the dead zone is rescaled linearly to `[0, 1]`.
    pub fn shape(&self, magnitude: f32) -> f32 {
        let dead_zone = self.dead_zone.clamp(0.0, 0.999);
        if magnitude <= dead_zone {
            return 0.0;
        }
        let live = ((magnitude - dead_zone) / (1.0 - dead_zone)).clamp(0.0, 1.0);
        self.curve.apply(live)
    }
}

/// Digital input(s) to a command carrying `Bool`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DigitalBinding {
    /// Any of these inputs triggers the binding.
    pub inputs: Vec<InputId>,
    pub controller: ControllerId,
    pub intent: Intent,
    #[serde(default)]
    pub trigger: DigitalTrigger,
}

/// One analog axis to a command carrying `Axis1D`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analog1DBinding {
    pub input: InputId,
    pub controller: ControllerId,
    pub intent: Intent,
    #[serde(default)]
    pub tuning: AnalogTuning,
}

/// Two analog axes to a command carrying `Axis2D`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Analog2DBinding {
    pub x: InputId,
    pub y: InputId,
    pub controller: ControllerId,
    pub intent: Intent,
    #[serde(default)]
    pub tuning: AnalogTuning,
    /// Flip the y sample (sticks commonly report down as positive).
    #[serde(default)]
    pub invert_y: bool,
}

/// Four sets of digital inputs to a synthetic `Axis2D`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Digital2DBinding {
    #[serde(default)]
    pub up: Vec<InputId>,
    #[serde(default)]
    pub down: Vec<InputId>,
    #[serde(default)]
    pub left: Vec<InputId>,
    #[serde(default)]
    pub right: Vec<InputId>,
    pub controller: ControllerId,
    pub intent: Intent,
    #[serde(default = "default_axis_epsilon")]
    pub epsilon: f32,
}

impl Digital2DBinding {
    /// Whether `input` contributes to this axis.
    pub fn watches(&self, input: &InputId) -> bool {
        [&self.up, &self.down, &self.left, &self.right]
            .iter()
            .any(|set| set.contains(input))
    }
}

fn default_axis_epsilon() -> f32 {
    1e-3
}

/// Pointer phases to a command carrying `ScreenPoint`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerBinding {
    pub phases: Vec<PointerPhase>,
    pub controller: ControllerId,
    pub intent: Intent,
}

/// Every mapping the input mapper knows about.
///
/// Families missing from a binding file are empty, never the built-in layout.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default = "BindingTable::empty")]
pub struct BindingTable {
    pub digital: Vec<DigitalBinding>,
    pub analog_1d: Vec<Analog1DBinding>,
    pub analog_2d: Vec<Analog2DBinding>,
    pub digital_2d: Vec<Digital2DBinding>,
    pub pointer: Vec<PointerBinding>,
}

impl BindingTable {
    /// Table without any binding.
    pub fn empty() -> Self {
        Self {
            digital: Vec::new(),
            analog_1d: Vec::new(),
            analog_2d: Vec::new(),
            digital_2d: Vec::new(),
            pointer: Vec::new(),
        }
    }

    /// Parse a table from JSON text.
    pub fn from_json(text: &str) -> Result<Self, BindingError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a table from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, BindingError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| BindingError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table: Self = serde_json::from_reader(BufReader::new(file))?;
        info!(
            "Loaded bindings from {:?}: {} digital, {} analog 1D, {} analog 2D, {} digital 2D, {} pointer",
            path,
            table.digital.len(),
            table.analog_1d.len(),
            table.analog_2d.len(),
            table.digital_2d.len(),
            table.pointer.len()
        );
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.digital.len()
            + self.analog_1d.len()
            + self.analog_2d.len()
            + self.digital_2d.len()
            + self.pointer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for BindingTable {
    /// WASD and arrow keys move, space jumps, escape stops, the left stick
    /// moves and pointer contacts seek; everything drives controller 0.
    fn default() -> Self {
        let player = ControllerId(0);
        let keys = |names: &[&str]| names.iter().map(|&n| InputId::from(n)).collect::<Vec<_>>();
        Self {
            digital: vec![
                DigitalBinding {
                    inputs: keys(&["space"]),
                    controller: player,
                    intent: Intent::Jump,
                    trigger: DigitalTrigger::OnHold,
                },
                DigitalBinding {
                    inputs: keys(&["escape"]),
                    controller: player,
                    intent: Intent::Stop,
                    trigger: DigitalTrigger::OnDown,
                },
            ],
            analog_1d: Vec::new(),
            analog_2d: vec![Analog2DBinding {
                x: "left_stick_x".into(),
                y: "left_stick_y".into(),
                controller: player,
                intent: Intent::Move,
                tuning: AnalogTuning {
                    dead_zone: 0.15,
                    ..AnalogTuning::default()
                },
                invert_y: true,
            }],
            digital_2d: vec![Digital2DBinding {
                up: keys(&["w", "up"]),
                down: keys(&["s", "down"]),
                left: keys(&["a", "left"]),
                right: keys(&["d", "right"]),
                controller: player,
                intent: Intent::Move,
                epsilon: default_axis_epsilon(),
            }],
            pointer: vec![PointerBinding {
                phases: vec![PointerPhase::Began, PointerPhase::Moved],
                controller: player,
                intent: Intent::MoveTo,
            }],
        }
    }
}
