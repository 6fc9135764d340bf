//! Simulation configuration resource.
//!
//! Settings are loaded from an INI file. Missing keys keep their defaults so a
//! partial file is always valid.
//!
//! # Configuration File Format
//!
//! ```ini
//! [simulation]
//! target_fps = 60
//! max_steps = 5
//! max_frame_delta = 0.25
//! time_scale = 1.0
//!
//! [movement]
//! settle_epsilon = 0.01
//! seek_gain = 40.0
//! seek_damping = 12.65
//! direction_gain = 12.0
//! direction_damping = 0.0
//! arrive_epsilon = 0.01
//! max_acceleration = 400.0
//! cruise_speed = 6.0
//! jump_impulse = 8.0
//!
//! [viewport]
//! width = 640
//! height = 360
//! world_units_per_pixel = 0.05
//!
//! [input]
//! bindings = ./assets/bindings.json
//! ```

use std::path::{Path, PathBuf};

use configparser::ini::Ini;
use log::info;
use thiserror::Error;

const DEFAULT_TARGET_FPS: u32 = 60;
const DEFAULT_MAX_STEPS: u32 = 5;
const DEFAULT_MAX_FRAME_DELTA: f64 = 0.25;
const DEFAULT_TIME_SCALE: f64 = 1.0;
const DEFAULT_SETTLE_EPSILON: f32 = 0.01;
const DEFAULT_SEEK_GAIN: f32 = 40.0;
const DEFAULT_DIRECTION_GAIN: f32 = 12.0;
const DEFAULT_ARRIVE_EPSILON: f32 = 0.01;
const DEFAULT_CRUISE_SPEED: f32 = 6.0;
const DEFAULT_JUMP_IMPULSE: f32 = 8.0;
const DEFAULT_VIEWPORT_WIDTH: u32 = 640;
const DEFAULT_VIEWPORT_HEIGHT: u32 = 360;
const DEFAULT_WORLD_UNITS_PER_PIXEL: f32 = 0.05;
const DEFAULT_CONFIG_PATH: &str = "./config.ini";

/// Errors raised while reading or writing the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config file {path:?}: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("failed to save config file {path:?}: {source}")]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid value for [{section}] {key}: {reason}")]
    InvalidValue {
        section: &'static str,
        key: &'static str,
        reason: String,
    },
}

/// Tunables of a running simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimConfig {
    /// Fixed simulation rate in ticks per second.
    pub target_fps: u32,
    /// Upper bound on simulation steps run in one frame.
    pub max_steps: u32,
    /// Safety ceiling on a single frame delta, in seconds.
    pub max_frame_delta: f64,
    /// Multiplier on raw frame deltas (0 pauses).
    pub time_scale: f64,
    /// Speed under which an idle entity counts as settled.
    pub settle_epsilon: f32,
    /// Proportional gain written for seek commands.
    pub seek_gain: f32,
    /// Derivative gain written for seek commands.
    pub seek_damping: f32,
    /// Proportional gain written for direction commands.
    pub direction_gain: f32,
    /// Derivative gain written for direction commands.
    pub direction_damping: f32,
    /// Arrival distance for seeks.
    pub arrive_epsilon: f32,
    /// Cap on authored acceleration magnitude.
    pub max_acceleration: f32,
    /// Cruise speed used when an entity has no movement stats.
    pub cruise_speed: f32,
    /// Jump impulse used when an entity has no movement stats.
    pub jump_impulse: f32,
    /// Viewport width in pixels.
    pub viewport_width: u32,
    /// Viewport height in pixels.
    pub viewport_height: u32,
    /// World units covered by one pixel.
    pub world_units_per_pixel: f32,
    /// Binding table to load at startup, if any.
    pub bindings_path: Option<PathBuf>,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SimConfig {
    /// Create a configuration with safe default values.
    pub fn new() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            max_steps: DEFAULT_MAX_STEPS,
            max_frame_delta: DEFAULT_MAX_FRAME_DELTA,
            time_scale: DEFAULT_TIME_SCALE,
            settle_epsilon: DEFAULT_SETTLE_EPSILON,
            seek_gain: DEFAULT_SEEK_GAIN,
            // critically damped for the default gain
            seek_damping: 2.0 * DEFAULT_SEEK_GAIN.sqrt(),
            direction_gain: DEFAULT_DIRECTION_GAIN,
            direction_damping: 0.0,
            arrive_epsilon: DEFAULT_ARRIVE_EPSILON,
            max_acceleration: f32::INFINITY,
            cruise_speed: DEFAULT_CRUISE_SPEED,
            jump_impulse: DEFAULT_JUMP_IMPULSE,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
            world_units_per_pixel: DEFAULT_WORLD_UNITS_PER_PIXEL,
            bindings_path: None,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration bound to a custom file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Duration of one tick in seconds.
    pub fn tick_duration(&self) -> f64 {
        if self.target_fps == 0 {
            0.0
        } else {
            1.0 / self.target_fps as f64
        }
    }

    /// Load values from the INI file at `config_path`.
    ///
    /// Missing values retain their current values.
    pub fn load_from_file(&mut self) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.load(&self.config_path).map_err(|reason| ConfigError::Load {
            path: self.config_path.clone(),
            reason,
        })?;
        self.apply(&ini)?;
        info!(
            "Loaded config from {:?}: {} fps, max_steps={}, viewport {}x{}",
            self.config_path,
            self.target_fps,
            self.max_steps,
            self.viewport_width,
            self.viewport_height
        );
        Ok(())
    }

    /// Parse values from INI text.
    pub fn load_from_str(&mut self, text: &str) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.read(text.to_owned())
            .map_err(|reason| ConfigError::Load {
                path: PathBuf::from("<string>"),
                reason,
            })?;
        self.apply(&ini)
    }

    fn apply(&mut self, ini: &Ini) -> Result<(), ConfigError> {
        // [simulation]
        if let Some(fps) = read_uint(ini, "simulation", "target_fps")? {
            if fps == 0 {
                return Err(ConfigError::InvalidValue {
                    section: "simulation",
                    key: "target_fps",
                    reason: "must be positive".into(),
                });
            }
            self.target_fps = fps;
        }
        if let Some(steps) = read_uint(ini, "simulation", "max_steps")? {
            if steps == 0 {
                return Err(ConfigError::InvalidValue {
                    section: "simulation",
                    key: "max_steps",
                    reason: "must be at least 1".into(),
                });
            }
            self.max_steps = steps;
        }
        if let Some(delta) = read_float(ini, "simulation", "max_frame_delta")? {
            self.max_frame_delta = delta.max(0.0);
        }
        if let Some(scale) = read_float(ini, "simulation", "time_scale")? {
            self.time_scale = scale.max(0.0);
        }

        // [movement]
        let movement_keys: [(&'static str, &mut f32); 9] = [
            ("settle_epsilon", &mut self.settle_epsilon),
            ("seek_gain", &mut self.seek_gain),
            ("seek_damping", &mut self.seek_damping),
            ("direction_gain", &mut self.direction_gain),
            ("direction_damping", &mut self.direction_damping),
            ("arrive_epsilon", &mut self.arrive_epsilon),
            ("max_acceleration", &mut self.max_acceleration),
            ("cruise_speed", &mut self.cruise_speed),
            ("jump_impulse", &mut self.jump_impulse),
        ];
        for (key, slot) in movement_keys {
            if let Some(value) = read_float(ini, "movement", key)? {
                *slot = value as f32;
            }
        }

        // [viewport]
        if let Some(width) = read_uint(ini, "viewport", "width")? {
            self.viewport_width = width;
        }
        if let Some(height) = read_uint(ini, "viewport", "height")? {
            self.viewport_height = height;
        }
        if let Some(wupp) = read_float(ini, "viewport", "world_units_per_pixel")? {
            if wupp <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    section: "viewport",
                    key: "world_units_per_pixel",
                    reason: "must be positive".into(),
                });
            }
            self.world_units_per_pixel = wupp as f32;
        }

        // [input]
        if let Some(path) = ini.get("input", "bindings") {
            self.bindings_path = Some(PathBuf::from(path));
        }
        Ok(())
    }

    /// Save the current values to `config_path`.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), ConfigError> {
        self.save_to(&self.config_path)
    }

    /// Save the current values to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.set("simulation", "target_fps", Some(self.target_fps.to_string()));
        ini.set("simulation", "max_steps", Some(self.max_steps.to_string()));
        ini.set(
            "simulation",
            "max_frame_delta",
            Some(self.max_frame_delta.to_string()),
        );
        ini.set("simulation", "time_scale", Some(self.time_scale.to_string()));

        ini.set("movement", "settle_epsilon", Some(self.settle_epsilon.to_string()));
        ini.set("movement", "seek_gain", Some(self.seek_gain.to_string()));
        ini.set("movement", "seek_damping", Some(self.seek_damping.to_string()));
        ini.set("movement", "direction_gain", Some(self.direction_gain.to_string()));
        ini.set(
            "movement",
            "direction_damping",
            Some(self.direction_damping.to_string()),
        );
        ini.set("movement", "arrive_epsilon", Some(self.arrive_epsilon.to_string()));
        ini.set(
            "movement",
            "max_acceleration",
            Some(self.max_acceleration.to_string()),
        );
        ini.set("movement", "cruise_speed", Some(self.cruise_speed.to_string()));
        ini.set("movement", "jump_impulse", Some(self.jump_impulse.to_string()));

        ini.set("viewport", "width", Some(self.viewport_width.to_string()));
        ini.set("viewport", "height", Some(self.viewport_height.to_string()));
        ini.set(
            "viewport",
            "world_units_per_pixel",
            Some(self.world_units_per_pixel.to_string()),
        );

        if let Some(bindings) = &self.bindings_path {
            ini.set("input", "bindings", Some(bindings.display().to_string()));
        }

        ini.write(path).map_err(|source| ConfigError::Save {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Saved config to {:?}", path);
        Ok(())
    }
}

fn read_uint(
    ini: &Ini,
    section: &'static str,
    key: &'static str,
) -> Result<Option<u32>, ConfigError> {
    ini.getuint(section, key)
        .map_err(|reason| ConfigError::InvalidValue {
            section,
            key,
            reason,
        })?
        .map(|value| {
            u32::try_from(value).map_err(|_| ConfigError::InvalidValue {
                section,
                key,
                reason: format!("{value} is out of range"),
            })
        })
        .transpose()
}

fn read_float(
    ini: &Ini,
    section: &'static str,
    key: &'static str,
) -> Result<Option<f64>, ConfigError> {
    ini.getfloat(section, key)
        .map_err(|reason| ConfigError::InvalidValue {
            section,
            key,
            reason,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SimConfig::default();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.max_steps, 5);
        assert!((config.tick_duration() - 1.0 / 60.0).abs() < 1e-12);
        assert!(config.bindings_path.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut config = SimConfig::new();
        config
            .load_from_str("[simulation]\ntarget_fps = 30\n\n[movement]\ncruise_speed = 2.5\n")
            .unwrap();
        assert_eq!(config.target_fps, 30);
        assert_eq!(config.cruise_speed, 2.5);
        assert_eq!(config.max_steps, 5);
        assert_eq!(config.viewport_width, 640);
    }

    #[test]
    fn test_zero_fps_rejected() {
        let mut config = SimConfig::new();
        let err = config
            .load_from_str("[simulation]\ntarget_fps = 0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "target_fps",
                ..
            }
        ));
        assert_eq!(config.target_fps, 60);
    }

    #[test]
    fn test_zero_step_cap_rejected() {
        let mut config = SimConfig::new();
        let err = config
            .load_from_str("[simulation]\nmax_steps = 0\n")
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue {
                key: "max_steps",
                ..
            }
        ));
        assert_eq!(config.max_steps, 5);
    }

    #[test]
    fn test_unparsable_number_rejected() {
        let mut config = SimConfig::new();
        let err = config
            .load_from_str("[movement]\nseek_gain = fast\n")
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key: "seek_gain", .. }));
    }

    #[test]
    fn test_bindings_path_read() {
        let mut config = SimConfig::new();
        config
            .load_from_str("[input]\nbindings = ./assets/bindings.json\n")
            .unwrap();
        assert_eq!(
            config.bindings_path,
            Some(PathBuf::from("./assets/bindings.json"))
        );
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let mut config = SimConfig::with_path("./definitely/not/here.ini");
        assert!(matches!(
            config.load_from_file(),
            Err(ConfigError::Load { .. })
        ));
    }
}
