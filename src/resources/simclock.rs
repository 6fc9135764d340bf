//! Fixed-step simulation clock.
//!
//! The clock decouples simulation from display refresh: each frame adds its
//! (scaled, clamped) delta to a lag accumulator and the simulation runs as many
//! whole ticks as the lag covers, up to `max_steps`. Lag beyond the cap is
//! kept and paid down on later frames. See [`crate::systems::time`] for the
//! pre/sim/post step functions that drive it.

use crate::events::command::Tick;
use crate::resources::simconfig::SimConfig;

/// Running counters of the fixed-step scheduler.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimClock {
    /// Seconds per tick; 0 disables stepping.
    pub tick_duration: f64,
    /// Index of the last completed tick.
    pub tick: Tick,
    /// Unsimulated time carried between frames, in seconds.
    pub lag: f64,
    /// Steps scheduled by the last pre-step.
    pub steps_this_frame: u32,
    /// Cap on steps per frame.
    pub max_steps: u32,
    /// Ceiling on a single frame delta, in seconds.
    pub max_frame_delta: f64,
    /// Multiplier applied to raw frame deltas.
    pub time_scale: f64,
    /// Quantized simulation time: `tick * tick_duration`.
    pub now: f64,
    /// Render blend factor between the previous and current pose.
    pub alpha: f32,
    /// Frames seen.
    pub frame_count: u64,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::from_config(&SimConfig::default())
    }
}

impl SimClock {
    /// Clock ticking `target_fps` times per second.
    ///
    /// The step cap is at least 1 so a frame that owes ticks always makes
    /// progress.
    pub fn new(target_fps: u32, max_steps: u32) -> Self {
        Self {
            tick_duration: if target_fps == 0 {
                0.0
            } else {
                1.0 / target_fps as f64
            },
            tick: Tick::default(),
            lag: 0.0,
            steps_this_frame: 0,
            max_steps: max_steps.max(1),
            max_frame_delta: 0.25,
            time_scale: 1.0,
            now: 0.0,
            alpha: 0.0,
            frame_count: 0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        Self {
            max_frame_delta: config.max_frame_delta,
            time_scale: config.time_scale,
            ..Self::new(config.target_fps, config.max_steps)
        }
    }

    /// Set the tick index directly, e.g. to resume a recorded session.
    pub fn set_tick(&mut self, tick: Tick) {
        self.tick = tick;
        self.now = tick.0 as f64 * self.tick_duration;
    }
}
