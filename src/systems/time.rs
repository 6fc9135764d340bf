//! Fixed-step clock update.
//!
//! A frame runs [`clock_pre_step`] once, [`clock_sim_step`] once per scheduled
//! step, then [`clock_post_step`]. Stepping never skips owed time: when the
//! step cap is hit the remaining lag is carried into the next frame.
use log::debug;

use crate::resources::simclock::SimClock;

/// Slack on `lag / tick_duration` so rounding never loses a step that is owed exactly.
const STEP_TOLERANCE: f64 = 1e-9;

/// Accumulate the frame delta and schedule this frame's steps.
///
/// `raw_dt` is the unscaled wall-clock delta in seconds. It is scaled by
/// `time_scale`, then clamped to `[0, max_frame_delta]`. Returns the number of
/// steps to run.
pub fn clock_pre_step(clock: &mut SimClock, raw_dt: f64) -> u32 {
    clock.frame_count += 1;
    let scaled = raw_dt * clock.time_scale;
    let dt = if scaled.is_finite() {
        scaled.clamp(0.0, clock.max_frame_delta)
    } else {
        0.0
    };
    if dt < scaled {
        debug!(
            "frame delta {:.4}s clamped to {:.4}s",
            scaled, clock.max_frame_delta
        );
    }
    clock.lag += dt;

    clock.steps_this_frame = if clock.tick_duration > 0.0 {
        let owed = (clock.lag / clock.tick_duration + STEP_TOLERANCE).floor();
        (owed as u64).min(clock.max_steps as u64) as u32
    } else {
        0
    };
    clock.steps_this_frame
}

/// Consume one tick of lag and advance the tick index.
pub fn clock_sim_step(clock: &mut SimClock) {
    clock.lag = (clock.lag - clock.tick_duration).max(0.0);
    clock.tick = clock.tick.next();
    clock.now = clock.tick.0 as f64 * clock.tick_duration;
}

/// Compute the render interpolation factor from the remaining lag.
pub fn clock_post_step(clock: &mut SimClock) {
    clock.alpha = if clock.tick_duration > 0.0 {
        (clock.lag / clock.tick_duration).clamp(0.0, 1.0) as f32
    } else {
        0.0
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::command::Tick;

    const EPSILON: f64 = 1e-9;

    fn run_frame(clock: &mut SimClock, raw_dt: f64) -> u32 {
        let steps = clock_pre_step(clock, raw_dt);
        for _ in 0..steps {
            clock_sim_step(clock);
        }
        clock_post_step(clock);
        steps
    }

    #[test]
    fn test_one_frame_one_step() {
        let mut clock = SimClock::new(60, 5);
        let steps = run_frame(&mut clock, 1.0 / 60.0);
        assert_eq!(steps, 1);
        assert_eq!(clock.tick, Tick(1));
        assert!((clock.now - 1.0 / 60.0).abs() < EPSILON);
        assert!(clock.lag < EPSILON);
    }

    #[test]
    fn test_stall_is_capped_and_lag_retained() {
        let mut clock = SimClock::new(60, 5);
        let steps = run_frame(&mut clock, 1.0);
        assert_eq!(steps, 5);
        assert_eq!(clock.tick, Tick(5));
        // 0.25 - 5/60
        assert!((clock.lag - (0.25 - 5.0 / 60.0)).abs() < 1e-6);
        assert_eq!(clock.alpha, 1.0);

        // the retained lag is paid down on the next frames
        assert_eq!(run_frame(&mut clock, 0.0), 5);
        assert_eq!(run_frame(&mut clock, 0.0), 5);
        assert_eq!(run_frame(&mut clock, 0.0), 0);
        assert_eq!(clock.tick, Tick(15));
        assert!(clock.lag < 1e-6);
    }

    #[test]
    fn test_small_frames_accumulate() {
        let mut clock = SimClock::new(60, 5);
        assert_eq!(run_frame(&mut clock, 1.0 / 120.0), 0);
        assert!((clock.alpha - 0.5).abs() < 1e-6);
        assert_eq!(run_frame(&mut clock, 1.0 / 120.0), 1);
        assert_eq!(clock.tick, Tick(1));
    }

    #[test]
    fn test_time_scale_and_negative_delta() {
        let mut clock = SimClock::new(60, 5);
        clock.time_scale = 0.0;
        assert_eq!(run_frame(&mut clock, 1.0), 0);
        clock.time_scale = 1.0;
        assert_eq!(run_frame(&mut clock, -1.0), 0);
        assert_eq!(clock.lag, 0.0);
    }

    #[test]
    fn test_zero_step_cap_still_advances() {
        let mut clock = SimClock::new(60, 0);
        assert_eq!(clock.max_steps, 1);
        for _ in 0..600 {
            run_frame(&mut clock, 1.0 / 60.0);
        }
        assert_eq!(clock.tick, Tick(600));
        assert!(clock.lag < 1e-6);
    }

    #[test]
    fn test_zero_tick_duration_never_steps() {
        let mut clock = SimClock::new(0, 5);
        assert_eq!(run_frame(&mut clock, 0.1), 0);
        assert_eq!(clock.alpha, 0.0);
    }
}
