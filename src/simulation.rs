//! Simulation context.
//!
//! [`Simulation`] owns the component store and every resource of one running
//! simulation and drives them once per display frame through
//! [`Simulation::on_frame`]. Several simulations can live side by side; none
//! of them share state.
//!
//! Per frame:
//! 1. clock pre-step (scale, clamp, accumulate, schedule steps)
//! 2. input mapping, stamped with the current tick
//! 3. for each scheduled step: tick advance, command dispatch, exertion,
//!    physics, movement commit
//! 4. clock post-step (interpolation alpha)
use std::path::Path;

use log::{debug, info};

use crate::components::transform::{Pose, Transform2D};
use crate::events::command::Tick;
use crate::resources::bindings::{BindingError, BindingTable};
use crate::resources::commandqueue::CommandQueue;
use crate::resources::input::{InputId, InputState, PointerEvent};
use crate::resources::simclock::SimClock;
use crate::resources::simconfig::SimConfig;
use crate::resources::viewport::Viewport;
use crate::store::{ComponentStore, Entity};
use crate::systems::dispatch::dispatch_commands;
use crate::systems::exertion::exertion_controller;
use crate::systems::input::map_input;
use crate::systems::movement::commit_movement;
use crate::systems::physics::integrate_physics;
use crate::systems::time::{clock_post_step, clock_pre_step, clock_sim_step};

/// Outcome of one [`Simulation::on_frame`] call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameReport {
    /// Fixed steps run this frame.
    pub steps: u32,
    /// Tick index after the frame.
    pub tick: Tick,
    /// Render interpolation factor in `[0, 1]`.
    pub alpha: f32,
    /// Lag carried into the next frame, in seconds.
    pub lag: f64,
}

/// One running simulation.
pub struct Simulation {
    pub store: ComponentStore,
    pub clock: SimClock,
    pub input: InputState,
    pub bindings: BindingTable,
    pub commands: CommandQueue,
    pub viewport: Viewport,
    pub config: SimConfig,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

impl Simulation {
    /// Build a simulation from `config` with the default binding table.
    pub fn new(config: SimConfig) -> Self {
        Self {
            store: ComponentStore::new(),
            clock: SimClock::from_config(&config),
            input: InputState::default(),
            bindings: BindingTable::default(),
            commands: CommandQueue::default(),
            viewport: Viewport::new(
                config.viewport_width,
                config.viewport_height,
                config.world_units_per_pixel,
            ),
            config,
        }
    }

    /// Build a simulation and load the binding table named by the config, if any.
    pub fn with_configured_bindings(config: SimConfig) -> Result<Self, BindingError> {
        let mut sim = Self::new(config);
        if let Some(path) = sim.config.bindings_path.clone() {
            sim.load_bindings(path)?;
        }
        Ok(sim)
    }

    /// Advance by one display frame of `raw_dt` seconds.
    pub fn on_frame(&mut self, raw_dt: f64) -> FrameReport {
        let steps = clock_pre_step(&mut self.clock, raw_dt);
        let mapped = map_input(
            &mut self.input,
            &self.bindings,
            &mut self.commands,
            self.clock.tick,
        );
        if mapped > 0 {
            debug!("mapped {} command(s) at {}", mapped, self.clock.tick);
        }
        for _ in 0..steps {
            self.step();
        }
        clock_post_step(&mut self.clock);
        FrameReport {
            steps,
            tick: self.clock.tick,
            alpha: self.clock.alpha,
            lag: self.clock.lag,
        }
    }

    /// Run one fixed step. Normally called by [`Simulation::on_frame`].
    pub fn step(&mut self) {
        clock_sim_step(&mut self.clock);
        let dt = self.clock.tick_duration as f32;
        dispatch_commands(
            &mut self.store,
            &mut self.commands,
            self.clock.tick,
            &self.viewport,
            &self.config,
        );
        exertion_controller(&mut self.store, self.config.settle_epsilon);
        integrate_physics(&mut self.store, dt);
        commit_movement(
            &mut self.store,
            self.viewport.pixel_floor(),
            self.config.settle_epsilon,
            dt,
        );
    }

    pub fn push_digital_edge(&mut self, input: impl Into<InputId>, is_down: bool, timestamp: f64) {
        self.input.push_digital_edge(input, is_down, timestamp);
    }

    pub fn push_pointer_event(&mut self, event: PointerEvent) {
        self.input.push_pointer_event(event);
    }

    pub fn set_analog(&mut self, input: impl Into<InputId>, value: f32) {
        self.input.set_analog(input, value);
    }

    /// Swap the binding table. Spam-suppression memory is reset because slot
    /// indices refer to the old table.
    pub fn set_bindings(&mut self, bindings: BindingTable) {
        self.bindings = bindings;
        self.input.reset_reports();
        info!("binding table replaced ({} bindings)", self.bindings.len());
    }

    pub fn load_bindings(&mut self, path: impl AsRef<Path>) -> Result<(), BindingError> {
        let table = BindingTable::load_from_file(path)?;
        self.set_bindings(table);
        Ok(())
    }

    /// Interpolated pose of every entity with a transform, sorted by entity.
    pub fn poses(&self) -> Vec<(Entity, Pose)> {
        let alpha = self.clock.alpha;
        let mut poses: Vec<(Entity, Pose)> = self
            .store
            .query::<Transform2D>()
            .map(|(entity, transform)| (entity, transform.interpolated(alpha)))
            .collect();
        poses.sort_unstable_by_key(|(entity, _)| *entity);
        poses
    }
}
