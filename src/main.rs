//! drift2d headless harness.
//!
//! Builds a [`Simulation`] from an INI config, spawns one controlled entity
//! and feeds it a scripted input timeline while stepping frames at a fixed
//! display delta. Useful to eyeball the fixed-step schedule and the movement
//! pipeline without a renderer.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --frames 240 --stall-frame 90
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use glam::Vec2;
use log::{error, info, warn};

use drift2d::Simulation;
use drift2d::components::{
    Exertion, ForceTerm, Group, InputControlled, MoveState, MovementStats, RigidBody, Sprite,
    Transform2D,
};
use drift2d::events::command::ControllerId;
use drift2d::resources::input::{PointerEvent, PointerKind, PointerPhase};
use drift2d::resources::simconfig::{ConfigError, SimConfig};

/// drift2d simulation harness
#[derive(Parser)]
#[command(
    version,
    about = "Runs the drift2d simulation core headless with a scripted input timeline."
)]
struct Cli {
    /// INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// JSON binding table; overrides the one named in the config.
    #[arg(long, value_name = "PATH")]
    bindings: Option<PathBuf>,

    /// Number of display frames to run.
    #[arg(long, default_value_t = 300)]
    frames: u32,

    /// Display frame delta in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    frame_dt: f64,

    /// Frame that simulates a one second stall.
    #[arg(long, value_name = "FRAME")]
    stall_frame: Option<u32>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = SimConfig::with_path(&cli.config);
    match config.load_from_file() {
        Ok(()) => {}
        Err(ConfigError::Load { path, reason }) => {
            warn!("Using default config ({path:?} not loaded: {reason})");
        }
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    }
    if let Some(bindings) = cli.bindings {
        config.bindings_path = Some(bindings);
    }

    let mut sim = match Simulation::with_configured_bindings(config) {
        Ok(sim) => sim,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let mut body = RigidBody::with_physics(1.0, 0.5, Some(20.0)).with_surface_drag(1.5, 4.0);
    body.add_force(
        ForceTerm::acceleration("breeze", Vec2::new(0.5, 0.0)).with_exponential_decay(2.0),
    );
    let player = match sim.store.spawn([
        Transform2D::new(0.0, 0.0).into(),
        body.into(),
        MoveState::default().into(),
        Exertion::default().into(),
        MovementStats::new(Some(12.0), sim.config.cruise_speed, sim.config.jump_impulse).into(),
        InputControlled::new(ControllerId(0)).into(),
        Sprite::new("player", 16.0, 16.0).with_z_index(1).into(),
        Group::new("player").into(),
    ]) {
        Ok(entity) => entity,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!("Spawned {player} with {} components", sim.store.siblings(player).map_or(0, |s| s.len()));

    // seek target ten world units right of the centre
    let seek_point = sim.viewport.world_to_screen(Vec2::new(10.0, 0.0));

    for frame in 0..cli.frames {
        let timestamp = frame as f64 * cli.frame_dt;
        match frame {
            10 => sim.push_pointer_event(PointerEvent {
                id: 1,
                kind: PointerKind::Mouse,
                phase: PointerPhase::Began,
                location: seek_point,
            }),
            150 => sim.push_digital_edge("w", true, timestamp),
            200 => sim.push_digital_edge("w", false, timestamp),
            220 => sim.push_digital_edge("space", true, timestamp),
            221 => sim.push_digital_edge("space", false, timestamp),
            260 => sim.push_digital_edge("escape", true, timestamp),
            261 => sim.push_digital_edge("escape", false, timestamp),
            _ => {}
        }

        let raw_dt = if cli.stall_frame == Some(frame) {
            warn!("frame {frame}: simulating a 1s stall");
            1.0
        } else {
            cli.frame_dt
        };
        let report = sim.on_frame(raw_dt);

        let verbose = frame % 30 == 0 || report.steps > 1 || cli.stall_frame == Some(frame);
        if verbose {
            info!(
                "frame {frame}: {} step(s), {}, alpha {:.3}, lag {:.4}s",
                report.steps, report.tick, report.alpha, report.lag
            );
            for (entity, pose) in sim.poses() {
                info!(
                    "  {entity}: position ({:.3}, {:.3}) rotation {:.3}",
                    pose.position.x, pose.position.y, pose.rotation
                );
            }
        }
    }

    if let Some(state) = sim.store.get::<MoveState>(player) {
        info!(
            "Finished at {} with velocity ({:.3}, {:.3}), settled={}",
            sim.clock.tick, state.velocity.x, state.velocity.y, state.settled
        );
    }
    if let Err(e) = sim.store.check_integrity() {
        error!("{e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
