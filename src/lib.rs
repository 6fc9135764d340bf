//! drift2d library.
//!
//! Deterministic simulation core of a 2D real-time engine: a component store
//! with per-entity sibling sets, a fixed-step clock, input-to-command mapping
//! and a movement pipeline (exertion, physics, commit). Rendering, assets and
//! platform input capture live outside this crate; they feed raw input and
//! frame deltas in and read interpolated poses out.

pub mod components;
pub mod events;
pub mod resources;
pub mod simulation;
pub mod store;
pub mod systems;

pub use simulation::{FrameReport, Simulation};
