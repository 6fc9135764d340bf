//! Simulation systems.
//!
//! Free functions over the component store and the resources they need. A
//! frame runs the clock pre-step and input mapping once, then each fixed step
//! runs the remaining systems in the order listed here.
//!
//! Submodules overview
//! - [`time`] – fixed-step clock pre/sim/post steps
//! - [`input`] – map raw input into tick-stamped commands
//! - [`dispatch`] – hand eligible commands to controlled entities
//! - [`exertion`] – turn movement intents into desired acceleration
//! - [`physics`] – force terms, impulses, drag and velocity integration
//! - [`movement`] – position commit, teleports and seek arrival

pub mod dispatch;
pub mod exertion;
pub mod input;
pub mod movement;
pub mod physics;
pub mod time;
