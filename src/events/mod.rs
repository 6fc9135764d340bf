//! Event types exchanged between systems.
//!
//! Submodules:
//! - [`command`] – tick-stamped commands produced by the input mapper and
//!   consumed by the command dispatcher
pub mod command;
