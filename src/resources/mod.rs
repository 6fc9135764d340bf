//! Long-lived simulation state shared by the systems.
//!
//! Overview
//! - `bindings` – input binding table (digital, analog, axis, pointer)
//! - `commandqueue` – per-controller queues of tick-stamped commands
//! - `input` – raw input buffers, held set and spam-suppression memory
//! - `simclock` – fixed-step clock counters
//! - `simconfig` – tunables loaded from an INI file
//! - `viewport` – screen/world mapping and pixel-size arrival floor
pub mod bindings;
pub mod commandqueue;
pub mod input;
pub mod simclock;
pub mod simconfig;
pub mod viewport;
