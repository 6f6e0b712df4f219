//! argbex — compiles ARGBEX lighting presets into a quantized per-LED
//! color schedule.

pub mod config;
pub mod dsl;
pub mod led;
pub mod media;
pub mod schedule;
