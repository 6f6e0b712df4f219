//! Quantized scheduling of resolved actions.

pub mod timeline;

pub use timeline::{LedMap, LocalSchedule, Timeline, DEFAULT_MAX_APS};
