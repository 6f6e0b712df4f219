//! The global timeline — quantized merge target for every resolved action.
//!
//! Absolute times are snapped to the step derived from the configured
//! maximum actions per second. Per LED and quantized instant, the first
//! writer wins: earlier playback entries are never overwritten by later
//! ones.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::led::Rgb;

/// Default maximum actions per second (one frame every 10 ms).
pub const DEFAULT_MAX_APS: u32 = 100;

/// Colors keyed by LED index at a single instant.
pub type LedMap = BTreeMap<u16, Rgb>;

/// A single action's schedule: relative time in ms → per-LED colors.
pub type LocalSchedule = BTreeMap<u64, LedMap>;

/// The compiled schedule: quantized absolute time → per-LED colors.
#[derive(Debug, Clone, Serialize)]
pub struct Timeline {
    step_ms: u64,
    schedule: BTreeMap<u64, LedMap>,
}

impl Timeline {
    /// Create an empty timeline stepping at `round(1000 / max_aps)` ms.
    pub fn new(max_aps: u32) -> Self {
        let step_ms = (1000.0 / max_aps.max(1) as f64).round().max(1.0) as u64;
        Self {
            step_ms,
            schedule: BTreeMap::new(),
        }
    }

    /// The quantization step in milliseconds.
    pub fn step_ms(&self) -> u64 {
        self.step_ms
    }

    /// Snap an absolute time to the nearest multiple of the step.
    /// Ties resolve to the lower multiple; exact multiples are unchanged.
    pub fn quantize(&self, time_ms: u64) -> u64 {
        let rem = time_ms % self.step_ms;
        if rem == 0 {
            return time_ms;
        }
        let less = time_ms - rem;
        let more = less + self.step_ms;
        if time_ms - less <= more - time_ms {
            less
        } else {
            more
        }
    }

    /// Merge a local schedule at an absolute start time.
    ///
    /// Every key of `local` is shifted by `timestamp_ms`, quantized, and
    /// merged per LED: an LED already assigned at that instant keeps its
    /// existing color.
    pub fn add_action(&mut self, timestamp_ms: u64, local: &LocalSchedule) {
        for (&rel, leds) in local {
            let at = self.quantize(timestamp_ms + rel);
            let slot = self.schedule.entry(at).or_default();
            for (&led, &color) in leds {
                slot.entry(led).or_insert(color);
            }
        }
    }

    /// The full quantized schedule.
    pub fn schedule(&self) -> &BTreeMap<u64, LedMap> {
        &self.schedule
    }

    /// Number of scheduled instants.
    pub fn len(&self) -> usize {
        self.schedule.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schedule.is_empty()
    }

    /// First and last scheduled instant, if any.
    pub fn span(&self) -> Option<(u64, u64)> {
        let first = self.schedule.keys().next()?;
        let last = self.schedule.keys().next_back()?;
        Some((*first, *last))
    }
}
