//! LED selectors — resolved sets of target LED indices.
//!
//! Indices are 1-based and always within `1..=MAX_LED`. Every variant
//! computes its index set eagerly at construction; the set is immutable
//! afterwards.

/// Highest addressable LED index.
pub const MAX_LED: u16 = 300;

/// A resolved, ordered set of target LED indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    indices: Vec<u16>,
}

impl Selector {
    /// Every LED on the strip.
    pub fn all() -> Self {
        Self {
            indices: (1..=MAX_LED).collect(),
        }
    }

    /// The inclusive range `start..=end`, clamped to `1..=MAX_LED`.
    /// An inverted range yields an empty selection.
    pub fn range(start: i64, end: i64) -> Self {
        let lo = start.max(1);
        let hi = end.min(MAX_LED as i64);
        let indices = if lo <= hi {
            (lo..=hi).map(|i| i as u16).collect()
        } else {
            Vec::new()
        };
        Self { indices }
    }

    /// An explicit index list. Out-of-range entries are dropped.
    pub fn id_list(ids: impl IntoIterator<Item = i64>) -> Self {
        let indices = ids
            .into_iter()
            .filter(|&i| (1..=MAX_LED as i64).contains(&i))
            .map(|i| i as u16)
            .collect();
        Self { indices }
    }

    /// A repeating on/off pattern: runs of `run` LEDs starting at `start`,
    /// one run every `pitch` LEDs, until the next run would start beyond
    /// `MAX_LED`. The final run is truncated at the strip boundary.
    ///
    /// `run` and `pitch` must be at least 1 (the caller validates);
    /// anything less yields an empty selection.
    pub fn checker(start: i64, run: i64, pitch: i64) -> Self {
        let mut indices = Vec::new();
        if run >= 1 && pitch >= 1 {
            let mut s = start;
            if s + run <= 1 {
                // Skip runs that lie entirely below the first LED.
                let gap = 1 - (s + run - 1);
                s += ((gap + pitch - 1) / pitch) * pitch;
            }
            while s <= MAX_LED as i64 {
                for i in s..s + run {
                    if (1..=MAX_LED as i64).contains(&i) {
                        indices.push(i as u16);
                    }
                }
                s += pitch;
            }
        }
        Self { indices }
    }

    /// The resolved index set, in order.
    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}
