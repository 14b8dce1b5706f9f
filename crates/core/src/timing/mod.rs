use serde::{Deserialize, Serialize};

/// Segment durations in seconds derived from a words-per-minute speed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedTimings {
    /// Dot tone and the gap between symbols of one character.
    pub dot: f64,
    /// Dash tone and the gap after the last symbol of a character.
    pub dash: f64,
    /// Silence emitted for a word space.
    pub space: f64,
}

impl DerivedTimings {
    /// Derives the timings for `wpm`. The speed is not validated; callers
    /// must pass a positive value.
    pub fn from_wpm(wpm: f64) -> Self {
        Self {
            dot: 1.2 / wpm,
            dash: 3.6 / wpm,
            space: 12.0 / wpm,
        }
    }
}
