use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Catch timing bands over flight progress.
///
/// | Range | Quality |
/// |-------|---------|
/// | `[0, good_start)` | Miss |
/// | `[good_start, perfect_start)` | Good |
/// | `[perfect_start, perfect_end)` | Perfect |
/// | `[perfect_end, late_end]` | Late |
/// | `(late_end, 1]` | Miss |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimingWindows {
    pub good_start: f32,
    pub perfect_start: f32,
    pub perfect_end: f32,
    pub late_end: f32,
}

impl Default for TimingWindows {
    fn default() -> Self {
        Self { good_start: 0.40, perfect_start: 0.60, perfect_end: 0.85, late_end: 1.0 }
    }
}

impl TimingWindows {
    /// Wider bands for casual play.
    pub fn forgiving() -> Self {
        Self { good_start: 0.30, perfect_start: 0.50, perfect_end: 0.88, late_end: 1.0 }
    }

    /// Narrow perfect band, early misses and a dead zone at the very end.
    pub fn strict() -> Self {
        Self { good_start: 0.50, perfect_start: 0.68, perfect_end: 0.82, late_end: 0.96 }
    }

    /// Centre of the perfect band.
    pub fn perfect_center(&self) -> f32 {
        (self.perfect_start + self.perfect_end) / 2.0
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = [self.good_start, self.perfect_start, self.perfect_end, self.late_end];
        let ordered = 0.0 <= b[0] && b[0] < b[1] && b[1] < b[2] && b[2] <= b[3] && b[3] <= 1.0;
        if !ordered || b.iter().any(|v| !v.is_finite()) {
            return Err(ConfigError::TimingWindows(b));
        }
        Ok(())
    }
}
