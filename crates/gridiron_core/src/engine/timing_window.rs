//! Timing Window Evaluator
//!
//! Maps ball-flight progress at the moment of a catch (or interception)
//! attempt to a discrete quality. The bands come from `TimingWindows` and
//! partition `[0, 1]` exactly: every progress value lands in one band.

use serde::{Deserialize, Serialize};

use super::config::TimingWindows;
use super::contracts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimingQuality {
    Perfect,
    Good,
    Late,
    Miss,
}

impl TimingQuality {
    /// Anything but a miss puts the ball in the receiver's hands.
    pub fn is_success(&self) -> bool {
        !matches!(self, TimingQuality::Miss)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimingQuality::Perfect => "PERFECT",
            TimingQuality::Good => "GOOD",
            TimingQuality::Late => "LATE",
            TimingQuality::Miss => "MISS",
        }
    }
}

/// Classify flight progress `p ∈ [0, 1]`.
pub fn classify(windows: &TimingWindows, p: f32) -> TimingQuality {
    contracts::check_progress(p, "catch");

    if p < windows.good_start {
        TimingQuality::Miss
    } else if p < windows.perfect_start {
        TimingQuality::Good
    } else if p < windows.perfect_end {
        TimingQuality::Perfect
    } else if p <= windows.late_end {
        TimingQuality::Late
    } else {
        TimingQuality::Miss
    }
}
