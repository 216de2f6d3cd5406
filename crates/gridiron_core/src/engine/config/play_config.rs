use serde::{Deserialize, Serialize};

use crate::engine::timing_window::TimingQuality;
use crate::error::ConfigError;

/// Phase timings, pocket budget and catch yardage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayConfig {
    /// SNAP → DROPBACK (s)
    pub snap_secs: f32,
    /// DROPBACK → READ (s)
    pub dropback_secs: f32,
    /// THROW → BALL_FLIGHT (s)
    pub release_secs: f32,
    /// RESULT → next PRE_SNAP (s)
    pub settle_secs: f32,
    /// Pocket time at difficulty 0 (s, counted from the snap)
    pub pocket_base_secs: f32,
    /// Pocket seconds removed per unit of difficulty
    pub pocket_difficulty_scale: f32,
    /// Pocket never shrinks below this (s)
    pub pocket_min_secs: f32,
    /// Quarterback set point depth behind the line (yards)
    pub qb_drop_depth_yds: f32,
    /// Yardage lost on a sack
    pub sack_loss_yds: u8,
    /// Yards after catch by timing quality
    pub yac_perfect_yds: u8,
    pub yac_good_yds: u8,
    pub yac_late_yds: u8,
    /// Largest simulation step accepted by a single tick (s)
    pub max_tick_secs: f32,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            snap_secs: 0.3,
            dropback_secs: 0.9,
            release_secs: 0.25,
            settle_secs: 1.2,
            pocket_base_secs: 4.5,
            pocket_difficulty_scale: 0.75,
            pocket_min_secs: 2.5,
            qb_drop_depth_yds: 7.0,
            sack_loss_yds: 7,
            yac_perfect_yds: 4,
            yac_good_yds: 2,
            yac_late_yds: 0,
            max_tick_secs: 0.1,
        }
    }
}

impl PlayConfig {
    /// Pocket countdown for a difficulty scalar.
    pub fn pocket_secs(&self, difficulty: f32) -> f32 {
        (self.pocket_base_secs - difficulty.max(0.0) * self.pocket_difficulty_scale)
            .max(self.pocket_min_secs)
    }

    pub fn yards_after_catch(&self, quality: TimingQuality) -> u8 {
        match quality {
            TimingQuality::Perfect => self.yac_perfect_yds,
            TimingQuality::Good => self.yac_good_yds,
            TimingQuality::Late => self.yac_late_yds,
            TimingQuality::Miss => 0,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("play.snap_secs", self.snap_secs),
            ("play.dropback_secs", self.dropback_secs),
            ("play.release_secs", self.release_secs),
            ("play.pocket_min_secs", self.pocket_min_secs),
            ("play.max_tick_secs", self.max_tick_secs),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.settle_secs < 0.0 {
            return Err(ConfigError::NonPositive { field: "play.settle_secs", value: self.settle_secs });
        }
        if self.pocket_min_secs > self.pocket_base_secs {
            return Err(ConfigError::InvertedRange {
                field: "play.pocket_secs",
                min: self.pocket_min_secs,
                max: self.pocket_base_secs,
            });
        }
        if self.qb_drop_depth_yds < 0.0 || self.qb_drop_depth_yds > 15.0 {
            return Err(ConfigError::OutOfRange {
                field: "play.qb_drop_depth_yds",
                value: self.qb_drop_depth_yds,
                min: 0.0,
                max: 15.0,
            });
        }
        Ok(())
    }
}
