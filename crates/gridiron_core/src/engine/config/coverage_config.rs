use serde::{Deserialize, Serialize};

use crate::engine::types::FieldPoint;
use crate::error::ConfigError;

/// Receiver route pacing and catch reach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Seconds from snap for a receiver to finish its route (progress 0 → 1)
    pub route_secs: f32,
    /// Receiver-to-ball distance inside which a catch can be made (yards)
    pub catch_radius_yds: f32,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self { route_secs: 3.0, catch_radius_yds: 2.5 }
    }
}

impl RouteConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.route_secs <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "routes.route_secs",
                value: self.route_secs,
            });
        }
        if self.catch_radius_yds <= 0.0 || !self.catch_radius_yds.is_finite() {
            return Err(ConfigError::NonPositive {
                field: "routes.catch_radius_yds",
                value: self.catch_radius_yds,
            });
        }
        Ok(())
    }
}

/// Defender behaviour tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoverageConfig {
    /// Man defender lag behind its receiver (s). Always > 0.
    pub man_reaction_secs: f32,
    /// Man defender cushion relative to the receiver (yards)
    pub man_offset: FieldPoint,
    /// Time for a zone defender to reach its landmark (s)
    pub zone_drop_secs: f32,
    /// Delay between ball release and a zone defender breaking on it (s)
    pub zone_reaction_secs: f32,
    /// Zone defender closing speed after the break (yd/s)
    pub defender_speed_yps: f32,
    /// Blitzer hesitation after the snap (s)
    pub blitz_delay_secs: f32,
    /// Blitzer rush speed (yd/s)
    pub blitz_speed_yps: f32,
    /// Blitzer-to-quarterback distance that counts as a sack (yards)
    pub tackle_radius_yds: f32,
    /// Defender-to-ball distance that counts as a contested catch (yards)
    pub contest_radius_yds: f32,
    /// Highest arc a defender can get a hand on (yards)
    pub defender_reach_yds: f32,
}

impl Default for CoverageConfig {
    fn default() -> Self {
        Self {
            man_reaction_secs: 0.35,
            man_offset: FieldPoint::new(0.8, 1.2),
            zone_drop_secs: 1.2,
            zone_reaction_secs: 0.4,
            defender_speed_yps: 6.5,
            blitz_delay_secs: 0.4,
            blitz_speed_yps: 4.2,
            tackle_radius_yds: 1.0,
            contest_radius_yds: 2.0,
            defender_reach_yds: 3.0,
        }
    }
}

impl CoverageConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("coverage.man_reaction_secs", self.man_reaction_secs),
            ("coverage.zone_drop_secs", self.zone_drop_secs),
            ("coverage.defender_speed_yps", self.defender_speed_yps),
            ("coverage.blitz_speed_yps", self.blitz_speed_yps),
            ("coverage.tackle_radius_yds", self.tackle_radius_yds),
            ("coverage.contest_radius_yds", self.contest_radius_yds),
        ];
        for (field, value) in positive {
            if value <= 0.0 || !value.is_finite() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if self.zone_reaction_secs < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "coverage.zone_reaction_secs",
                value: self.zone_reaction_secs,
            });
        }
        if self.blitz_delay_secs < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "coverage.blitz_delay_secs",
                value: self.blitz_delay_secs,
            });
        }
        Ok(())
    }
}
