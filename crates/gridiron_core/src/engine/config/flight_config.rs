use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Ball flight tuning (yards / seconds).
///
/// None of these are derived from real physics; they are chosen so short
/// throws stay catchable and long throws fit inside the pocket budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightConfig {
    /// Average ball speed used to derive flight duration (yd/s)
    pub throw_speed_yps: f32,
    /// Floor on flight duration (s)
    pub min_flight_secs: f32,
    /// Ceiling on flight duration (s)
    pub max_flight_secs: f32,
    /// Peak arc height per yard of throw distance
    pub arc_per_yard: f32,
    /// Peak arc height cap (yards)
    pub arc_cap_yds: f32,
    /// Cosmetic spiral rate (revolutions per second of flight)
    pub spin_rps: f32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            throw_speed_yps: 22.0,
            min_flight_secs: 0.45,
            max_flight_secs: 1.6,
            arc_per_yard: 0.12,
            arc_cap_yds: 6.0,
            spin_rps: 10.0,
        }
    }
}

impl FlightConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.throw_speed_yps <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "flight.throw_speed_yps",
                value: self.throw_speed_yps,
            });
        }
        if self.min_flight_secs <= 0.0 {
            return Err(ConfigError::NonPositive {
                field: "flight.min_flight_secs",
                value: self.min_flight_secs,
            });
        }
        if self.min_flight_secs > self.max_flight_secs {
            return Err(ConfigError::InvertedRange {
                field: "flight.flight_secs",
                min: self.min_flight_secs,
                max: self.max_flight_secs,
            });
        }
        if self.arc_per_yard < 0.0 || self.arc_cap_yds < 0.0 {
            return Err(ConfigError::NonPositive {
                field: "flight.arc",
                value: self.arc_per_yard.min(self.arc_cap_yds),
            });
        }
        Ok(())
    }
}
