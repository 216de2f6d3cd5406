use serde::{Deserialize, Serialize};

use crate::engine::drive::PlayResult;
use crate::error::ConfigError;

/// Scoring, field conventions and game clock.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    pub touchdown_points: u16,
    pub safety_points: u16,
    /// Receiving team's starting yard line after a score or at a half
    pub kickoff_yard_line: u8,
    /// Starting yard line after an interception in the end zone
    pub touchback_yard_line: u8,
    /// Yards needed for a new set of downs
    pub first_down_yds: u8,
    /// Regulation quarter length (s)
    pub quarter_secs: u32,
    /// Sudden-death overtime length (s)
    pub overtime_secs: u32,
    pub runoff: ClockRunoff,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            touchdown_points: 6,
            safety_points: 2,
            kickoff_yard_line: 25,
            touchback_yard_line: 20,
            first_down_yds: 10,
            quarter_secs: 180,
            overtime_secs: 120,
            runoff: ClockRunoff::default(),
        }
    }
}

/// Game-clock seconds consumed by each kind of play.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockRunoff {
    pub touchdown: u32,
    pub first_down: u32,
    pub complete: u32,
    pub incomplete: u32,
    pub sack: u32,
    pub interception: u32,
    pub safety: u32,
}

impl Default for ClockRunoff {
    fn default() -> Self {
        Self {
            touchdown: 8,
            first_down: 20,
            complete: 25,
            incomplete: 5,
            sack: 30,
            interception: 8,
            safety: 8,
        }
    }
}

impl ClockRunoff {
    pub fn for_result(&self, result: PlayResult) -> u32 {
        match result {
            PlayResult::Touchdown => self.touchdown,
            PlayResult::FirstDown => self.first_down,
            PlayResult::Complete => self.complete,
            PlayResult::Incomplete => self.incomplete,
            PlayResult::Sack => self.sack,
            PlayResult::Interception => self.interception,
            PlayResult::Safety => self.safety,
        }
    }
}

impl LedgerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("ledger.kickoff_yard_line", self.kickoff_yard_line),
            ("ledger.touchback_yard_line", self.touchback_yard_line),
        ] {
            if !(1..=99).contains(&value) {
                return Err(ConfigError::OutOfRange {
                    field,
                    value: value as f32,
                    min: 1.0,
                    max: 99.0,
                });
            }
        }
        if self.first_down_yds == 0 {
            return Err(ConfigError::NonPositive { field: "ledger.first_down_yds", value: 0.0 });
        }
        if self.quarter_secs == 0 {
            return Err(ConfigError::NonPositive { field: "ledger.quarter_secs", value: 0.0 });
        }
        if self.overtime_secs == 0 {
            return Err(ConfigError::NonPositive { field: "ledger.overtime_secs", value: 0.0 });
        }
        Ok(())
    }
}
