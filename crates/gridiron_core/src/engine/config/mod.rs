//! # Simulation Configuration
//!
//! Every tuning constant of the play core lives here: flight timing, catch
//! windows, route pacing, defender behaviour, phase timings and the ledger's
//! scoring/clock conventions.
//!
//! ## Usage
//! ```rust
//! use gridiron_core::engine::config::SimConfig;
//!
//! let config = SimConfig::default();
//! let arcade = SimConfig::arcade();
//! assert!(arcade.validate().is_ok());
//! ```
//!
//! ## Environment Variables
//!
//! - `GRIDIRON_PROFILE`: Select preset (arcade, simulation, default)

mod coverage_config;
mod flight_config;
mod ledger_config;
mod play_config;
mod timing_config;

pub use coverage_config::{CoverageConfig, RouteConfig};
pub use flight_config::FlightConfig;
pub use ledger_config::{ClockRunoff, LedgerConfig};
pub use play_config::PlayConfig;
pub use timing_config::TimingWindows;

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::ConfigError;

/// Environment variable selecting a preset.
pub const PROFILE_ENV: &str = "GRIDIRON_PROFILE";

/// Complete simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimConfig {
    #[serde(default)]
    pub flight: FlightConfig,
    #[serde(default)]
    pub timing: TimingWindows,
    #[serde(default)]
    pub routes: RouteConfig,
    #[serde(default)]
    pub coverage: CoverageConfig,
    #[serde(default)]
    pub play: PlayConfig,
    #[serde(default)]
    pub ledger: LedgerConfig,
}

impl SimConfig {
    /// Casual preset: wide catch windows, long pocket, slower defenders
    pub fn arcade() -> Self {
        let mut cfg = Self::default();
        cfg.timing = TimingWindows::forgiving();
        cfg.play.pocket_base_secs = 5.5;
        cfg.play.yac_perfect_yds = 6;
        cfg.coverage.defender_speed_yps = 5.5;
        cfg.coverage.blitz_speed_yps = 3.6;
        cfg.coverage.man_reaction_secs = 0.45;
        cfg
    }

    /// Demanding preset: narrow windows, quick pressure, tight coverage
    pub fn simulation() -> Self {
        let mut cfg = Self::default();
        cfg.timing = TimingWindows::strict();
        cfg.play.pocket_base_secs = 3.8;
        cfg.play.pocket_min_secs = 2.2;
        cfg.coverage.man_reaction_secs = 0.25;
        cfg.coverage.defender_speed_yps = 7.0;
        cfg.coverage.contest_radius_yds = 2.5;
        cfg.flight.throw_speed_yps = 20.0;
        cfg
    }

    /// Preset chosen by `GRIDIRON_PROFILE`, falling back to the default.
    pub fn from_env_or_default() -> Self {
        Self::from_profile(&env::var(PROFILE_ENV).unwrap_or_default())
    }

    pub fn from_profile(profile: &str) -> Self {
        match profile.to_lowercase().as_str() {
            "arcade" => Self::arcade(),
            "simulation" => Self::simulation(),
            _ => Self::default(),
        }
    }

    /// Parse a (possibly partial) JSON config; missing sections use defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: SimConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flight.validate()?;
        self.timing.validate()?;
        self.routes.validate()?;
        self.coverage.validate()?;
        self.play.validate()?;
        self.ledger.validate()?;
        Ok(())
    }
}
