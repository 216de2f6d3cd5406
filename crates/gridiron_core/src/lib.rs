//! # gridiron_core - Deterministic Football Play Simulation
//!
//! The play core of a snap → route → throw → catch → result mini-game:
//! a phase state machine for one down, the ball-flight model, receiver routes
//! and defensive coverage, catch timing windows and the drive/score ledger.
//!
//! ## Features
//! - 100% deterministic simulation (same seed = same game)
//! - Explicit, disposable play sessions with cancellable timers
//! - Serializable events and snapshots for presentation layers
//!
//! ## Quick start
//! ```rust
//! use gridiron_core::{Autopilot, Game};
//!
//! let mut game = Game::with_seed(42, 1.0);
//! Autopilot::new(42).play_game(&mut game, 500_000).unwrap();
//! assert!(game.is_over());
//! ```

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]

pub mod data;
pub mod engine;
pub mod error;

pub use data::{PlayCatalog, PlayDefinition, RiskLevel, Route};
pub use engine::{
    Autopilot, CoverageType, DriveState, FieldPoint, Game, GameEvent, PhaseKind, PlayResult,
    PlaySnapshot, Quarter, SimConfig, TimingQuality,
};
pub use error::{CatalogError, ConfigError, PlayError, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
