use thiserror::Error;

use crate::engine::phase::{PhaseKind, PlayAction};

/// Invalid tuning values. Raised when a `SimConfig` is built or loaded.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Timing windows must satisfy 0 <= good < perfect < perfect_end <= late_end <= 1, got {0:?}")]
    TimingWindows([f32; 4]),

    #[error("{field} must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field}: minimum {min} exceeds maximum {max}")]
    InvertedRange { field: &'static str, min: f32, max: f32 },

    #[error("{field} must be within {min}..={max}, got {value}")]
    OutOfRange { field: &'static str, value: f32, min: f32, max: f32 },

    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Malformed play definitions. Raised at catalog load time only.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Play '{play}' has no routes")]
    EmptyRoutes { play: String },

    #[error("Route '{route}' of play '{play}' has no waypoints")]
    EmptyWaypoints { play: String, route: String },

    #[error("Route '{route}' of play '{play}' leaves the field at waypoint {index}")]
    WaypointOutOfBounds { play: String, route: String, index: usize },

    #[error("Play '{play}' has an empty id")]
    EmptyId { play: String },

    #[error("Duplicate play id '{0}'")]
    DuplicateId(String),

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Rejected input during a play. None of these change play state.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlayError {
    #[error("Invalid transition: {action:?} while in {phase:?}")]
    InvalidTransition { action: PlayAction, phase: PhaseKind },

    #[error("Cannot snap: no play selected")]
    NoPlaySelected,

    #[error("Unknown or unselectable play '{0}'")]
    UnknownPlay(String),

    #[error("Throw target ({x:.1}, {y:.1}) is off the field")]
    TargetOutOfBounds { x: f32, y: f32 },

    #[error("Catch attempt at {at:.3}s is outside the flight window {start:.3}s..={end:.3}s")]
    TimestampOutOfFlight { at: f32, start: f32, end: f32 },

    #[error("Game is over")]
    GameOver,
}

pub type Result<T> = std::result::Result<T, PlayError>;
