//! Play simulation engine
//!
//! Leaves first: geometry and config, then the pure models (routes, coverage,
//! ball flight, timing windows, ledger), then the phase machine that drives
//! them (`play_session`, `game`).

pub mod autopilot;
pub mod ball_flight;
pub mod config;
pub mod contracts;
pub mod coverage;
pub mod drive;
pub mod events;
pub mod game;
pub mod phase;
pub mod play_session;
pub mod routes;
pub mod scheduler; // Pending timers for one play
pub mod timing_window;
pub mod types;


pub use autopilot::Autopilot;
pub use ball_flight::{BallFlight, BallSample, BallState};
pub use config::SimConfig;
pub use coverage::{select_coverage, Assignment, CoverageType, CoverageWeights, DefenderState};
pub use drive::{DriveLedger, DriveState, DriveUpdate, PlayResult, Quarter, Score, Side};
pub use events::{GameEvent, PlaySnapshot};
pub use game::Game;
pub use phase::{CatchAttempt, Catcher, Phase, PhaseKind, PlayAction, PlayOutcome};
pub use play_session::PlaySession;
pub use routes::ReceiverState;
pub use scheduler::{Scheduler, TimerKind};
pub use timing_window::{classify, TimingQuality};
pub use types::FieldPoint;
