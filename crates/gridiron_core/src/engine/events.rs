//! Outbound events and snapshots
//!
//! Presentation, audio and HUD collaborators only ever see these types.
//! Everything is serde-serializable so a host can forward it as JSON.

use serde::{Deserialize, Serialize};

use super::ball_flight::BallSample;
use super::coverage::{CoverageType, DefenderState};
use super::drive::{DriveState, Score};
use super::phase::{Catcher, PhaseKind, PlayAction, PlayOutcome};
use super::routes::ReceiverState;
use super::timing_window::TimingQuality;
use super::types::FieldPoint;

/// Read-only view of one play at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaySnapshot {
    pub phase: PhaseKind,
    /// Session time (s)
    pub time: f32,
    pub play_id: Option<String>,
    pub coverage: CoverageType,
    pub quarterback: FieldPoint,
    pub receivers: Vec<ReceiverState>,
    pub defenders: Vec<DefenderState>,
    pub ball: Option<BallSample>,
    pub drive: DriveState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    PhaseChanged {
        from: PhaseKind,
        to: PhaseKind,
        snapshot: Box<PlaySnapshot>,
    },
    TimingJudged {
        by: Catcher,
        progress: f32,
        quality: TimingQuality,
    },
    PlayResolved {
        outcome: Box<PlayOutcome>,
    },
    InvalidTransition {
        action: PlayAction,
        phase: PhaseKind,
    },
    /// Second quarter is over; the game waits for `Game::resume`.
    Halftime {
        score: Score,
    },
    GameOver {
        score: Score,
    },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::PhaseChanged { .. } => "phase_changed",
            GameEvent::TimingJudged { .. } => "timing_judged",
            GameEvent::PlayResolved { .. } => "play_resolved",
            GameEvent::InvalidTransition { .. } => "invalid_transition",
            GameEvent::Halftime { .. } => "halftime",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}
