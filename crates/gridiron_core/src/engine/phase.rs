//! Play phases
//!
//! ```text
//! PRE_SNAP → SNAP → DROPBACK → READ → THROW → BALL_FLIGHT → CATCH → RESULT
//!                                                               ↓
//!                                         next PRE_SNAP  or  GAME_OVER
//! ```
//!
//! `Phase` carries only the data that is valid in that phase: there is no
//! ball before the throw and no timing verdict before the catch.
//! A sack jumps from SNAP / DROPBACK / READ straight to RESULT.

use serde::{Deserialize, Serialize};

use super::ball_flight::BallState;
use super::drive::{DriveUpdate, PlayResult};
use super::timing_window::TimingQuality;
use super::types::FieldPoint;

/// Data-less phase discriminant, used in events and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseKind {
    PreSnap,
    Snap,
    Dropback,
    Read,
    Throw,
    BallFlight,
    Catch,
    Result,
    GameOver,
}

impl PhaseKind {
    /// Phases in which receivers and defenders move.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            PhaseKind::Snap
                | PhaseKind::Dropback
                | PhaseKind::Read
                | PhaseKind::Throw
                | PhaseKind::BallFlight
        )
    }

    /// Whether `action` is legal in this phase.
    pub fn accepts(&self, action: PlayAction) -> bool {
        matches!(
            (self, action),
            (PhaseKind::PreSnap, PlayAction::SelectPlay)
                | (PhaseKind::PreSnap, PlayAction::Snap)
                | (PhaseKind::Read, PlayAction::Throw)
                | (PhaseKind::BallFlight, PlayAction::AttemptCatch)
        )
    }
}

/// Host-triggered inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayAction {
    SelectPlay,
    Snap,
    Throw,
    AttemptCatch,
}

/// Who went for the ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Catcher {
    Receiver,
    Defender,
}

/// A judged attempt on the ball.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CatchAttempt {
    pub by: Catcher,
    /// Session time of the attempt (s)
    pub at: f32,
    pub progress: f32,
    pub quality: TimingQuality,
    /// Where the ball was when it was played
    pub spot: FieldPoint,
    /// A defender was within contest range of the target
    pub contested: bool,
}

/// How one play ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayOutcome {
    pub play_id: String,
    /// Final result, after yardage upgrades
    pub result: PlayResult,
    pub yards_gained: i32,
    pub attempt: Option<CatchAttempt>,
    pub update: DriveUpdate,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    PreSnap { selected: Option<String> },
    Snap,
    Dropback,
    Read,
    Throw { target: FieldPoint },
    BallFlight { ball: BallState },
    Catch { ball: BallState, attempt: CatchAttempt },
    Result { outcome: Box<PlayOutcome> },
    GameOver { outcome: Box<PlayOutcome> },
}

impl Phase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            Phase::PreSnap { .. } => PhaseKind::PreSnap,
            Phase::Snap => PhaseKind::Snap,
            Phase::Dropback => PhaseKind::Dropback,
            Phase::Read => PhaseKind::Read,
            Phase::Throw { .. } => PhaseKind::Throw,
            Phase::BallFlight { .. } => PhaseKind::BallFlight,
            Phase::Catch { .. } => PhaseKind::Catch,
            Phase::Result { .. } => PhaseKind::Result,
            Phase::GameOver { .. } => PhaseKind::GameOver,
        }
    }

    /// Ball in the air or just played.
    pub fn ball(&self) -> Option<&BallState> {
        match self {
            Phase::BallFlight { ball } | Phase::Catch { ball, .. } => Some(ball),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<&PlayOutcome> {
        match self {
            Phase::Result { outcome } | Phase::GameOver { outcome } => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_documented_actions_are_accepted() {
        let legal = [
            (PhaseKind::PreSnap, PlayAction::SelectPlay),
            (PhaseKind::PreSnap, PlayAction::Snap),
            (PhaseKind::Read, PlayAction::Throw),
            (PhaseKind::BallFlight, PlayAction::AttemptCatch),
        ];
        let phases = [
            PhaseKind::PreSnap,
            PhaseKind::Snap,
            PhaseKind::Dropback,
            PhaseKind::Read,
            PhaseKind::Throw,
            PhaseKind::BallFlight,
            PhaseKind::Catch,
            PhaseKind::Result,
            PhaseKind::GameOver,
        ];
        let actions =
            [PlayAction::SelectPlay, PlayAction::Snap, PlayAction::Throw, PlayAction::AttemptCatch];

        for phase in phases {
            for action in actions {
                assert_eq!(
                    phase.accepts(action),
                    legal.contains(&(phase, action)),
                    "{:?} / {:?}",
                    phase,
                    action
                );
            }
        }
    }

    #[test]
    fn test_live_phases_are_snap_through_flight() {
        assert!(!PhaseKind::PreSnap.is_live());
        assert!(PhaseKind::Snap.is_live());
        assert!(PhaseKind::BallFlight.is_live());
        assert!(!PhaseKind::Catch.is_live());
        assert!(!PhaseKind::GameOver.is_live());
    }

    #[test]
    fn test_phase_kind_serializes_screaming() {
        let json = serde_json::to_string(&PhaseKind::BallFlight).unwrap();
        assert_eq!(json, "\"BALL_FLIGHT\"");
    }
}
