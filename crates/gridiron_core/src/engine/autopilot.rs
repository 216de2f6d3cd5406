//! Autopilot
//!
//! Simple offensive policies used for attract mode, headless simulation and
//! end-to-end tests:
//! - play calling by situation (down, distance, score, clock) → risk level
//! - throw targeting: the receiver with the most separation at the catch
//!   point, thrown with lead
//! - catch timing: the centre of the perfect band
//!
//! `Autopilot::step` issues at most one input (or one tick) per call, so a
//! host can interleave rendering between steps.

use rand::distributions::{Distribution, WeightedIndex};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::ball_flight::{flight_duration, BallState};
use super::config::TimingWindows;
use super::coverage::{nearest_defender_distance, ThrowRelease};
use super::drive::{DriveState, Quarter};
use super::game::Game;
use super::phase::PhaseKind;
use super::play_session::PlaySession;
use super::routes;
use super::types::FieldPoint;
use crate::data::{PlayCatalog, PlayDefinition, RiskLevel};
use crate::error::{PlayError, Result};

// ============================================================================
// Play calling
// ============================================================================

const RISK_ORDER: [RiskLevel; 3] = [RiskLevel::Safe, RiskLevel::Balanced, RiskLevel::Aggressive];

/// Weights over [Safe, Balanced, Aggressive] for the current situation.
pub fn risk_weights(drive: &DriveState) -> [f32; 3] {
    let offense = drive.possession;
    let trailing = drive.score.get(offense) < drive.score.get(offense.opposite());
    let late = matches!(drive.quarter, Quarter::Fourth | Quarter::Overtime);

    if late && trailing {
        [0.15, 0.35, 0.50]
    } else if drive.down >= 3 && drive.yards_to_go >= 7 {
        [0.10, 0.30, 0.60]
    } else if drive.yards_to_go <= 3 {
        [0.60, 0.30, 0.10]
    } else {
        [0.35, 0.45, 0.20]
    }
}

/// Draw a play for `drive`. Falls back to any play when the chosen risk
/// bucket is empty; `None` only for an empty catalog.
pub fn call_play<'a, R: Rng + ?Sized>(
    drive: &DriveState,
    catalog: &'a PlayCatalog,
    rng: &mut R,
) -> Option<&'a PlayDefinition> {
    let risk = match WeightedIndex::new(risk_weights(drive)) {
        Ok(dist) => RISK_ORDER[dist.sample(rng)],
        Err(_) => RiskLevel::Balanced,
    };

    let bucket: Vec<&PlayDefinition> = catalog.by_risk(risk).collect();
    let pool = if bucket.is_empty() { catalog.iter().collect() } else { bucket };
    if pool.is_empty() {
        return None;
    }
    Some(pool[rng.gen_range(0..pool.len())])
}

// ============================================================================
// Targeting
// ============================================================================

/// One receiver as seen from the pocket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRead {
    pub receiver: usize,
    /// Lead point: where the receiver will be when the ball gets there
    pub target: FieldPoint,
    /// Distance from the lead point to the closest defender at that time
    pub separation: f32,
}

/// Refinements of the lead point; flight time depends on the target.
const LEAD_PASSES: usize = 4;

/// Project every receiver to the moment a throw released now would be
/// caught in the middle of the perfect band.
pub fn read_targets(session: &PlaySession) -> Vec<TargetRead> {
    let (Some(play), Some(ctx)) = (session.play(), session.coverage_context()) else {
        return Vec::new();
    };
    let cfg = session.config();
    let los = session.drive().yard_line;
    let qb = session.quarterback_position();
    let released_at = session.elapsed_since_snap() + cfg.play.release_secs;

    play.routes
        .iter()
        .enumerate()
        .filter_map(|(idx, route)| {
            let catch_at = |aim: &FieldPoint| {
                released_at + flight_duration(qb.distance_to(aim), &cfg.flight) * cfg.timing.perfect_center()
            };
            let mut target = routes::receiver_position(route, released_at, &cfg.routes);
            for _ in 0..LEAD_PASSES {
                target = routes::receiver_position(route, catch_at(&target), &cfg.routes);
            }
            let caught_at = catch_at(&target);
            if !target.is_on_field(los) {
                return None;
            }
            let release = ThrowRelease { released_at, target };
            let defenders = ctx.defender_states(session.layout(), caught_at, Some(&release));
            let separation = nearest_defender_distance(&defenders, &target).unwrap_or(f32::MAX);
            Some(TargetRead { receiver: idx, target, separation })
        })
        .collect()
}

/// Best throw right now: most separation, with a small bonus for depth.
pub fn choose_target(session: &PlaySession) -> Option<FieldPoint> {
    let score = |r: &TargetRead| r.separation.min(8.0) + 0.15 * r.target.y.max(0.0);
    read_targets(session)
        .into_iter()
        .max_by(|a, b| score(a).total_cmp(&score(b)))
        .map(|r| r.target)
}

/// Session time at which to attempt the catch.
pub fn catch_time(ball: &BallState, windows: &TimingWindows) -> f32 {
    ball.released_at + windows.perfect_center() * ball.flight.duration_secs
}

// ============================================================================
// Driver
// ============================================================================

pub struct Autopilot {
    rng: ChaCha8Rng,
    /// Time spent in READ before throwing (s)
    read_secs: f32,
    /// Step used while nothing needs deciding (s)
    tick_secs: f32,
}

impl Autopilot {
    pub fn new(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed), read_secs: 0.4, tick_secs: 0.05 }
    }

    pub fn with_read_secs(mut self, read_secs: f32) -> Self {
        self.read_secs = read_secs.max(0.0);
        self
    }

    pub fn with_tick_secs(mut self, tick_secs: f32) -> Self {
        if tick_secs > 0.0 {
            self.tick_secs = tick_secs;
        }
        self
    }

    /// Issue the next input or advance time by one step.
    pub fn step(&mut self, game: &mut Game) -> Result<()> {
        if game.is_over() {
            return Err(PlayError::GameOver);
        }
        if game.is_halftime() {
            return game.resume();
        }

        match game.phase() {
            PhaseKind::PreSnap => {
                let id = call_play(game.drive(), game.catalog(), &mut self.rng)
                    .map(|p| p.id.clone())
                    .ok_or(PlayError::NoPlaySelected)?;
                game.select_play(&id)?;
                game.snap()?;
            }
            PhaseKind::Read => {
                let session = game.session();
                let ready = session.elapsed_since_snap() >= session.read_starts_at() + self.read_secs;
                match choose_target(session).filter(|_| ready) {
                    Some(target) => game.throw_to(target)?,
                    None => game.tick(self.tick_secs),
                }
            }
            PhaseKind::BallFlight => {
                let Some(ball) = game.session().phase().ball().copied() else {
                    game.tick(self.tick_secs);
                    return Ok(());
                };
                let at = catch_time(&ball, &game.config().timing);
                let now = game.now();
                if at - now > 1e-4 {
                    game.tick((at - now).min(self.tick_secs));
                } else {
                    game.attempt_catch(now)?;
                }
            }
            _ => game.tick(self.tick_secs),
        }
        Ok(())
    }

    /// Drive `game` to the final whistle. Returns the number of steps taken.
    pub fn play_game(&mut self, game: &mut Game, max_steps: usize) -> Result<usize> {
        let mut steps = 0;
        while !game.is_over() {
            if steps >= max_steps {
                log::warn!("[AUTO] step budget of {} exhausted", max_steps);
                break;
            }
            self.step(game)?;
            steps += 1;
        }
        Ok(steps)
    }
}
