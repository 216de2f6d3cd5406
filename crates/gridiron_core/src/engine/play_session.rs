//! Play session: one down, from PRE_SNAP to RESULT
//!
//! A `PlaySession` is the only owner of everything that lives for a single
//! play: the phase, the scheduler with its pending timers, the selected play,
//! the defensive layout and the ball. The game driver creates a fresh session
//! for every down from the committed `DriveState`, so a play can never leak
//! state into the next one.
//!
//! ## Time
//! The host calls `tick(dt)`. Timers due inside the step fire in order at
//! their exact due time, then positions are advanced to the end of the step.
//! Receiver and defender positions are never integrated; they are sampled
//! from elapsed time since the snap.
//!
//! ## Cancellation
//! `cancel()` and `Drop` clear the scheduler. A cancelled session ignores
//! further ticks.

use super::ball_flight::{BallFlight, BallState};
use super::config::SimConfig;
use super::coverage::{
    coverage_layout, nearest_defender_distance, CoverageContext, CoverageType, DefenderSetup,
    DefenderState, ThrowRelease,
};
use super::drive::{DriveLedger, DriveState, PlayResult};
use super::events::{GameEvent, PlaySnapshot};
use super::phase::{Catcher, CatchAttempt, Phase, PhaseKind, PlayAction, PlayOutcome};
use super::routes::{self, ReceiverState};
use super::scheduler::{Scheduler, Timer, TimerKind};
use super::timing_window::{classify, TimingQuality};
use super::types::{FieldPoint, CENTER_X};
use crate::data::PlayDefinition;
use crate::error::{PlayError, Result};

/// Result of a successful catch of `gained` yards from `drive`.
pub fn completion_result(drive: &DriveState, gained: i32) -> PlayResult {
    if drive.yard_line as i32 + gained >= 100 {
        PlayResult::Touchdown
    } else if gained >= drive.yards_to_go as i32 {
        PlayResult::FirstDown
    } else {
        PlayResult::Complete
    }
}

pub struct PlaySession {
    config: SimConfig,
    ledger: DriveLedger,
    drive: DriveState,
    coverage: CoverageType,
    difficulty: f32,
    play: Option<PlayDefinition>,
    layout: Vec<DefenderSetup>,
    phase: Phase,
    scheduler: Scheduler,
    snapped_at: Option<f32>,
    release: Option<ThrowRelease>,
    /// Elapsed-since-snap at which the play was resolved; positions freeze here
    frozen_at: Option<f32>,
    settled: bool,
    cancelled: bool,
    events: Vec<GameEvent>,
}

impl PlaySession {
    pub fn new(drive: DriveState, coverage: CoverageType, difficulty: f32, config: SimConfig) -> Self {
        log::debug!(
            "[PLAY] new session: {} down {} & {} at {} vs {}",
            drive.quarter.label(),
            drive.down,
            drive.yards_to_go,
            drive.yard_line,
            coverage.label()
        );
        Self {
            ledger: DriveLedger::new(config.ledger.clone()),
            config,
            drive,
            coverage,
            difficulty,
            play: None,
            layout: Vec::new(),
            phase: Phase::PreSnap { selected: None },
            scheduler: Scheduler::new(),
            snapped_at: None,
            release: None,
            frozen_at: None,
            settled: false,
            cancelled: false,
            events: Vec::new(),
        }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn phase_kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    /// Session time (s).
    pub fn now(&self) -> f32 {
        self.scheduler.now()
    }

    /// Drive state this play started from.
    pub fn drive(&self) -> &DriveState {
        &self.drive
    }

    pub fn coverage(&self) -> CoverageType {
        self.coverage
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn play(&self) -> Option<&PlayDefinition> {
        self.play.as_ref()
    }

    pub fn layout(&self) -> &[DefenderSetup] {
        &self.layout
    }

    pub fn outcome(&self) -> Option<&PlayOutcome> {
        self.phase.outcome()
    }

    /// Settle delay after RESULT has run out.
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_count()
    }

    /// Seconds since the snap, frozen once the play is resolved.
    pub fn elapsed_since_snap(&self) -> f32 {
        let elapsed = self.snapped_at.map(|s| self.now() - s).unwrap_or(0.0);
        match self.frozen_at {
            Some(frozen) => elapsed.min(frozen),
            None => elapsed,
        }
    }

    /// Seconds after the snap at which the quarterback reaches the read.
    pub fn read_starts_at(&self) -> f32 {
        self.config.play.snap_secs + self.config.play.dropback_secs
    }

    pub fn qb_set_point(&self) -> FieldPoint {
        FieldPoint::new(CENTER_X, -self.config.play.qb_drop_depth_yds)
    }

    pub fn quarterback_position(&self) -> FieldPoint {
        let t = (self.elapsed_since_snap() / self.read_starts_at()).clamp(0.0, 1.0);
        FieldPoint::under_center().lerp(&self.qb_set_point(), t)
    }

    pub fn coverage_context(&self) -> Option<CoverageContext<'_>> {
        self.play.as_ref().map(|play| CoverageContext {
            play,
            routes: &self.config.routes,
            coverage: &self.config.coverage,
            qb_set_point: self.qb_set_point(),
        })
    }

    pub fn receivers(&self) -> Vec<ReceiverState> {
        self.receivers_at(self.elapsed_since_snap())
    }

    pub fn receivers_at(&self, elapsed: f32) -> Vec<ReceiverState> {
        match &self.play {
            Some(play) => routes::receiver_states(play, elapsed, &self.config.routes),
            None => Vec::new(),
        }
    }

    pub fn defenders(&self) -> Vec<DefenderState> {
        self.defenders_at(self.elapsed_since_snap())
    }

    pub fn defenders_at(&self, elapsed: f32) -> Vec<DefenderState> {
        match self.coverage_context() {
            Some(ctx) => ctx.defender_states(&self.layout, elapsed, self.release.as_ref()),
            None => Vec::new(),
        }
    }

    /// Distance from `spot` to the closest receiver `elapsed` seconds after the snap.
    pub fn nearest_receiver_distance(&self, spot: &FieldPoint, elapsed: f32) -> Option<f32> {
        self.receivers_at(elapsed)
            .iter()
            .map(|r| r.position.distance_to(spot))
            .min_by(f32::total_cmp)
    }

    pub fn snapshot(&self) -> PlaySnapshot {
        let drive = match self.phase.outcome() {
            Some(outcome) => outcome.update.state.clone(),
            None => self.drive.clone(),
        };
        PlaySnapshot {
            phase: self.phase.kind(),
            time: self.now(),
            play_id: self.play.as_ref().map(|p| p.id.clone()),
            coverage: self.coverage,
            quarterback: self.quarterback_position(),
            receivers: self.receivers(),
            defenders: self.defenders(),
            ball: self.phase.ball().map(|b| b.sample()),
            drive,
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Pick the play to run. Only in PRE_SNAP; may be called again to change
    /// the call before the snap.
    pub fn select_play(&mut self, play: &PlayDefinition) -> Result<()> {
        self.guard(PlayAction::SelectPlay)?;
        if play.validate().is_err() {
            return Err(PlayError::UnknownPlay(play.id.clone()));
        }

        self.layout = coverage_layout(self.coverage, play, &self.config.coverage);
        self.play = Some(play.clone());
        self.phase = Phase::PreSnap { selected: Some(play.id.clone()) };
        log::debug!("[PLAY] selected '{}' ({} defenders)", play.id, self.layout.len());
        Ok(())
    }

    /// PRE_SNAP → SNAP. Starts the phase clock, the pocket countdown and, under
    /// a blitz, the blitzer's arrival.
    pub fn snap(&mut self) -> Result<()> {
        self.guard(PlayAction::Snap)?;
        if self.play.is_none() {
            self.report_invalid(PlayAction::Snap);
            return Err(PlayError::NoPlaySelected);
        }

        let now = self.now();
        self.snapped_at = Some(now);

        let play_cfg = &self.config.play;
        let snap_secs = play_cfg.snap_secs;
        let read_at = self.read_starts_at();
        let pocket = play_cfg.pocket_secs(self.difficulty);
        let blitz = self.coverage_context().and_then(|ctx| ctx.blitz_arrival(&self.layout));

        self.scheduler.schedule_at(now + snap_secs, TimerKind::SnapToDropback);
        self.scheduler.schedule_at(now + read_at, TimerKind::DropbackToRead);
        self.scheduler.schedule_at(now + pocket, TimerKind::PocketExpired);
        if let Some(arrival) = blitz {
            log::debug!("[PLAY] blitz arrives {:.2}s after the snap", arrival);
            self.scheduler.schedule_at(now + arrival, TimerKind::BlitzArrival);
        }

        self.transition(Phase::Snap);
        Ok(())
    }

    /// READ → THROW toward `target` (play-local yards).
    pub fn throw_to(&mut self, target: FieldPoint) -> Result<()> {
        self.guard(PlayAction::Throw)?;
        if !target.x.is_finite() || !target.y.is_finite() || !target.is_on_field(self.drive.yard_line) {
            log::warn!("[PLAY] throw target ({:.1}, {:.1}) off the field", target.x, target.y);
            return Err(PlayError::TargetOutOfBounds { x: target.x, y: target.y });
        }

        self.scheduler.cancel_kind(TimerKind::PocketExpired);
        self.scheduler.cancel_kind(TimerKind::BlitzArrival);
        self.scheduler.schedule_in(self.config.play.release_secs, TimerKind::ThrowRelease);

        self.transition(Phase::Throw { target });
        Ok(())
    }

    /// Receiver goes for the ball at session time `at`.
    ///
    /// `at` must lie between the release and the current time. The verdict is
    /// returned immediately and the play resolves. A well-timed attempt with no
    /// receiver within `catch_radius_yds` of the ball is judged a miss.
    pub fn attempt_catch(&mut self, at: f32) -> Result<TimingQuality> {
        self.guard(PlayAction::AttemptCatch)?;
        let Phase::BallFlight { ball } = self.phase else {
            return Err(self.report_invalid(PlayAction::AttemptCatch));
        };

        let now = self.now();
        if !at.is_finite() || at < ball.released_at || at > now {
            return Err(PlayError::TimestampOutOfFlight { at, start: ball.released_at, end: now });
        }

        let progress = ball.progress_at(at);
        let spot = ball.flight.target;
        let elapsed = self.snapped_at.map(|s| at - s).unwrap_or(0.0);
        let mut quality = classify(&self.config.timing, progress);
        if quality != TimingQuality::Miss && !self.receiver_in_reach(&spot, elapsed) {
            log::debug!(
                "[PLAY] {} timing but no receiver near ({:.1}, {:.1})",
                quality.label(),
                spot.x,
                spot.y
            );
            quality = TimingQuality::Miss;
        }
        let contested = self.is_contested(&spot, elapsed);

        let attempt = CatchAttempt { by: Catcher::Receiver, at, progress, quality, spot, contested };
        self.judge(ball, attempt);
        Ok(quality)
    }

    /// Advance simulation time by `dt` seconds (bounded by `max_tick_secs`).
    pub fn tick(&mut self, dt: f32) {
        if self.cancelled || !dt.is_finite() || dt <= 0.0 {
            return;
        }
        let dt = dt.min(self.config.play.max_tick_secs);
        let until = self.now() + dt;

        while let Some(timer) = self.scheduler.pop_due(until) {
            self.advance_to(timer.due);
            self.fire(timer);
        }
        self.advance_to(until);
        self.check_interception();
    }

    /// Tear the play down: nothing scheduled by this session fires afterwards.
    pub fn cancel(&mut self) {
        let dropped = self.scheduler.cancel_all();
        self.cancelled = true;
        log::debug!("[PLAY] session cancelled in {:?}, {} timers dropped", self.phase.kind(), dropped);
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn guard(&mut self, action: PlayAction) -> Result<()> {
        if self.phase.kind().accepts(action) {
            Ok(())
        } else {
            Err(self.report_invalid(action))
        }
    }

    fn report_invalid(&mut self, action: PlayAction) -> PlayError {
        let phase = self.phase.kind();
        log::warn!("[PLAY] rejected {:?} in {:?}", action, phase);
        self.events.push(GameEvent::InvalidTransition { action, phase });
        PlayError::InvalidTransition { action, phase }
    }

    fn transition(&mut self, next: Phase) {
        let from = self.phase.kind();
        self.phase = next;
        let to = self.phase.kind();
        log::debug!("[PLAY] {:?} -> {:?} at {:.3}s", from, to, self.now());
        self.events.push(GameEvent::PhaseChanged { from, to, snapshot: Box::new(self.snapshot()) });
    }

    fn advance_to(&mut self, t: f32) {
        self.scheduler.advance_to(t);
        let now = self.scheduler.now();
        if let Phase::BallFlight { ball } = &mut self.phase {
            ball.advance(now);
        }
    }

    fn fire(&mut self, timer: Timer) {
        match (timer.kind, self.phase.kind()) {
            (TimerKind::SnapToDropback, PhaseKind::Snap) => self.transition(Phase::Dropback),
            (TimerKind::DropbackToRead, PhaseKind::Dropback) => self.transition(Phase::Read),
            (
                TimerKind::PocketExpired | TimerKind::BlitzArrival,
                PhaseKind::Snap | PhaseKind::Dropback | PhaseKind::Read,
            ) => self.resolve_sack(timer.kind),
            (TimerKind::ThrowRelease, PhaseKind::Throw) => self.release_ball(),
            (TimerKind::FlightArrival, PhaseKind::BallFlight) => self.ball_arrived(),
            (TimerKind::Settle, PhaseKind::Result | PhaseKind::GameOver) => {
                self.settled = true;
                log::debug!("[PLAY] settled at {:.3}s", self.now());
            }
            (kind, phase) => log::debug!("[PLAY] stale {:?} timer ignored in {:?}", kind, phase),
        }
    }

    fn release_ball(&mut self) {
        let target = match &self.phase {
            Phase::Throw { target } => *target,
            _ => return,
        };
        let now = self.now();
        let start = self.quarterback_position();
        let flight = BallFlight::launch(start, target, &self.config.flight);
        let ball = BallState::release(flight, now);

        self.release = Some(ThrowRelease { released_at: self.elapsed_since_snap(), target });
        self.scheduler.schedule_at(ball.arrives_at(), TimerKind::FlightArrival);
        log::debug!(
            "[PLAY] released {:.1} yd pass, {:.2}s in the air",
            flight.distance(),
            flight.duration_secs
        );
        self.transition(Phase::BallFlight { ball });
    }

    /// Nobody played the ball before it arrived: a miss by the offense.
    fn ball_arrived(&mut self) {
        let ball = match &self.phase {
            Phase::BallFlight { ball } => *ball,
            _ => return,
        };
        let spot = ball.flight.target;
        let contested = self.is_contested(&spot, self.elapsed_since_snap());
        let attempt = CatchAttempt {
            by: Catcher::Receiver,
            at: self.now(),
            progress: 1.0,
            quality: TimingQuality::Miss,
            spot,
            contested,
        };
        self.judge(ball, attempt);
    }

    /// A defender near the ball while it is low enough to reach, inside the
    /// perfect band, takes it away.
    fn check_interception(&mut self) {
        let ball = match &self.phase {
            Phase::BallFlight { ball } => *ball,
            _ => return,
        };
        let quality = classify(&self.config.timing, ball.progress);
        if quality != TimingQuality::Perfect {
            return;
        }
        let sample = ball.sample();
        if sample.height_yds > self.config.coverage.defender_reach_yds {
            return;
        }
        let defenders = self.defenders();
        let close = nearest_defender_distance(&defenders, &sample.position)
            .is_some_and(|d| d <= self.config.coverage.contest_radius_yds);
        if !close {
            return;
        }

        let attempt = CatchAttempt {
            by: Catcher::Defender,
            at: self.now(),
            progress: ball.progress,
            quality,
            spot: sample.position,
            contested: true,
        };
        self.judge(ball, attempt);
    }

    fn receiver_in_reach(&self, spot: &FieldPoint, elapsed: f32) -> bool {
        self.nearest_receiver_distance(spot, elapsed)
            .is_some_and(|d| d <= self.config.routes.catch_radius_yds)
    }

    fn is_contested(&self, spot: &FieldPoint, elapsed: f32) -> bool {
        nearest_defender_distance(&self.defenders_at(elapsed), spot)
            .is_some_and(|d| d <= self.config.coverage.contest_radius_yds)
    }

    /// BALL_FLIGHT → CATCH → RESULT.
    fn judge(&mut self, mut ball: BallState, attempt: CatchAttempt) {
        ball.land();
        self.frozen_at = Some(self.elapsed_since_snap());
        self.events.push(GameEvent::TimingJudged {
            by: attempt.by,
            progress: attempt.progress,
            quality: attempt.quality,
        });
        self.transition(Phase::Catch { ball, attempt });

        let depth = attempt.spot.y.round() as i32;
        let (result, gained) = match (attempt.by, attempt.quality) {
            (Catcher::Defender, _) => (PlayResult::Interception, depth),
            (Catcher::Receiver, TimingQuality::Miss) if attempt.contested => {
                (PlayResult::Interception, depth)
            }
            (Catcher::Receiver, TimingQuality::Miss) => (PlayResult::Incomplete, 0),
            (Catcher::Receiver, quality) => {
                let gained = depth + self.config.play.yards_after_catch(quality) as i32;
                (completion_result(&self.drive, gained), gained)
            }
        };
        self.finish(result, gained, Some(attempt));
    }

    fn resolve_sack(&mut self, cause: TimerKind) {
        log::debug!("[PLAY] sack ({:?}) at {:.3}s", cause, self.now());
        self.frozen_at = Some(self.elapsed_since_snap());
        let loss = self.config.play.sack_loss_yds as i32;
        self.finish(PlayResult::Sack, -loss, None);
    }

    /// Commit the result through the ledger and enter RESULT.
    fn finish(&mut self, result: PlayResult, gained: i32, attempt: Option<CatchAttempt>) {
        self.scheduler.cancel_all();

        let update = self.ledger.resolve(&self.drive, result, gained);
        let game_over = update.state.is_game_over();
        let outcome = Box::new(PlayOutcome {
            play_id: self.play.as_ref().map(|p| p.id.clone()).unwrap_or_default(),
            result: update.result,
            yards_gained: update.yards_gained,
            attempt,
            update,
        });
        log::info!(
            "[PLAY] {} '{}' {:+} yds -> {} down {} & {} at {} ({}-{})",
            outcome.result.label(),
            outcome.play_id,
            outcome.yards_gained,
            outcome.update.state.quarter.label(),
            outcome.update.state.down,
            outcome.update.state.yards_to_go,
            outcome.update.state.yard_line,
            outcome.update.state.score.home,
            outcome.update.state.score.away
        );

        self.transition(Phase::Result { outcome: outcome.clone() });
        self.events.push(GameEvent::PlayResolved { outcome: outcome.clone() });

        if game_over {
            let score = outcome.update.state.score;
            self.transition(Phase::GameOver { outcome });
            self.events.push(GameEvent::GameOver { score });
        } else {
            self.scheduler.schedule_in(self.config.play.settle_secs, TimerKind::Settle);
        }
    }
}

impl Drop for PlaySession {
    fn drop(&mut self) {
        let dropped = self.scheduler.cancel_all();
        if dropped > 0 {
            log::debug!("[PLAY] dropped session with {} pending timers", dropped);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Route;
    use crate::data::RiskLevel;
    use crate::engine::drive::{Quarter, Score, Side};

    fn single_go() -> PlayDefinition {
        PlayDefinition {
            id: "go".into(),
            name: "Go".into(),
            risk: RiskLevel::Safe,
            routes: vec![Route::new("X", &[(5.0, 0.0), (5.0, 20.0)])],
        }
    }

    /// Sideline go route that finishes at (50, 27).
    fn sideline_go() -> PlayDefinition {
        PlayDefinition {
            id: "sideline_go".into(),
            name: "Sideline Go".into(),
            risk: RiskLevel::Aggressive,
            routes: vec![Route::new("Z", &[(50.0, 0.0), (50.0, 27.0)])],
        }
    }

    fn kickoff() -> DriveState {
        DriveState::kickoff(Side::Home, &SimConfig::default().ledger)
    }

    fn session(coverage: CoverageType) -> PlaySession {
        PlaySession::new(kickoff(), coverage, 0.0, SimConfig::default())
    }

    fn tick_n(s: &mut PlaySession, n: usize, dt: f32) {
        for _ in 0..n {
            s.tick(dt);
        }
    }

    /// Snap `play` and tick into READ.
    fn into_read_running(s: &mut PlaySession, play: &PlayDefinition) {
        s.select_play(play).unwrap();
        s.snap().unwrap();
        tick_n(s, 13, 0.1);
        assert_eq!(s.phase_kind(), PhaseKind::Read);
    }

    fn into_read(s: &mut PlaySession) {
        into_read_running(s, &single_go());
    }

    /// Throw and tick until the ball is in the air.
    fn into_flight_running(s: &mut PlaySession, play: &PlayDefinition, target: FieldPoint) -> BallState {
        into_read_running(s, play);
        s.throw_to(target).unwrap();
        tick_n(s, 3, 0.1);
        match s.phase() {
            Phase::BallFlight { ball } => *ball,
            other => panic!("expected flight, got {:?}", other.kind()),
        }
    }

    fn into_flight(s: &mut PlaySession, target: FieldPoint) -> BallState {
        into_flight_running(s, &single_go(), target)
    }

    /// Session time at the centre of the perfect band.
    fn perfect_time(s: &PlaySession, ball: &BallState) -> f32 {
        ball.released_at + s.config().timing.perfect_center() * ball.flight.duration_secs
    }

    fn phase_path(events: &[GameEvent]) -> Vec<PhaseKind> {
        events
            .iter()
            .filter_map(|e| match e {
                GameEvent::PhaseChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect()
    }

    const OPEN_DEEP_RIGHT: FieldPoint = FieldPoint::new(50.0, 25.0);

    #[test]
    fn test_completion_result_upgrades() {
        let drive = DriveState { yard_line: 95, yards_to_go: 5, ..kickoff() };
        assert_eq!(completion_result(&drive, 5), PlayResult::Touchdown);
        let drive = kickoff();
        assert_eq!(completion_result(&drive, 10), PlayResult::FirstDown);
        assert_eq!(completion_result(&drive, 9), PlayResult::Complete);
    }

    #[test]
    fn test_perfect_catch_full_phase_path() {
        let mut s = session(CoverageType::Zone);
        let ball = into_flight_running(&mut s, &sideline_go(), OPEN_DEEP_RIGHT);

        let at = perfect_time(&s, &ball);
        while s.now() < at {
            s.tick(0.05);
        }
        assert_eq!(s.attempt_catch(at), Ok(TimingQuality::Perfect));
        assert!(outcome_attempt_distance(&s) <= s.config().routes.catch_radius_yds);

        let outcome = s.outcome().cloned().unwrap();
        // 25 yards deep + 4 after the catch from the 25
        assert_eq!(outcome.yards_gained, 29);
        assert_eq!(outcome.result, PlayResult::FirstDown);
        assert_eq!(outcome.update.state.yard_line, 54);

        let events = s.drain_events();
        assert_eq!(
            phase_path(&events),
            vec![
                PhaseKind::Snap,
                PhaseKind::Dropback,
                PhaseKind::Read,
                PhaseKind::Throw,
                PhaseKind::BallFlight,
                PhaseKind::Catch,
                PhaseKind::Result,
            ]
        );
        let resolved = events.iter().filter(|e| matches!(e, GameEvent::PlayResolved { .. })).count();
        assert_eq!(resolved, 1);
    }

    fn outcome_attempt_distance(s: &PlaySession) -> f32 {
        let attempt = s.outcome().and_then(|o| o.attempt).unwrap();
        let elapsed = attempt.at - s.snapped_at.unwrap();
        s.nearest_receiver_distance(&attempt.spot, elapsed).unwrap()
    }

    #[test]
    fn test_well_timed_throw_to_open_grass_is_incomplete() {
        let mut s = session(CoverageType::Zone);
        // The only receiver runs a go route along x = 5.
        let ball = into_flight(&mut s, FieldPoint::new(50.0, 40.0));
        let at = perfect_time(&s, &ball);
        while s.now() < at {
            s.tick(0.05);
        }
        assert_eq!(s.attempt_catch(at), Ok(TimingQuality::Miss));
        assert!(outcome_attempt_distance(&s) > 40.0);

        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.result, PlayResult::Incomplete);
        assert_eq!(outcome.yards_gained, 0);
        assert_eq!(outcome.attempt.map(|a| a.quality), Some(TimingQuality::Miss));
        assert_eq!(outcome.update.state.down, 2);
    }

    #[test]
    fn test_early_uncontested_attempt_is_incomplete() {
        let mut s = session(CoverageType::Zone);
        into_flight(&mut s, OPEN_DEEP_RIGHT);
        let quality = s.attempt_catch(s.now()).unwrap();
        assert_eq!(quality, TimingQuality::Miss);
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.result, PlayResult::Incomplete);
        assert_eq!(outcome.update.state.down, 2);
    }

    #[test]
    fn test_missed_ball_into_zone_defender_is_intercepted() {
        let mut s = session(CoverageType::Zone);
        // Hook defender settles on (20, 6) well before the release.
        into_flight(&mut s, FieldPoint::new(20.0, 6.0));
        assert_eq!(s.attempt_catch(s.now()), Ok(TimingQuality::Miss));

        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.result, PlayResult::Interception);
        assert!(outcome.update.turnover);
        assert_eq!(outcome.update.state.possession, Side::Away);
        assert_eq!(outcome.update.state.yard_line, 100 - 31);
    }

    #[test]
    fn test_unplayed_ball_resolves_at_arrival() {
        let mut s = session(CoverageType::Zone);
        let ball = into_flight(&mut s, OPEN_DEEP_RIGHT);
        while s.phase_kind() == PhaseKind::BallFlight {
            s.tick(0.1);
        }
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.result, PlayResult::Incomplete);
        let attempt = outcome.attempt.unwrap();
        assert_eq!(attempt.quality, TimingQuality::Miss);
        assert!((attempt.at - ball.arrives_at()).abs() < 1e-4);
    }

    #[test]
    fn test_pocket_expiry_is_a_sack() {
        let mut s = session(CoverageType::Cover3);
        into_read(&mut s);
        while s.phase_kind() == PhaseKind::Read {
            s.tick(0.1);
        }
        assert_eq!(s.phase_kind(), PhaseKind::Result);
        let outcome = s.outcome().unwrap();
        assert_eq!(outcome.result, PlayResult::Sack);
        assert_eq!(outcome.update.state.yard_line, 18);
        assert_eq!(outcome.update.state.down, 2);
        assert!((s.elapsed_since_snap() - 4.5).abs() < 1e-3);
    }

    #[test]
    fn test_blitz_gets_home_before_pocket() {
        let mut s = session(CoverageType::Blitz);
        into_read(&mut s);
        while s.phase_kind() == PhaseKind::Read {
            s.tick(0.1);
        }
        assert_eq!(s.outcome().map(|o| o.result), Some(PlayResult::Sack));
        assert!(s.elapsed_since_snap() < 3.0);
    }

    #[test]
    fn test_throw_cancels_pass_rush() {
        let mut s = session(CoverageType::Blitz);
        into_read(&mut s);
        s.throw_to(OPEN_DEEP_RIGHT).unwrap();
        // Long after the blitz would have arrived, the play is not a sack.
        tick_n(&mut s, 40, 0.1);
        assert_ne!(s.outcome().map(|o| o.result), Some(PlayResult::Sack));
    }

    #[test]
    fn test_snap_without_play_rejected() {
        let mut s = session(CoverageType::Zone);
        assert_eq!(s.snap(), Err(PlayError::NoPlaySelected));
        assert_eq!(s.phase_kind(), PhaseKind::PreSnap);
        assert!(s
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::InvalidTransition { action: PlayAction::Snap, .. })));
    }

    #[test]
    fn test_throw_before_read_is_a_noop() {
        let mut s = session(CoverageType::Zone);
        s.select_play(&single_go()).unwrap();
        let err = s.throw_to(OPEN_DEEP_RIGHT).unwrap_err();
        assert_eq!(
            err,
            PlayError::InvalidTransition { action: PlayAction::Throw, phase: PhaseKind::PreSnap }
        );
        assert_eq!(s.phase_kind(), PhaseKind::PreSnap);
        assert_eq!(s.pending_timers(), 0);

        s.snap().unwrap();
        assert!(s.throw_to(OPEN_DEEP_RIGHT).is_err());
        assert!(s.select_play(&single_go()).is_err());
        assert_eq!(s.phase_kind(), PhaseKind::Snap);
    }

    #[test]
    fn test_target_off_field_rejected() {
        let mut s = session(CoverageType::Zone);
        into_read(&mut s);
        assert!(matches!(
            s.throw_to(FieldPoint::new(60.0, 10.0)),
            Err(PlayError::TargetOutOfBounds { .. })
        ));
        // Past the far end zone from our own 25
        assert!(s.throw_to(FieldPoint::new(20.0, 90.0)).is_err());
        assert_eq!(s.phase_kind(), PhaseKind::Read);
    }

    #[test]
    fn test_catch_timestamp_must_be_in_flight() {
        let mut s = session(CoverageType::Zone);
        let ball = into_flight(&mut s, OPEN_DEEP_RIGHT);
        let now = s.now();
        assert!(matches!(
            s.attempt_catch(ball.released_at - 0.1),
            Err(PlayError::TimestampOutOfFlight { .. })
        ));
        assert!(s.attempt_catch(now + 1.0).is_err());
        assert_eq!(s.phase_kind(), PhaseKind::BallFlight);
    }

    #[test]
    fn test_cancel_stops_all_timers() {
        let mut s = session(CoverageType::Zone);
        s.select_play(&single_go()).unwrap();
        s.snap().unwrap();
        assert!(s.pending_timers() > 0);

        s.cancel();
        assert_eq!(s.pending_timers(), 0);
        tick_n(&mut s, 100, 0.1);
        assert_eq!(s.phase_kind(), PhaseKind::Snap);
        assert!(s.outcome().is_none());
    }

    #[test]
    fn test_tick_is_bounded() {
        let mut s = session(CoverageType::Zone);
        s.select_play(&single_go()).unwrap();
        s.snap().unwrap();
        s.tick(10.0);
        assert!((s.now() - SimConfig::default().play.max_tick_secs).abs() < 1e-6);
        assert_eq!(s.phase_kind(), PhaseKind::Snap);
    }

    #[test]
    fn test_positions_freeze_after_resolution() {
        let mut s = session(CoverageType::Man);
        into_flight(&mut s, OPEN_DEEP_RIGHT);
        s.attempt_catch(s.now()).unwrap();
        let before = s.snapshot();
        tick_n(&mut s, 5, 0.1);
        let after = s.snapshot();
        assert_eq!(before.receivers, after.receivers);
        assert_eq!(before.defenders, after.defenders);
    }

    #[test]
    fn test_settle_then_done() {
        let mut s = session(CoverageType::Zone);
        into_read(&mut s);
        while s.outcome().is_none() {
            s.tick(0.1);
        }
        assert!(!s.is_settled());
        tick_n(&mut s, 15, 0.1);
        assert!(s.is_settled());
    }

    #[test]
    fn test_final_play_ends_game() {
        let drive = DriveState {
            quarter: Quarter::Fourth,
            time_remaining: 1,
            score: Score { home: 7, away: 0 },
            ..kickoff()
        };
        let mut s = PlaySession::new(drive, CoverageType::Zone, 0.0, SimConfig::default());
        into_flight(&mut s, OPEN_DEEP_RIGHT);
        s.attempt_catch(s.now()).unwrap();

        assert_eq!(s.phase_kind(), PhaseKind::GameOver);
        assert_eq!(s.pending_timers(), 0);
        let events = s.drain_events();
        assert!(matches!(events.last(), Some(GameEvent::GameOver { score }) if score.home == 7));
    }

    #[test]
    fn test_pre_snap_snapshot() {
        let mut s = session(CoverageType::Man);
        s.select_play(&single_go()).unwrap();
        let snap = s.snapshot();
        assert_eq!(snap.phase, PhaseKind::PreSnap);
        assert_eq!(snap.quarterback, FieldPoint::under_center());
        assert_eq!(snap.receivers[0].position, FieldPoint::new(5.0, 0.0));
        // One man defender plus the deep safety
        assert_eq!(snap.defenders.len(), 2);
        assert!(snap.ball.is_none());
        assert_eq!(snap, s.snapshot());
    }
}
