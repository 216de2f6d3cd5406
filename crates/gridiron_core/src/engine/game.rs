//! Game driver
//!
//! Host-facing entry point. A `Game` owns the committed `DriveState`, the
//! playbook, the seeded RNG used for coverage calls, and the one live
//! `PlaySession`. After each input or tick it:
//! 1. forwards the session's events,
//! 2. commits the play's `DriveUpdate` once the session reaches RESULT,
//! 3. replaces the session with a fresh one when the settle delay is over.
//!
//! At halftime the driver holds the finished play until the host calls
//! `resume()`.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::config::SimConfig;
use super::coverage::{select_coverage, CoverageType};
use super::drive::{DriveState, Quarter, Side};
use super::events::{GameEvent, PlaySnapshot};
use super::phase::{PhaseKind, PlayOutcome};
use super::play_session::PlaySession;
use super::timing_window::TimingQuality;
use super::types::FieldPoint;
use crate::data::PlayCatalog;
use crate::error::{PlayError, Result};

pub struct Game {
    config: SimConfig,
    catalog: PlayCatalog,
    difficulty: f32,
    rng: ChaCha8Rng,
    drive: DriveState,
    session: PlaySession,
    committed: bool,
    halftime: bool,
    plays_run: u32,
    history: Vec<PlayOutcome>,
    events: Vec<GameEvent>,
}

impl Game {
    /// New game; the home side receives the opening kickoff.
    pub fn new(config: SimConfig, catalog: PlayCatalog, difficulty: f32, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let drive = DriveState::kickoff(Side::Home, &config.ledger);
        let coverage = select_coverage(difficulty, &mut rng);
        let session = PlaySession::new(drive.clone(), coverage, difficulty, config.clone());

        log::info!(
            "[GAME] kickoff: seed={} difficulty={:.2} plays={}",
            seed,
            difficulty,
            catalog.len()
        );

        Self {
            config,
            catalog,
            difficulty,
            rng,
            drive,
            session,
            committed: false,
            halftime: false,
            plays_run: 0,
            history: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Default tuning and the built-in playbook.
    pub fn with_seed(seed: u64, difficulty: f32) -> Self {
        Self::new(SimConfig::default(), PlayCatalog::builtin(), difficulty, seed)
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Committed drive state (HUD view).
    pub fn drive(&self) -> &DriveState {
        &self.drive
    }

    pub fn phase(&self) -> PhaseKind {
        self.session.phase_kind()
    }

    pub fn is_over(&self) -> bool {
        self.drive.is_game_over()
    }

    /// Waiting for `resume()` between the second and third quarters.
    pub fn is_halftime(&self) -> bool {
        self.halftime
    }

    pub fn session(&self) -> &PlaySession {
        &self.session
    }

    pub fn snapshot(&self) -> PlaySnapshot {
        self.session.snapshot()
    }

    /// Session time of the current play (s).
    pub fn now(&self) -> f32 {
        self.session.now()
    }

    pub fn coverage(&self) -> CoverageType {
        self.session.coverage()
    }

    pub fn catalog(&self) -> &PlayCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn difficulty(&self) -> f32 {
        self.difficulty
    }

    pub fn plays_run(&self) -> u32 {
        self.plays_run
    }

    /// Every resolved play so far, oldest first.
    pub fn history(&self) -> &[PlayOutcome] {
        &self.history
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.collect();
        std::mem::take(&mut self.events)
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    pub fn select_play(&mut self, id: &str) -> Result<()> {
        self.ensure_running()?;
        let play = self
            .catalog
            .get(id)
            .ok_or_else(|| PlayError::UnknownPlay(id.to_string()))?;
        let result = self.session.select_play(play);
        self.collect();
        result
    }

    pub fn snap(&mut self) -> Result<()> {
        self.ensure_running()?;
        let result = self.session.snap();
        self.collect();
        result
    }

    pub fn throw_to(&mut self, target: FieldPoint) -> Result<()> {
        self.ensure_running()?;
        let result = self.session.throw_to(target);
        self.collect();
        result
    }

    pub fn attempt_catch(&mut self, at: f32) -> Result<TimingQuality> {
        self.ensure_running()?;
        let result = self.session.attempt_catch(at);
        self.sync();
        result
    }

    pub fn tick(&mut self, dt: f32) {
        if self.is_over() {
            return;
        }
        self.session.tick(dt);
        self.sync();
    }

    /// Leave halftime. The third quarter lines up once the last play of the
    /// half has settled.
    pub fn resume(&mut self) -> Result<()> {
        self.ensure_running()?;
        if self.halftime {
            log::info!("[GAME] second half under way");
            self.halftime = false;
            self.sync();
        }
        Ok(())
    }

    /// Host view torn down mid-play: drop the live play with all its timers
    /// and line up again from the last committed drive state.
    pub fn abandon_play(&mut self) {
        self.sync();
        if self.is_over() {
            self.session.cancel();
            return;
        }
        let phase = self.session.phase_kind();
        if phase.is_live() {
            log::info!("[GAME] live play abandoned in {:?}", phase);
        } else {
            log::debug!("[GAME] play abandoned in {:?}", phase);
        }
        self.session.cancel();
        self.next_session();
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn ensure_running(&self) -> Result<()> {
        if self.is_over() {
            Err(PlayError::GameOver)
        } else {
            Ok(())
        }
    }

    fn collect(&mut self) {
        self.events.extend(self.session.drain_events());
    }

    fn sync(&mut self) {
        self.collect();

        if !self.committed {
            if let Some(outcome) = self.session.outcome() {
                let update = &outcome.update;
                let at_half = update.quarter_ended && update.state.quarter == Quarter::Third;
                self.drive = update.state.clone();
                self.history.push(outcome.clone());
                self.plays_run += 1;
                self.committed = true;
                if at_half {
                    log::info!(
                        "[GAME] halftime: HOME {} - AWAY {}",
                        self.drive.score.home,
                        self.drive.score.away
                    );
                    self.halftime = true;
                    self.events.push(GameEvent::Halftime { score: self.drive.score });
                }
            }
        }

        if self.session.is_settled() && !self.halftime && !self.is_over() {
            self.next_session();
        }
    }

    /// Fresh PRE_SNAP from the committed drive state.
    fn next_session(&mut self) {
        let from = self.session.phase_kind();
        let coverage = select_coverage(self.difficulty, &mut self.rng);
        self.session =
            PlaySession::new(self.drive.clone(), coverage, self.difficulty, self.config.clone());
        self.committed = false;
        self.halftime = false;
        self.events.push(GameEvent::PhaseChanged {
            from,
            to: PhaseKind::PreSnap,
            snapshot: Box::new(self.session.snapshot()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::drive::PlayResult;

    fn game() -> Game {
        Game::with_seed(7, 1.0)
    }

    fn sack_out(g: &mut Game) {
        g.select_play("quick_slants").unwrap();
        g.snap().unwrap();
        while g.phase() != PhaseKind::Result {
            g.tick(0.1);
        }
    }

    #[test]
    fn test_unknown_play_rejected() {
        let mut g = game();
        assert_eq!(g.select_play("hail_mary"), Err(PlayError::UnknownPlay("hail_mary".into())));
        assert_eq!(g.phase(), PhaseKind::PreSnap);
    }

    #[test]
    fn test_result_committed_once_then_next_play() {
        let mut g = game();
        let start = g.drive().clone();
        sack_out(&mut g);

        assert_eq!(g.plays_run(), 1);
        assert_eq!(g.drive().down, start.down + 1);
        assert_eq!(g.history()[0].result, PlayResult::Sack);

        // Settle delay, then a fresh PRE_SNAP from the committed state.
        for _ in 0..20 {
            g.tick(0.1);
        }
        assert_eq!(g.phase(), PhaseKind::PreSnap);
        assert_eq!(g.plays_run(), 1);
        assert_eq!(g.session().drive(), g.drive());
        assert!(g.session().outcome().is_none());
    }

    #[test]
    fn test_events_forwarded_in_order() {
        let mut g = game();
        sack_out(&mut g);
        for _ in 0..20 {
            g.tick(0.1);
        }
        let events = g.drain_events();
        let names: Vec<&str> = events.iter().map(|e| e.name()).collect();
        let resolved = names.iter().position(|n| *n == "play_resolved").unwrap();
        assert_eq!(names.iter().filter(|n| **n == "play_resolved").count(), 1);
        assert!(matches!(
            events.last(),
            Some(GameEvent::PhaseChanged { from: PhaseKind::Result, to: PhaseKind::PreSnap, .. })
        ));
        assert!(resolved < events.len() - 1);
        assert!(g.drain_events().is_empty());
    }

    #[test]
    fn test_abandon_mid_play_keeps_drive() {
        let mut g = game();
        let start = g.drive().clone();
        g.select_play("mesh").unwrap();
        g.snap().unwrap();
        g.tick(0.1);

        g.abandon_play();
        assert_eq!(g.phase(), PhaseKind::PreSnap);
        assert_eq!(g.drive(), &start);
        assert_eq!(g.session().pending_timers(), 0);
        for _ in 0..100 {
            g.tick(0.1);
        }
        assert_eq!(g.phase(), PhaseKind::PreSnap);
        assert_eq!(g.plays_run(), 0);
    }

    #[test]
    fn test_halftime_holds_until_resumed() {
        let mut g = game();
        g.drive.quarter = Quarter::Second;
        g.drive.time_remaining = 1;
        g.session = PlaySession::new(g.drive.clone(), g.coverage(), 1.0, g.config.clone());
        sack_out(&mut g);

        assert!(g.is_halftime());
        assert_eq!(g.drive().quarter, Quarter::Third);
        assert!(g
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Halftime { .. })));

        for _ in 0..50 {
            g.tick(0.1);
        }
        assert_eq!(g.phase(), PhaseKind::Result);
        assert!(g.select_play("mesh").is_err());

        g.resume().unwrap();
        assert!(!g.is_halftime());
        assert_eq!(g.phase(), PhaseKind::PreSnap);
        assert_eq!(g.session().drive().quarter, Quarter::Third);
        assert!(g.select_play("mesh").is_ok());
    }

    #[test]
    fn test_same_seed_same_coverage_sequence() {
        let coverages = |seed| {
            let mut g = Game::with_seed(seed, 1.5);
            let mut seen = vec![g.coverage()];
            for _ in 0..5 {
                g.abandon_play();
                seen.push(g.coverage());
            }
            seen
        };
        assert_eq!(coverages(99), coverages(99));
    }
}
