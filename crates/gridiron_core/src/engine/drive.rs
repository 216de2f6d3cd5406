//! Drive & Score Ledger
//!
//! The authoritative record of down, distance, field position, clock and
//! score. `DriveLedger::reduce` is a pure reducer:
//! `(DriveState, PlayResult, yards_gained) → DriveState`.
//!
//! ## Conventions
//! - `yard_line` is always from the possessing team's point of view
//!   (0 = own goal line, 100 = opponent goal line). A change of possession
//!   mirrors it to `100 - spot`.
//! - Goal-to-go is `yards_to_go == 100 - yard_line`; `yards_to_go` is never 0.
//! - Yardage is authoritative: a `Complete` that reaches the line to gain
//!   counts as a first down, one that reaches the goal line as a touchdown.

use serde::{Deserialize, Serialize};

use super::config::LedgerConfig;
use super::contracts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Score {
    pub home: u16,
    pub away: u16,
}

impl Score {
    pub fn get(&self, side: Side) -> u16 {
        match side {
            Side::Home => self.home,
            Side::Away => self.away,
        }
    }

    pub fn add(&mut self, side: Side, points: u16) {
        match side {
            Side::Home => self.home += points,
            Side::Away => self.away += points,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.home == self.away
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quarter {
    First,
    Second,
    Third,
    Fourth,
    Overtime,
    /// Game over
    Final,
}

impl Quarter {
    pub fn label(&self) -> &'static str {
        match self {
            Quarter::First => "Q1",
            Quarter::Second => "Q2",
            Quarter::Third => "Q3",
            Quarter::Fourth => "Q4",
            Quarter::Overtime => "OT",
            Quarter::Final => "FINAL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayResult {
    Touchdown,
    FirstDown,
    Complete,
    Incomplete,
    Sack,
    Interception,
    /// Offense downed behind its own goal line
    Safety,
}

impl PlayResult {
    pub fn label(&self) -> &'static str {
        match self {
            PlayResult::Touchdown => "TOUCHDOWN",
            PlayResult::FirstDown => "FIRST DOWN",
            PlayResult::Complete => "COMPLETE",
            PlayResult::Incomplete => "INCOMPLETE",
            PlayResult::Sack => "SACK",
            PlayResult::Interception => "INTERCEPTED",
            PlayResult::Safety => "SAFETY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    pub possession: Side,
    pub down: u8,
    pub yards_to_go: u8,
    pub yard_line: u8,
    pub quarter: Quarter,
    /// Seconds left in the current quarter
    pub time_remaining: u32,
    pub score: Score,
    /// Team that received the opening kickoff (the other one gets the ball
    /// at halftime)
    pub opening_possession: Side,
}

impl DriveState {
    /// Opening state of a game.
    pub fn kickoff(receiving: Side, cfg: &LedgerConfig) -> Self {
        Self {
            possession: receiving,
            down: 1,
            yards_to_go: first_down_distance(cfg.kickoff_yard_line, cfg),
            yard_line: cfg.kickoff_yard_line,
            quarter: Quarter::First,
            time_remaining: cfg.quarter_secs,
            score: Score::default(),
            opening_possession: receiving,
        }
    }

    pub fn is_goal_to_go(&self) -> bool {
        self.yard_line as u16 + self.yards_to_go as u16 >= 100
    }

    pub fn is_game_over(&self) -> bool {
        self.quarter == Quarter::Final
    }

    /// Absolute line to gain (possessing team's view).
    pub fn line_to_gain(&self) -> u8 {
        self.yard_line.saturating_add(self.yards_to_go).min(100)
    }

    /// New set of downs for `side` at `yard_line` (in that side's view).
    fn change_possession(&mut self, side: Side, yard_line: u8, cfg: &LedgerConfig) {
        self.possession = side;
        self.yard_line = yard_line;
        self.down = 1;
        self.yards_to_go = first_down_distance(yard_line, cfg);
    }
}

/// `min(first_down_yds, 100 - yard_line)`, so goal-to-go never overshoots.
pub fn first_down_distance(yard_line: u8, cfg: &LedgerConfig) -> u8 {
    cfg.first_down_yds.min(100u8.saturating_sub(yard_line)).max(1)
}

/// Outcome of one reduction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveUpdate {
    pub state: DriveState,
    /// Result after yardage upgrades (complete → first down / touchdown,
    /// sack → safety)
    pub result: PlayResult,
    pub yards_gained: i32,
    /// Side that scored on this play, if any
    pub scoring_side: Option<Side>,
    pub points: u16,
    pub turnover: bool,
    pub quarter_ended: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DriveLedger {
    cfg: LedgerConfig,
}

impl DriveLedger {
    pub fn new(cfg: LedgerConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.cfg
    }

    pub fn opening_state(&self, receiving: Side) -> DriveState {
        DriveState::kickoff(receiving, &self.cfg)
    }

    /// Pure reducer.
    pub fn reduce(&self, state: &DriveState, result: PlayResult, yards_gained: i32) -> DriveState {
        self.resolve(state, result, yards_gained).state
    }

    /// Reduce and report what happened.
    pub fn resolve(&self, state: &DriveState, result: PlayResult, yards_gained: i32) -> DriveUpdate {
        contracts::check_yard_line(state.yard_line as i32, "drive start");
        debug_assert!((1..=4).contains(&state.down), "down {} outside 1..=4", state.down);

        let cfg = &self.cfg;
        let mut next = state.clone();

        if state.is_game_over() {
            log::warn!("[LEDGER] play reported after the final whistle: {:?}", result);
            return DriveUpdate {
                state: next,
                result,
                yards_gained: 0,
                scoring_side: None,
                points: 0,
                turnover: false,
                quarter_ended: false,
            };
        }

        let offense = state.possession;
        let defense = offense.opposite();
        let yl = state.yard_line as i32;

        let mut scoring_side = None;
        let mut points = 0;
        let mut turnover = false;

        let gained = match result {
            PlayResult::Incomplete => 0,
            PlayResult::Sack => -yards_gained.abs(),
            PlayResult::Touchdown => yards_gained.max(100 - yl),
            PlayResult::Safety => yards_gained.min(-yl),
            _ => yards_gained,
        };

        let effective = if result == PlayResult::Interception {
            let spot = yl + gained;
            turnover = true;
            if spot <= 0 {
                // Picked in the offense's own end zone: defensive touchdown.
                log::debug!("[LEDGER] interception at {} returned for a touchdown", spot);
                next.score.add(defense, cfg.touchdown_points);
                scoring_side = Some(defense);
                points = cfg.touchdown_points;
                next.change_possession(offense, cfg.kickoff_yard_line, cfg);
            } else {
                let return_line = if spot >= 100 { cfg.touchback_yard_line } else { (100 - spot) as u8 };
                next.change_possession(defense, return_line, cfg);
            }
            PlayResult::Interception
        } else {
            let spot = yl + gained;
            if spot >= 100 {
                next.score.add(offense, cfg.touchdown_points);
                scoring_side = Some(offense);
                points = cfg.touchdown_points;
                next.change_possession(defense, cfg.kickoff_yard_line, cfg);
                PlayResult::Touchdown
            } else if spot <= 0 {
                next.score.add(defense, cfg.safety_points);
                scoring_side = Some(defense);
                points = cfg.safety_points;
                next.change_possession(defense, cfg.kickoff_yard_line, cfg);
                PlayResult::Safety
            } else {
                let spot = spot as u8;
                let moved_chains = matches!(
                    result,
                    PlayResult::Complete | PlayResult::FirstDown
                ) && gained >= state.yards_to_go as i32;

                if moved_chains {
                    next.yard_line = spot;
                    next.down = 1;
                    next.yards_to_go = first_down_distance(spot, cfg);
                    PlayResult::FirstDown
                } else {
                    next.yard_line = spot;
                    next.down = state.down + 1;
                    next.yards_to_go = (state.yards_to_go as i32 - gained).clamp(1, 100 - spot as i32) as u8;

                    if next.down > 4 {
                        log::debug!("[LEDGER] turnover on downs at {}", spot);
                        next.change_possession(defense, 100 - spot, cfg);
                        turnover = true;
                    }
                    match result {
                        PlayResult::Sack => PlayResult::Sack,
                        PlayResult::Incomplete => PlayResult::Incomplete,
                        _ => PlayResult::Complete,
                    }
                }
            }
        };

        if effective == PlayResult::Safety || effective == PlayResult::Touchdown {
            turnover = false;
        }

        let quarter_ended = self.run_clock(&mut next, effective, points > 0);

        contracts::check_yard_line(next.yard_line as i32, "drive end");
        debug_assert!((1..=4).contains(&next.down), "down {} persisted", next.down);

        DriveUpdate {
            state: next,
            result: effective,
            yards_gained: gained,
            scoring_side,
            points,
            turnover,
            quarter_ended,
        }
    }

    /// Run the clock for one play; returns whether a quarter ended.
    fn run_clock(&self, next: &mut DriveState, result: PlayResult, scored: bool) -> bool {
        let cfg = &self.cfg;

        if next.quarter == Quarter::Overtime && scored {
            log::info!("[LEDGER] sudden-death score ends overtime");
            next.quarter = Quarter::Final;
            next.time_remaining = 0;
            return true;
        }

        next.time_remaining = next.time_remaining.saturating_sub(cfg.runoff.for_result(result));
        if next.time_remaining > 0 {
            return false;
        }

        match next.quarter {
            Quarter::First => {
                next.quarter = Quarter::Second;
                next.time_remaining = cfg.quarter_secs;
            }
            Quarter::Second => {
                next.quarter = Quarter::Third;
                next.time_remaining = cfg.quarter_secs;
                let receiving = next.opening_possession.opposite();
                next.change_possession(receiving, cfg.kickoff_yard_line, cfg);
            }
            Quarter::Third => {
                next.quarter = Quarter::Fourth;
                next.time_remaining = cfg.quarter_secs;
            }
            Quarter::Fourth if next.score.is_tied() => {
                next.quarter = Quarter::Overtime;
                next.time_remaining = cfg.overtime_secs;
                let receiving = next.opening_possession;
                next.change_possession(receiving, cfg.kickoff_yard_line, cfg);
            }
            Quarter::Fourth | Quarter::Overtime | Quarter::Final => {
                next.quarter = Quarter::Final;
                next.time_remaining = 0;
            }
        }
        log::debug!("[LEDGER] quarter ended -> {}", next.quarter.label());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ledger() -> DriveLedger {
        DriveLedger::default()
    }

    fn state(down: u8, yards_to_go: u8, yard_line: u8) -> DriveState {
        DriveState {
            down,
            yards_to_go,
            yard_line,
            ..DriveState::kickoff(Side::Home, &LedgerConfig::default())
        }
    }

    #[test]
    fn test_first_down_completion() {
        let next = ledger().reduce(&state(1, 10, 20), PlayResult::Complete, 12);
        assert_eq!((next.down, next.yards_to_go, next.yard_line), (1, 10, 32));
        assert_eq!(next.possession, Side::Home);
    }

    #[test]
    fn test_fourth_down_incomplete_turns_over_on_downs() {
        let update = ledger().resolve(&state(4, 3, 50), PlayResult::Incomplete, 0);
        let next = update.state;
        assert_eq!(next.possession, Side::Away);
        assert_eq!((next.down, next.yards_to_go, next.yard_line), (1, 10, 50));
        assert!(update.turnover);
    }

    #[test]
    fn test_completion_into_end_zone_upgrades_to_touchdown() {
        let before = state(2, 5, 95);
        let update = ledger().resolve(&before, PlayResult::Complete, 5);
        assert_eq!(update.result, PlayResult::Touchdown);
        assert_eq!(update.state.score.home, before.score.home + 6);
        assert_eq!(update.state.yard_line, LedgerConfig::default().kickoff_yard_line);
        assert_eq!(update.state.possession, Side::Away);
        assert_eq!(update.state.down, 1);
    }

    #[test]
    fn test_short_completion_advances_down() {
        let next = ledger().reduce(&state(1, 10, 30), PlayResult::Complete, 4);
        assert_eq!((next.down, next.yards_to_go, next.yard_line), (2, 6, 34));
    }

    #[test]
    fn test_claimed_first_down_without_yardage_is_a_completion() {
        let update = ledger().resolve(&state(1, 10, 30), PlayResult::FirstDown, 3);
        assert_eq!(update.result, PlayResult::Complete);
        assert_eq!(update.state.down, 2);
    }

    #[test]
    fn test_sack_loses_yards_and_adds_distance() {
        let update = ledger().resolve(&state(2, 6, 40), PlayResult::Sack, -7);
        assert_eq!(update.result, PlayResult::Sack);
        assert_eq!((update.state.down, update.state.yards_to_go, update.state.yard_line), (3, 13, 33));
        // Sign of the reported yardage does not matter for a sack.
        assert_eq!(ledger().reduce(&state(2, 6, 40), PlayResult::Sack, 7), update.state);
    }

    #[test]
    fn test_sack_in_own_end_zone_is_a_safety() {
        let update = ledger().resolve(&state(1, 10, 4), PlayResult::Sack, -7);
        assert_eq!(update.result, PlayResult::Safety);
        assert_eq!(update.state.score.away, 2);
        assert_eq!(update.scoring_side, Some(Side::Away));
        assert_eq!(update.state.possession, Side::Away);
        assert_eq!(update.state.yard_line, 25);
    }

    #[test]
    fn test_interception_flips_at_spot() {
        let update = ledger().resolve(&state(2, 10, 30), PlayResult::Interception, 15);
        assert!(update.turnover);
        assert_eq!(update.state.possession, Side::Away);
        assert_eq!(update.state.yard_line, 55); // picked at own 45 → their 55
        assert_eq!((update.state.down, update.state.yards_to_go), (1, 10));
    }

    #[test]
    fn test_interception_in_end_zone_is_a_touchback() {
        let update = ledger().resolve(&state(1, 10, 90), PlayResult::Interception, 14);
        assert_eq!(update.state.yard_line, 20);
        assert_eq!(update.state.possession, Side::Away);
    }

    #[test]
    fn test_interception_in_own_end_zone_scores_for_defense() {
        let update = ledger().resolve(&state(1, 10, 4), PlayResult::Interception, -6);
        assert_eq!(update.result, PlayResult::Interception);
        assert!(update.turnover);
        assert_eq!(update.scoring_side, Some(Side::Away));
        assert_eq!(update.points, 6);
        assert_eq!(update.state.score, Score { home: 0, away: 6 });
        // Defense scored, so the offense gets the kickoff.
        assert_eq!(update.state.possession, Side::Home);
        assert_eq!(update.state.yard_line, LedgerConfig::default().kickoff_yard_line);
        assert_eq!((update.state.down, update.state.yards_to_go), (1, 10));
    }

    #[test]
    fn test_interception_at_own_one_flips_at_ninety_nine() {
        let update = ledger().resolve(&state(1, 10, 4), PlayResult::Interception, -3);
        assert_eq!(update.points, 0);
        assert_eq!(update.state.possession, Side::Away);
        assert_eq!(update.state.yard_line, 99);
        assert_eq!(update.state.yards_to_go, 1);
    }

    #[test]
    fn test_goal_to_go_distance() {
        let next = ledger().reduce(&state(1, 10, 80), PlayResult::Complete, 13);
        assert_eq!(next.yard_line, 93);
        assert_eq!(next.yards_to_go, 7);
        assert!(next.is_goal_to_go());
        assert_eq!(next.line_to_gain(), 100);
        assert_eq!(state(2, 6, 40).line_to_gain(), 46);

        let next = ledger().reduce(&next, PlayResult::Complete, 3);
        assert_eq!((next.down, next.yards_to_go, next.yard_line), (2, 4, 96));
        assert!(next.is_goal_to_go());
    }

    #[test]
    fn test_four_incompletions_flip_possession_once() {
        let l = ledger();
        let mut s = state(1, 10, 35);
        let mut flips = 0;
        for _ in 0..4 {
            let before = s.possession;
            s = l.reduce(&s, PlayResult::Incomplete, 0);
            if s.possession != before {
                flips += 1;
            }
            assert!((1..=4).contains(&s.down));
        }
        assert_eq!(flips, 1);
        assert_eq!(s.yard_line, 65);
        assert_eq!(s.down, 1);
    }

    #[test]
    fn test_halftime_gives_ball_to_other_team() {
        let mut s = state(2, 8, 40);
        s.quarter = Quarter::Second;
        s.time_remaining = 3;
        let update = ledger().resolve(&s, PlayResult::Complete, 1);
        assert!(update.quarter_ended);
        assert_eq!(update.state.quarter, Quarter::Third);
        assert_eq!(update.state.possession, Side::Away);
        assert_eq!(update.state.yard_line, 25);
        assert_eq!(update.state.time_remaining, 180);
    }

    #[test]
    fn test_end_of_regulation() {
        let mut s = state(1, 10, 40);
        s.quarter = Quarter::Fourth;
        s.time_remaining = 1;
        s.score = Score { home: 7, away: 0 };
        let next = ledger().reduce(&s, PlayResult::Incomplete, 0);
        assert!(next.is_game_over());

        s.score = Score { home: 6, away: 6 };
        let next = ledger().reduce(&s, PlayResult::Incomplete, 0);
        assert_eq!(next.quarter, Quarter::Overtime);
        assert_eq!(next.possession, s.opening_possession);
    }

    #[test]
    fn test_overtime_score_ends_game() {
        let mut s = state(1, 10, 90);
        s.quarter = Quarter::Overtime;
        let next = ledger().reduce(&s, PlayResult::Complete, 10);
        assert!(next.is_game_over());
        assert_eq!(next.score.home, 6);
    }

    #[test]
    fn test_reduction_after_final_is_noop() {
        let mut s = state(1, 10, 40);
        s.quarter = Quarter::Final;
        assert_eq!(ledger().reduce(&s, PlayResult::Complete, 30), s);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_result() -> impl Strategy<Value = PlayResult> {
            prop_oneof![
                Just(PlayResult::Touchdown),
                Just(PlayResult::FirstDown),
                Just(PlayResult::Complete),
                Just(PlayResult::Incomplete),
                Just(PlayResult::Sack),
                Just(PlayResult::Interception),
                Just(PlayResult::Safety),
            ]
        }

        proptest! {
            #[test]
            fn prop_invariants_hold_over_any_sequence(
                plays in prop::collection::vec((any_result(), -15i32..60), 1..60)
            ) {
                let l = ledger();
                let mut s = l.opening_state(Side::Home);
                for (result, yards) in plays {
                    if s.is_game_over() {
                        break;
                    }
                    let update = l.resolve(&s, result, yards);
                    let next = update.state;
                    prop_assert!((1..=4).contains(&next.down));
                    prop_assert!(next.yard_line >= 1 && next.yard_line <= 99);
                    prop_assert!(next.yards_to_go >= 1);
                    prop_assert!(next.yard_line as u16 + next.yards_to_go as u16 <= 100);
                    prop_assert!(next.score.home >= s.score.home && next.score.away >= s.score.away);
                    if update.result == PlayResult::Touchdown {
                        prop_assert_eq!(next.score.get(s.possession), s.score.get(s.possession) + 6);
                        prop_assert_eq!(next.yard_line, 25);
                    }
                    s = next;
                }
            }

            #[test]
            fn prop_failed_downs_flip_exactly_once(yard_line in 1u8..99, gains in prop::collection::vec(0i32..2, 4)) {
                let l = ledger();
                let mut s = state(1, 10, yard_line);
                s.yards_to_go = first_down_distance(yard_line, l.config());
                let start_side = s.possession;
                // One-yard gains cannot move the chains unless the goal line is close.
                prop_assume!(yard_line <= 80);
                let mut flips = 0;
                for g in gains {
                    let before = s.possession;
                    s = l.reduce(&s, PlayResult::Complete, g);
                    if s.possession != before {
                        flips += 1;
                    }
                }
                prop_assert_eq!(flips, 1);
                prop_assert_eq!(s.possession, start_side.opposite());
                prop_assert_eq!(s.down, 1);
            }
        }
    }
}
