//! Defensive coverage
//!
//! ## Policies
//! - Zone family (cover2 / cover3 / zone): drop from the alignment to a fixed
//!   landmark, then break on the ball target once it has been in the air for
//!   `zone_reaction_secs`.
//! - Man: shadow one receiver with a fixed cushion, `man_reaction_secs` late.
//! - Blitz: one defender rushes the quarterback's set point; everyone else
//!   plays man.
//!
//! Defender positions are pure functions of (assignment, elapsed time since
//! the snap, throw release). Nothing is integrated tick by tick, so sampling
//! the same instant twice always returns the same formation.
//!
//! ## Pre-snap selection
//! `select_coverage` draws a `CoverageType` from a weight table derived from
//! one difficulty scalar. The RNG is injected so tests can seed it.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::config::{CoverageConfig, RouteConfig};
use super::routes;
use super::types::{FieldPoint, CENTER_X};
use crate::data::PlayDefinition;

// ============================================================================
// Coverage types and selection
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverageType {
    Cover2,
    Cover3,
    Man,
    Zone,
    Blitz,
}

impl CoverageType {
    pub const ALL: [CoverageType; 5] = [
        CoverageType::Cover2,
        CoverageType::Cover3,
        CoverageType::Man,
        CoverageType::Zone,
        CoverageType::Blitz,
    ];

    pub fn is_zone_family(&self) -> bool {
        matches!(self, CoverageType::Cover2 | CoverageType::Cover3 | CoverageType::Zone)
    }

    pub fn label(&self) -> &'static str {
        match self {
            CoverageType::Cover2 => "Cover 2",
            CoverageType::Cover3 => "Cover 3",
            CoverageType::Man => "Man",
            CoverageType::Zone => "Zone",
            CoverageType::Blitz => "Blitz",
        }
    }
}

/// Selection probabilities for one difficulty value. Always sums to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageWeights {
    pub cover2: f32,
    pub cover3: f32,
    pub man: f32,
    pub zone: f32,
    pub blitz: f32,
}

/// Difficulty at which the weight table stops changing.
pub const MAX_DIFFICULTY: f32 = 2.0;

impl CoverageWeights {
    /// Weight table for `difficulty` (clamped to `0..=MAX_DIFFICULTY`).
    ///
    /// | coverage | d = 0 | d = 2 |
    /// |----------|-------|-------|
    /// | cover2   | 0.15  | 0.10  |
    /// | cover3   | 0.15  | 0.10  |
    /// | zone     | 0.55  | 0.10  |
    /// | man      | 0.10  | 0.40  |
    /// | blitz    | 0.05  | 0.30  |
    pub fn for_difficulty(difficulty: f32) -> Self {
        let d = if difficulty.is_finite() { difficulty.clamp(0.0, MAX_DIFFICULTY) } else { 0.0 };
        let s = d / MAX_DIFFICULTY;
        Self {
            cover2: 0.15 - 0.05 * s,
            cover3: 0.15 - 0.05 * s,
            zone: 0.55 - 0.45 * s,
            man: 0.10 + 0.30 * s,
            blitz: 0.05 + 0.25 * s,
        }
    }

    pub fn probability(&self, coverage: CoverageType) -> f32 {
        match coverage {
            CoverageType::Cover2 => self.cover2,
            CoverageType::Cover3 => self.cover3,
            CoverageType::Man => self.man,
            CoverageType::Zone => self.zone,
            CoverageType::Blitz => self.blitz,
        }
    }

    /// Weights in `CoverageType::ALL` order.
    pub fn as_array(&self) -> [f32; 5] {
        CoverageType::ALL.map(|c| self.probability(c))
    }
}

/// Weighted pre-snap coverage draw.
pub fn select_coverage<R: Rng + ?Sized>(difficulty: f32, rng: &mut R) -> CoverageType {
    let weights = CoverageWeights::for_difficulty(difficulty);
    match WeightedIndex::new(weights.as_array()) {
        Ok(dist) => CoverageType::ALL[dist.sample(rng)],
        Err(err) => {
            log::error!("[COVERAGE] invalid weight table {:?}: {}", weights, err);
            CoverageType::Zone
        }
    }
}

// ============================================================================
// Assignments and layouts
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Assignment {
    Zone { centroid: FieldPoint },
    Man { receiver: usize, offset: FieldPoint },
    Blitz,
}

/// Where a defender lines up and what it is responsible for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenderSetup {
    pub alignment: FieldPoint,
    pub assignment: Assignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenderState {
    pub position: FieldPoint,
    pub assignment: Assignment,
}

const COVER2_LANDMARKS: [(f32, f32); 5] =
    [(13.3, 18.0), (40.0, 18.0), (8.0, 6.0), (CENTER_X, 7.0), (45.3, 6.0)];
const COVER3_LANDMARKS: [(f32, f32); 5] =
    [(9.0, 16.0), (CENTER_X, 20.0), (44.3, 16.0), (17.0, 6.0), (36.3, 6.0)];
const ZONE_LANDMARKS: [(f32, f32); 5] =
    [(8.0, 5.0), (20.0, 6.0), (33.3, 6.0), (45.3, 5.0), (CENTER_X, 16.0)];
const DEEP_SAFETY: (f32, f32) = (CENTER_X, 18.0);
const BLITZ_ALIGNMENT: (f32, f32) = (CENTER_X + 4.0, 1.0);

fn zone_defender(landmark: (f32, f32)) -> DefenderSetup {
    let centroid = FieldPoint::new(landmark.0, landmark.1);
    DefenderSetup {
        alignment: FieldPoint::new(centroid.x, centroid.y * 0.6),
        assignment: Assignment::Zone { centroid },
    }
}

fn man_defenders(play: &PlayDefinition, cfg: &CoverageConfig) -> Vec<DefenderSetup> {
    play.routes
        .iter()
        .enumerate()
        .map(|(idx, route)| {
            let align = route.alignment();
            // Shade toward the middle of the field.
            let inside = if align.x <= CENTER_X { 1.0 } else { -1.0 };
            let offset = FieldPoint::new(cfg.man_offset.x * inside, cfg.man_offset.y);
            DefenderSetup {
                alignment: align.offset(offset.x, offset.y),
                assignment: Assignment::Man { receiver: idx, offset },
            }
        })
        .collect()
}

/// Defender setups for `coverage` against `play`.
pub fn coverage_layout(
    coverage: CoverageType,
    play: &PlayDefinition,
    cfg: &CoverageConfig,
) -> Vec<DefenderSetup> {
    match coverage {
        CoverageType::Cover2 => COVER2_LANDMARKS.iter().copied().map(zone_defender).collect(),
        CoverageType::Cover3 => COVER3_LANDMARKS.iter().copied().map(zone_defender).collect(),
        CoverageType::Zone => ZONE_LANDMARKS.iter().copied().map(zone_defender).collect(),
        CoverageType::Man => {
            let mut layout = man_defenders(play, cfg);
            layout.push(zone_defender(DEEP_SAFETY));
            layout
        }
        CoverageType::Blitz => {
            let mut layout = man_defenders(play, cfg);
            layout.push(DefenderSetup {
                alignment: FieldPoint::new(BLITZ_ALIGNMENT.0, BLITZ_ALIGNMENT.1),
                assignment: Assignment::Blitz,
            });
            layout
        }
    }
}

// ============================================================================
// Movement
// ============================================================================

/// Ball release as seen by the defense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThrowRelease {
    /// Seconds after the snap
    pub released_at: f32,
    pub target: FieldPoint,
}

/// Everything a defender reacts to during one play.
#[derive(Debug, Clone, Copy)]
pub struct CoverageContext<'a> {
    pub play: &'a PlayDefinition,
    pub routes: &'a RouteConfig,
    pub coverage: &'a CoverageConfig,
    /// Where the blitzer is headed
    pub qb_set_point: FieldPoint,
}

impl<'a> CoverageContext<'a> {
    /// Defender position `elapsed` seconds after the snap.
    pub fn defender_position(
        &self,
        setup: &DefenderSetup,
        elapsed: f32,
        release: Option<&ThrowRelease>,
    ) -> FieldPoint {
        match setup.assignment {
            Assignment::Zone { centroid } => self.zone_position(setup.alignment, centroid, elapsed, release),
            Assignment::Man { receiver, offset } => match self.play.routes.get(receiver) {
                Some(route) => {
                    let lagged = elapsed - self.coverage.man_reaction_secs;
                    routes::receiver_position(route, lagged, self.routes).offset(offset.x, offset.y)
                }
                None => setup.alignment,
            },
            Assignment::Blitz => {
                let rush = (elapsed - self.coverage.blitz_delay_secs).max(0.0);
                setup.alignment.step_toward(&self.qb_set_point, rush * self.coverage.blitz_speed_yps)
            }
        }
    }

    fn zone_position(
        &self,
        alignment: FieldPoint,
        centroid: FieldPoint,
        elapsed: f32,
        release: Option<&ThrowRelease>,
    ) -> FieldPoint {
        let drop = |t: f32| alignment.lerp(&centroid, (t / self.coverage.zone_drop_secs).clamp(0.0, 1.0));

        match release {
            Some(r) => {
                let break_at = r.released_at + self.coverage.zone_reaction_secs;
                if elapsed <= break_at {
                    drop(elapsed)
                } else {
                    let chase = (elapsed - break_at) * self.coverage.defender_speed_yps;
                    drop(break_at).step_toward(&r.target, chase)
                }
            }
            None => drop(elapsed),
        }
    }

    pub fn defender_states(
        &self,
        layout: &[DefenderSetup],
        elapsed: f32,
        release: Option<&ThrowRelease>,
    ) -> Vec<DefenderState> {
        layout
            .iter()
            .map(|setup| DefenderState {
                position: self.defender_position(setup, elapsed, release),
                assignment: setup.assignment,
            })
            .collect()
    }

    /// Seconds after the snap at which the blitzer (if any) gets within
    /// tackle range of the quarterback's set point.
    pub fn blitz_arrival(&self, layout: &[DefenderSetup]) -> Option<f32> {
        layout
            .iter()
            .filter(|s| matches!(s.assignment, Assignment::Blitz))
            .map(|s| {
                let path = (s.alignment.distance_to(&self.qb_set_point) - self.coverage.tackle_radius_yds)
                    .max(0.0);
                self.coverage.blitz_delay_secs + path / self.coverage.blitz_speed_yps
            })
            .reduce(f32::min)
    }
}

/// Distance from `point` to the closest defender.
pub fn nearest_defender_distance(defenders: &[DefenderState], point: &FieldPoint) -> Option<f32> {
    defenders.iter().map(|d| d.position.distance_to(point)).reduce(f32::min)
}
