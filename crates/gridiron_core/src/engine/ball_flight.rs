//! Ball flight trajectory
//!
//! A pass is a straight planar line from release point to target with a
//! parabolic height bump on top:
//! - xy(t) = lerp(start, target, t)
//! - z(t)  = 4 * max_arc * t * (1 - t)   (0 at both ends, peak at t = 0.5)
//!
//! `max_arc` and the flight duration both scale with throw distance and are
//! capped by `FlightConfig`. Every method is a pure function of `t`.

use serde::{Deserialize, Serialize};

use super::config::FlightConfig;
use super::contracts;
use super::types::FieldPoint;

/// Peak arc height for a throw of `distance` yards.
pub fn max_arc_height(distance: f32, cfg: &FlightConfig) -> f32 {
    (distance.max(0.0) * cfg.arc_per_yard).min(cfg.arc_cap_yds)
}

/// Flight duration for a throw of `distance` yards.
pub fn flight_duration(distance: f32, cfg: &FlightConfig) -> f32 {
    (distance.max(0.0) / cfg.throw_speed_yps).clamp(cfg.min_flight_secs, cfg.max_flight_secs)
}

/// A thrown ball from release to arrival.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallFlight {
    pub start: FieldPoint,
    pub target: FieldPoint,
    pub duration_secs: f32,
    pub max_arc_yds: f32,
    spin_rps: f32,
}

/// Everything a renderer needs at one instant of flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallSample {
    pub progress: f32,
    pub position: FieldPoint,
    pub height_yds: f32,
    /// Spiral angle in radians (cosmetic)
    pub spin_rad: f32,
}

impl BallFlight {
    pub fn launch(start: FieldPoint, target: FieldPoint, cfg: &FlightConfig) -> Self {
        let distance = start.distance_to(&target);
        Self {
            start,
            target,
            duration_secs: flight_duration(distance, cfg),
            max_arc_yds: max_arc_height(distance, cfg),
            spin_rps: cfg.spin_rps,
        }
    }

    pub fn distance(&self) -> f32 {
        self.start.distance_to(&self.target)
    }

    /// Planar position at progress `t`.
    pub fn position(&self, t: f32) -> FieldPoint {
        contracts::check_progress(t, "flight");
        self.start.lerp(&self.target, t)
    }

    /// Height above the ground at progress `t`.
    pub fn arc_height(&self, t: f32) -> f32 {
        contracts::check_progress(t, "flight");
        4.0 * t * (1.0 - t) * self.max_arc_yds
    }

    /// Spiral angle at progress `t`; non-decreasing in `t`.
    pub fn spin(&self, t: f32) -> f32 {
        contracts::check_progress(t, "flight");
        t * self.duration_secs * self.spin_rps * std::f32::consts::TAU
    }

    pub fn sample(&self, t: f32) -> BallSample {
        BallSample {
            progress: t,
            position: self.position(t),
            height_yds: self.arc_height(t),
            spin_rad: self.spin(t),
        }
    }

    /// Progress after `elapsed` seconds of flight, saturating at 1.
    pub fn progress_after(&self, elapsed: f32) -> f32 {
        (elapsed / self.duration_secs).clamp(0.0, 1.0)
    }
}

/// A ball in the air during one play.
///
/// Owned by the play session; progress only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub flight: BallFlight,
    /// Session time of release (s)
    pub released_at: f32,
    pub progress: f32,
    pub in_flight: bool,
}

impl BallState {
    pub fn release(flight: BallFlight, released_at: f32) -> Self {
        Self { flight, released_at, progress: 0.0, in_flight: true }
    }

    /// Session time at which the ball reaches its target.
    pub fn arrives_at(&self) -> f32 {
        self.released_at + self.flight.duration_secs
    }

    /// Progress the ball would have at session time `now`.
    pub fn progress_at(&self, now: f32) -> f32 {
        self.flight.progress_after(now - self.released_at)
    }

    /// Advance to session time `now`. Progress never decreases.
    pub fn advance(&mut self, now: f32) {
        if !self.in_flight {
            return;
        }
        let next = self.progress_at(now);
        debug_assert!(next >= self.progress, "ball progress moved backwards");
        self.progress = next.max(self.progress);
    }

    pub fn land(&mut self) {
        self.in_flight = false;
    }

    pub fn sample(&self) -> BallSample {
        self.flight.sample(self.progress)
    }
}
