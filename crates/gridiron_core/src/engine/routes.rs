//! Receiver routes
//!
//! A receiver's position is a pure function of time since the snap:
//! progress grows at a fixed rate (`RouteConfig::route_secs` for the whole
//! route) and is mapped onto the waypoint polyline by arc length, so a
//! receiver covers every leg at the same speed.

use serde::{Deserialize, Serialize};

use super::config::RouteConfig;
use super::contracts;
use super::types::FieldPoint;
use crate::data::{PlayDefinition, Route};

/// Route progress after `elapsed` seconds since the snap.
pub fn route_progress(elapsed_since_snap: f32, cfg: &RouteConfig) -> f32 {
    (elapsed_since_snap / cfg.route_secs).clamp(0.0, 1.0)
}

/// Point at fraction `p` of the polyline's length.
pub fn position_along(waypoints: &[FieldPoint], p: f32) -> FieldPoint {
    contracts::check_progress(p, "route");

    let first = match waypoints.first() {
        Some(first) => *first,
        None => return FieldPoint::default(),
    };
    let total: f32 = waypoints.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    if total < 1e-6 {
        return first;
    }

    let mut remaining = p * total;
    for leg in waypoints.windows(2) {
        let len = leg[0].distance_to(&leg[1]);
        if remaining <= len {
            if len < 1e-6 {
                return leg[1];
            }
            return leg[0].lerp(&leg[1], remaining / len);
        }
        remaining -= len;
    }

    waypoints.last().copied().unwrap_or(first)
}

/// Receiver position at `elapsed` seconds after the snap.
pub fn receiver_position(route: &Route, elapsed_since_snap: f32, cfg: &RouteConfig) -> FieldPoint {
    position_along(&route.waypoints, route_progress(elapsed_since_snap, cfg))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverState {
    /// Index into the play's route list
    pub route: usize,
    pub name: String,
    pub position: FieldPoint,
    pub progress: f32,
}

/// All receivers of `play` at `elapsed` seconds after the snap.
pub fn receiver_states(
    play: &PlayDefinition,
    elapsed_since_snap: f32,
    cfg: &RouteConfig,
) -> Vec<ReceiverState> {
    let progress = route_progress(elapsed_since_snap, cfg);
    play.routes
        .iter()
        .enumerate()
        .map(|(idx, route)| ReceiverState {
            route: idx,
            name: route.name.clone(),
            position: position_along(&route.waypoints, progress),
            progress,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RiskLevel;

    fn out_route() -> Route {
        Route::new("X", &[(10.0, 0.0), (10.0, 6.0), (2.0, 6.0)])
    }

    #[test]
    fn test_progress_endpoints() {
        let route = out_route();
        assert_eq!(position_along(&route.waypoints, 0.0), FieldPoint::new(10.0, 0.0));
        assert_eq!(position_along(&route.waypoints, 1.0), FieldPoint::new(2.0, 6.0));
    }

    #[test]
    fn test_arc_length_interpolation_crosses_legs() {
        // 6 + 8 = 14 yards; half way is 1 yard into the second leg.
        let p = position_along(&out_route().waypoints, 0.5);
        assert!((p.x - 9.0).abs() < 1e-4);
        assert!((p.y - 6.0).abs() < 1e-4);
    }

    #[test]
    fn test_single_waypoint_route_is_stationary() {
        let route = Route::new("TE", &[(30.0, 0.0)]);
        let cfg = RouteConfig::default();
        assert_eq!(receiver_position(&route, 0.0, &cfg), FieldPoint::new(30.0, 0.0));
        assert_eq!(receiver_position(&route, 5.0, &cfg), FieldPoint::new(30.0, 0.0));
    }

    #[test]
    fn test_progress_halts_at_route_end() {
        let cfg = RouteConfig::default();
        assert_eq!(route_progress(-1.0, &cfg), 0.0);
        assert_eq!(route_progress(cfg.route_secs * 2.0, &cfg), 1.0);
    }

    #[test]
    fn test_receiver_states_cover_every_route() {
        let play = PlayDefinition {
            id: "t".into(),
            name: "T".into(),
            risk: RiskLevel::Safe,
            routes: vec![out_route(), Route::new("Z", &[(40.0, 0.0), (40.0, 12.0)])],
        };
        let states = receiver_states(&play, 1.5, &RouteConfig::default());
        assert_eq!(states.len(), 2);
        assert_eq!(states[1].route, 1);
        assert!((states[1].position.y - 6.0).abs() < 1e-4);
        assert_eq!(states, receiver_states(&play, 1.5, &RouteConfig::default()));
    }
}
