//! Play Definition Catalog
//!
//! Immutable route packages the offense can call. Plays are validated once at
//! load time; a malformed play is rejected (and logged) so it can never be
//! selected, instead of failing in the middle of a snap.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::engine::types::{FieldPoint, FIELD_WIDTH_YDS, MAX_BACKFIELD_DEPTH_YDS};
use crate::error::CatalogError;

/// Deepest waypoint a route may use (yards past the line of scrimmage).
pub const MAX_ROUTE_DEPTH_YDS: f32 = 60.0;

/// Risk classification of a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Safe,
    Balanced,
    Aggressive,
}

impl RiskLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::Balanced => "Balanced",
            Self::Aggressive => "Aggressive",
        }
    }
}

/// One receiver's route. The first waypoint is the alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub waypoints: Vec<FieldPoint>,
}

impl Route {
    pub fn new(name: &str, waypoints: &[(f32, f32)]) -> Self {
        Self {
            name: name.to_string(),
            waypoints: waypoints.iter().map(|&(x, y)| FieldPoint::new(x, y)).collect(),
        }
    }

    pub fn alignment(&self) -> FieldPoint {
        self.waypoints.first().copied().unwrap_or_default()
    }

    /// Total polyline length in yards.
    pub fn length(&self) -> f32 {
        self.waypoints.windows(2).map(|w| w[0].distance_to(&w[1])).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayDefinition {
    pub id: String,
    pub name: String,
    pub risk: RiskLevel,
    pub routes: Vec<Route>,
}

impl PlayDefinition {
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.trim().is_empty() {
            return Err(CatalogError::EmptyId { play: self.name.clone() });
        }
        if self.routes.is_empty() {
            return Err(CatalogError::EmptyRoutes { play: self.id.clone() });
        }
        for route in &self.routes {
            if route.waypoints.is_empty() {
                return Err(CatalogError::EmptyWaypoints {
                    play: self.id.clone(),
                    route: route.name.clone(),
                });
            }
            let bad = route.waypoints.iter().position(|p| {
                !p.x.is_finite()
                    || !p.y.is_finite()
                    || !p.is_inbounds_laterally()
                    || p.y < -MAX_BACKFIELD_DEPTH_YDS
                    || p.y > MAX_ROUTE_DEPTH_YDS
            });
            if let Some(index) = bad {
                return Err(CatalogError::WaypointOutOfBounds {
                    play: self.id.clone(),
                    route: route.name.clone(),
                    index,
                });
            }
        }
        Ok(())
    }
}

/// A play that failed validation, kept for diagnostics.
#[derive(Debug)]
pub struct RejectedPlay {
    pub id: String,
    pub error: CatalogError,
}

#[derive(Debug, Default)]
pub struct PlayCatalog {
    plays: Vec<PlayDefinition>,
    rejected: Vec<RejectedPlay>,
}

impl PlayCatalog {
    /// Built-in playbook.
    pub fn builtin() -> Self {
        Self::from_definitions(default_plays())
    }

    /// Validate definitions one by one; invalid or duplicate plays are
    /// rejected, the rest become selectable.
    pub fn from_definitions(definitions: Vec<PlayDefinition>) -> Self {
        let mut catalog = Self::default();
        let mut seen = HashSet::new();

        for play in definitions {
            let check = play.validate().and_then(|_| {
                if seen.contains(&play.id) {
                    Err(CatalogError::DuplicateId(play.id.clone()))
                } else {
                    Ok(())
                }
            });
            match check {
                Ok(()) => {
                    seen.insert(play.id.clone());
                    catalog.plays.push(play);
                }
                Err(error) => {
                    log::warn!("[CATALOG] rejecting play '{}': {}", play.id, error);
                    catalog.rejected.push(RejectedPlay { id: play.id, error });
                }
            }
        }

        catalog
    }

    /// Load a JSON array of play definitions.
    ///
    /// Malformed JSON fails the whole load; individually invalid plays are
    /// only rejected.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<PlayDefinition> = serde_json::from_str(json)?;
        Ok(Self::from_definitions(definitions))
    }

    pub fn get(&self, id: &str) -> Option<&PlayDefinition> {
        self.plays.iter().find(|p| p.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayDefinition> {
        self.plays.iter()
    }

    pub fn by_risk(&self, risk: RiskLevel) -> impl Iterator<Item = &PlayDefinition> {
        self.plays.iter().filter(move |p| p.risk == risk)
    }

    pub fn len(&self) -> usize {
        self.plays.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plays.is_empty()
    }

    pub fn rejected(&self) -> &[RejectedPlay] {
        &self.rejected
    }
}

fn play(id: &str, name: &str, risk: RiskLevel, routes: Vec<Route>) -> PlayDefinition {
    PlayDefinition { id: id.to_string(), name: name.to_string(), risk, routes }
}

/// Default playbook (x: yards from left sideline, y: depth from the line)
fn default_plays() -> Vec<PlayDefinition> {
    let right = FIELD_WIDTH_YDS;
    vec![
        play(
            "quick_slants",
            "Quick Slants",
            RiskLevel::Safe,
            vec![
                Route::new("X", &[(4.0, 0.0), (4.0, 3.0), (12.0, 8.0)]),
                Route::new("Z", &[(right - 4.0, 0.0), (right - 4.0, 3.0), (right - 12.0, 8.0)]),
                Route::new("RB", &[(29.0, -5.0), (35.0, -3.0), (44.0, -1.0)]),
            ],
        ),
        play(
            "curl_flat",
            "Curl Flat",
            RiskLevel::Safe,
            vec![
                Route::new("X", &[(6.0, 0.0), (6.0, 11.0), (7.5, 9.0)]),
                Route::new("H", &[(14.0, 0.0), (14.0, 2.0), (3.0, 3.0)]),
                Route::new("Z", &[(right - 6.0, 0.0), (right - 6.0, 11.0), (right - 7.5, 9.0)]),
            ],
        ),
        play(
            "mesh",
            "Mesh",
            RiskLevel::Balanced,
            vec![
                Route::new("H", &[(15.0, 0.0), (18.0, 4.0), (38.0, 5.0)]),
                Route::new("Y", &[(right - 15.0, 0.0), (35.0, 5.0), (14.0, 6.0)]),
                Route::new("Z", &[(right - 4.0, 0.0), (right - 4.0, 10.0), (right - 1.3, 18.0)]),
            ],
        ),
        play(
            "smash",
            "Smash",
            RiskLevel::Balanced,
            vec![
                Route::new("X", &[(4.0, 0.0), (4.0, 5.0)]),
                Route::new("H", &[(12.0, 0.0), (12.0, 10.0), (3.0, 18.0)]),
                Route::new("Y", &[(33.0, 0.0), (33.0, 16.0)]),
            ],
        ),
        play(
            "four_verticals",
            "Four Verticals",
            RiskLevel::Aggressive,
            vec![
                Route::new("X", &[(4.0, 0.0), (4.0, 35.0)]),
                Route::new("H", &[(15.0, 0.0), (18.0, 35.0)]),
                Route::new("Y", &[(right - 15.0, 0.0), (right - 18.0, 35.0)]),
                Route::new("Z", &[(right - 4.0, 0.0), (right - 4.0, 35.0)]),
            ],
        ),
        play(
            "post_wheel",
            "Post Wheel",
            RiskLevel::Aggressive,
            vec![
                Route::new("X", &[(5.0, 0.0), (5.0, 12.0), (20.0, 28.0)]),
                Route::new("RB", &[(29.0, -5.0), (40.0, -2.0), (49.0, 6.0), (49.0, 30.0)]),
                Route::new("Z", &[(right - 5.3, 0.0), (right - 5.3, 14.0), (30.0, 15.0)]),
            ],
        ),
    ]
}
