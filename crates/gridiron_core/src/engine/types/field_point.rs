//! Play-local field geometry
//!
//! Everything inside a single play is expressed in yards, relative to the
//! line of scrimmage:
//! - `x`: lateral distance from the left sideline (0.0 ~ 53.3)
//! - `y`: depth downfield from the line of scrimmage (negative = backfield)
//!
//! Absolute field position (the yard line, 0 = own goal line) only exists in
//! the drive ledger. A play converts between the two with its line of
//! scrimmage.

use serde::{Deserialize, Serialize};

/// Field width (sideline to sideline) in yards.
pub const FIELD_WIDTH_YDS: f32 = 53.3;

/// Lateral centre of the field.
pub const CENTER_X: f32 = FIELD_WIDTH_YDS / 2.0;

/// Length of the field between the goal lines.
pub const FIELD_LENGTH_YDS: f32 = 100.0;

/// End zone depth behind each goal line.
pub const END_ZONE_DEPTH_YDS: f32 = 10.0;

/// Deepest a route may be drawn behind the line of scrimmage.
pub const MAX_BACKFIELD_DEPTH_YDS: f32 = 15.0;

/// A point in the play-local frame (yards).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FieldPoint {
    pub x: f32,
    pub y: f32,
}

impl FieldPoint {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Quarterback alignment under centre.
    pub const fn under_center() -> Self {
        Self { x: CENTER_X, y: -1.0 }
    }

    pub fn distance_to(&self, other: &FieldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation. `t` is not clamped.
    pub fn lerp(&self, to: &FieldPoint, t: f32) -> FieldPoint {
        FieldPoint { x: self.x + (to.x - self.x) * t, y: self.y + (to.y - self.y) * t }
    }

    /// Move toward `target` by at most `max_step` yards, never overshooting.
    pub fn step_toward(&self, target: &FieldPoint, max_step: f32) -> FieldPoint {
        let dist = self.distance_to(target);
        if dist <= max_step || dist < 1e-6 {
            return *target;
        }
        self.lerp(target, max_step / dist)
    }

    pub fn offset(&self, dx: f32, dy: f32) -> FieldPoint {
        FieldPoint { x: self.x + dx, y: self.y + dy }
    }

    /// Inside the sidelines.
    pub fn is_inbounds_laterally(&self) -> bool {
        self.x >= 0.0 && self.x <= FIELD_WIDTH_YDS
    }

    /// Absolute yard line of this point for a given line of scrimmage.
    pub fn absolute_yard_line(&self, line_of_scrimmage: u8) -> f32 {
        line_of_scrimmage as f32 + self.y
    }

    /// Whether the point is playable for a snap at `line_of_scrimmage`:
    /// between the sidelines and between the two end lines.
    pub fn is_on_field(&self, line_of_scrimmage: u8) -> bool {
        let abs = self.absolute_yard_line(line_of_scrimmage);
        self.is_inbounds_laterally()
            && abs >= -END_ZONE_DEPTH_YDS
            && abs <= FIELD_LENGTH_YDS + END_ZONE_DEPTH_YDS
    }
}
