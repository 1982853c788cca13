//! Positioned, oriented points on the track plane.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Heading;

/// A position on the track plane together with a direction of travel.
///
/// Used both for car positions and for crossing points. Equality compares
/// coordinates exactly, which is what the "passed" predicates rely on for
/// axis alignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrientedPoint {
    pub x: f64,
    pub y: f64,
    pub heading: Heading,
}

impl OrientedPoint {
    /// Create a new point.
    pub fn new(x: f64, y: f64, heading: Heading) -> Self {
        Self { x, y, heading }
    }

    /// True if both points sit at the same coordinates, whatever their heading.
    pub fn same_position(&self, other: &OrientedPoint) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl fmt::Display for OrientedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {}", self.x, self.y, self.heading)
    }
}
