//! Distance and "passed" predicates on the track plane.
//!
//! All functions are pure. `y` grows towards the South, so a car heading
//! North has passed a crossing once its `y` is smaller than the crossing's.

use crate::domain::{Heading, OrientedPoint};

/// Manhattan distance between two points. Headings are ignored.
pub fn distance(a: &OrientedPoint, b: &OrientedPoint) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

/// True if `car` is strictly beyond `crossing` along its heading.
///
/// No alignment is required on the perpendicular axis. This is used to
/// classify which cars of a train are still behind a crossing.
pub fn has_passed_loose(car: &OrientedPoint, crossing: &OrientedPoint) -> bool {
    match car.heading {
        Heading::East => car.x > crossing.x,
        Heading::South => car.y > crossing.y,
        Heading::West => car.x < crossing.x,
        Heading::North => car.y < crossing.y,
    }
}

/// True if `car` is exactly on the crossing's line of travel and strictly
/// beyond it.
///
/// A car heading East or West must share the crossing's `y`; one heading
/// North or South must share its `x`. Used for the tail car of a train to
/// decide when the whole train has cleared a crossing.
pub fn has_passed(car: &OrientedPoint, crossing: &OrientedPoint) -> bool {
    let aligned = if car.heading.is_horizontal() {
        car.y == crossing.y
    } else {
        car.x == crossing.x
    };

    aligned && has_passed_loose(car, crossing)
}
