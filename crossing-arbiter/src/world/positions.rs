//! Latest known position of every car.

use std::collections::HashMap;

use crate::domain::{CarId, OrientedPoint};
use crate::geometry::distance;

/// Map from car to its most recently reported position.
///
/// Entries are never removed; each key holds the last value written.
#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    positions: HashMap<CarId, OrientedPoint>,
}

impl PositionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a report into the store, overwriting previous values.
    pub fn update<'a>(&mut self, report: impl IntoIterator<Item = (&'a CarId, &'a OrientedPoint)>) {
        for (car, point) in report {
            self.positions.insert(car.clone(), *point);
        }
    }

    /// Latest position of a car, if it has ever reported.
    pub fn get(&self, car: &str) -> Option<&OrientedPoint> {
        self.positions.get(car)
    }

    /// Number of cars with a known position.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no position has been recorded.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Iterate over every known position.
    pub fn iter(&self) -> impl Iterator<Item = (&CarId, &OrientedPoint)> {
        self.positions.iter()
    }

    /// Cars of this store strictly within `radius` of `target`.
    ///
    /// See [`neighbors`].
    pub fn neighbors(
        &self,
        target: &OrientedPoint,
        radius: f64,
        exclude: impl Fn(&CarId) -> bool,
    ) -> HashMap<&CarId, OrientedPoint> {
        neighbors(target, radius, self.iter(), exclude)
    }
}

/// Entries of `population` whose distance to `target` is strictly between
/// zero and `radius`, skipping identifiers for which `exclude` is true.
///
/// A point at exactly the target position is never its own neighbour.
pub fn neighbors<'a, I>(
    target: &OrientedPoint,
    radius: f64,
    population: I,
    exclude: impl Fn(&CarId) -> bool,
) -> HashMap<&'a CarId, OrientedPoint>
where
    I: IntoIterator<Item = (&'a CarId, &'a OrientedPoint)>,
{
    population
        .into_iter()
        .filter(|(car, point)| {
            let d = distance(point, target);
            d > 0.0 && d < radius && !exclude(*car)
        })
        .map(|(car, point)| (car, *point))
        .collect()
}
