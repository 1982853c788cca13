//! Cardinal heading type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tolerance used when matching a degree value against a cardinal direction.
const DEGREE_TOLERANCE: f64 = 1e-6;

/// Error returned when a heading is not one of the four cardinal directions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid heading: {degrees} degrees is not a cardinal direction")]
pub struct InvalidHeading {
    degrees: f64,
}

/// Direction of travel of a car.
///
/// Screen coordinates are used throughout: `x` grows to the East and `y`
/// grows to the South. On the wire a heading is a number of degrees where
/// 0 is North, 90 East, 180 South and 270 West.
///
/// # Examples
///
/// ```
/// use crossing_arbiter::domain::Heading;
///
/// assert_eq!(Heading::from_degrees(90.0).unwrap(), Heading::East);
/// assert_eq!(Heading::from_degrees(-90.0).unwrap(), Heading::West);
///
/// // Diagonals are rejected
/// assert!(Heading::from_degrees(45.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    /// Parse a heading from degrees.
    ///
    /// The value is normalised into `[0, 360)` first, so `-90` and `450`
    /// are accepted as West and East.
    pub fn from_degrees(degrees: f64) -> Result<Self, InvalidHeading> {
        if !degrees.is_finite() {
            return Err(InvalidHeading { degrees });
        }

        let normalised = degrees.rem_euclid(360.0);
        let near = |target: f64| (normalised - target).abs() < DEGREE_TOLERANCE;

        if near(0.0) || near(360.0) {
            Ok(Heading::North)
        } else if near(90.0) {
            Ok(Heading::East)
        } else if near(180.0) {
            Ok(Heading::South)
        } else if near(270.0) {
            Ok(Heading::West)
        } else {
            Err(InvalidHeading { degrees })
        }
    }

    /// Returns the heading in degrees.
    pub fn degrees(self) -> f64 {
        match self {
            Heading::North => 0.0,
            Heading::East => 90.0,
            Heading::South => 180.0,
            Heading::West => 270.0,
        }
    }

    /// True for headings that travel along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Heading::East | Heading::West)
    }
}

impl TryFrom<f64> for Heading {
    type Error = InvalidHeading;

    fn try_from(degrees: f64) -> Result<Self, Self::Error> {
        Heading::from_degrees(degrees)
    }
}

impl From<Heading> for f64 {
    fn from(heading: Heading) -> Self {
        heading.degrees()
    }
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Heading::North => "north",
            Heading::East => "east",
            Heading::South => "south",
            Heading::West => "west",
        };
        f.write_str(name)
    }
}
