//! Domain types for the crossing arbiter.
//!
//! This module contains the value types shared by every other layer:
//! positions, headings and the identifiers of cars, trains and crossings.
//! Types that can be invalid enforce their invariants at construction
//! time, so code that receives them can trust their validity.

mod error;
mod heading;
mod ids;
mod point;

pub use error::DomainError;
pub use heading::{Heading, InvalidHeading};
pub use ids::{CarId, CrossingId, ReplyAddress, TrainIndex};
pub use point::OrientedPoint;
