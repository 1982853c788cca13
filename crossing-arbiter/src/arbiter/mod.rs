//! Crossing arbitration.
//!
//! This module decides, once per tick, which train holds each crossing and
//! which trains must slow down because another train still occupies a
//! crossing they are approaching.

mod config;
mod engine;
mod occupancy;


pub use config::ArbiterConfig;
pub use engine::{ArbitrationEngine, TickOutcome, YieldInstruction};
pub use occupancy::CrossingOccupancy;
