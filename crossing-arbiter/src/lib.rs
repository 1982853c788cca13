//! Crossing arbiter.
//!
//! Tracks the cars of several trains sharing a track network and grants
//! each crossing to one train at a time, telling trains that arrive at an
//! occupied crossing how much of the occupying train still blocks it.

pub mod arbiter;
pub mod config;
pub mod coordinator;
pub mod dispatch;
pub mod domain;
pub mod geometry;
pub mod track;
pub mod world;
