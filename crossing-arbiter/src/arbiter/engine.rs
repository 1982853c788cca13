//! Per-tick crossing arbitration.
//!
//! For every crossing, trains are evaluated in index order:
//!
//! 1. **Claim**: a train whose head car is within the proximity threshold
//!    and which is not yet registered on the crossing is registered. If
//!    another train already holds the crossing, the newcomer is sent a
//!    yield instruction listing the crossing followed by every car of the
//!    other train from the first one that has not yet passed it.
//! 2. **Release**: a registered train whose tail car is beyond the
//!    clearance threshold and has passed the crossing on its own line of
//!    travel is removed.
//!
//! Evaluating trains in index order is the tie-break: when two trains
//! reach a free crossing in the same tick, the lower index registers first
//! and the other one yields.

use serde::Serialize;
use tracing::{debug, trace, warn};

use super::config::ArbiterConfig;
use super::occupancy::CrossingOccupancy;
use crate::domain::{CarId, CrossingId, DomainError, OrientedPoint, TrainIndex};
use crate::geometry::{distance, has_passed, has_passed_loose};
use crate::track::CrossingList;
use crate::world::Snapshot;

/// Instruction telling a train to slow down for a crossing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YieldInstruction {
    /// Group label of the train that must yield.
    pub group: String,

    /// Index of the train that must yield.
    pub train: TrainIndex,

    /// Crossing the instruction is about.
    pub crossing: CrossingId,

    /// The crossing point, then the positions of the cars still blocking
    /// it, in train order.
    pub payload: Vec<OrientedPoint>,
}

impl YieldInstruction {
    /// The crossing point (always the first payload element).
    pub fn crossing_point(&self) -> Option<&OrientedPoint> {
        self.payload.first()
    }

    /// Positions of the cars still blocking the crossing.
    pub fn blocking_cars(&self) -> &[OrientedPoint] {
        self.payload.get(1..).unwrap_or_default()
    }
}

/// Everything that changed during one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub yields: Vec<YieldInstruction>,
    pub claimed: Vec<(CrossingId, TrainIndex)>,
    pub released: Vec<(CrossingId, TrainIndex)>,
}

impl TickOutcome {
    pub fn is_quiet(&self) -> bool {
        self.yields.is_empty() && self.claimed.is_empty() && self.released.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
enum TrainEnd {
    Head,
    Tail,
}

/// Crossing arbitration state machine.
///
/// Owns the crossing occupancy; positions and rosters are read from the
/// snapshot handed to each tick.
#[derive(Debug, Clone)]
pub struct ArbitrationEngine {
    config: ArbiterConfig,
    occupancy: CrossingOccupancy,
    /// Set once the startup barrier has been passed.
    steady: bool,
}

impl ArbitrationEngine {
    pub fn new(config: ArbiterConfig) -> Self {
        Self {
            config,
            occupancy: CrossingOccupancy::new(),
            steady: false,
        }
    }

    pub fn config(&self) -> &ArbiterConfig {
        &self.config
    }

    pub fn occupancy(&self) -> &CrossingOccupancy {
        &self.occupancy
    }

    /// Mark the startup barrier as passed.
    ///
    /// From then on an empty train or a missing position is a roster
    /// anomaly and is logged as a warning instead of skipped quietly.
    pub fn mark_steady(&mut self) {
        self.steady = true;
    }

    pub fn is_steady(&self) -> bool {
        self.steady
    }

    /// Evaluate every crossing against one snapshot.
    pub fn tick(&mut self, snapshot: &Snapshot, crossings: &CrossingList) -> TickOutcome {
        let mut outcome = TickOutcome::default();

        for (id, crossing) in crossings.iter() {
            for train in snapshot.roster().train_indices() {
                self.check_claim(snapshot, id, crossing, train, &mut outcome);
                self.check_release(snapshot, id, crossing, train, &mut outcome);
            }
        }

        trace!(
            revision = snapshot.revision(),
            yields = outcome.yields.len(),
            claimed = outcome.claimed.len(),
            released = outcome.released.len(),
            "tick complete"
        );
        outcome
    }

    fn check_claim(
        &mut self,
        snapshot: &Snapshot,
        id: CrossingId,
        crossing: &OrientedPoint,
        train: TrainIndex,
        outcome: &mut TickOutcome,
    ) {
        let Some(head) = self.end_position(snapshot, train, TrainEnd::Head) else {
            return;
        };

        if distance(&head, crossing) >= self.config.proximity_threshold
            || self.occupancy.is_claimed_by(id, train)
        {
            return;
        }

        let contenders = self.contenders(id, train);
        if !contenders.is_empty() {
            let mut payload = vec![*crossing];
            for other in &contenders {
                payload.extend(unreached_cars(snapshot, *other, crossing));
            }

            let instruction = YieldInstruction {
                group: train.group_label(&self.config.group_prefix),
                train,
                crossing: id,
                payload,
            };
            debug!(
                %train,
                crossing = id.0,
                blocking = instruction.blocking_cars().len(),
                "train must yield"
            );
            outcome.yields.push(instruction);
        }

        self.occupancy.claim(id, train);
        debug!(%train, crossing = id.0, "crossing claimed");
        outcome.claimed.push((id, train));
    }

    fn check_release(
        &mut self,
        snapshot: &Snapshot,
        id: CrossingId,
        crossing: &OrientedPoint,
        train: TrainIndex,
        outcome: &mut TickOutcome,
    ) {
        let Some(tail) = self.end_position(snapshot, train, TrainEnd::Tail) else {
            return;
        };

        if distance(&tail, crossing) > self.config.clearance_threshold
            && self.occupancy.is_claimed_by(id, train)
            && has_passed(&tail, crossing)
        {
            self.occupancy.release(id, train);
            debug!(%train, crossing = id.0, "crossing released");
            outcome.released.push((id, train));
        }
    }

    /// Other claimants whose blocking cars the newcomer must yield to.
    fn contenders(&self, id: CrossingId, train: TrainIndex) -> Vec<TrainIndex> {
        let mut others: Vec<TrainIndex> = self.occupancy.others(id, train).collect();
        if others.len() > 1 && !self.config.allow_multi_contender {
            warn!(
                %train,
                crossing = id.0,
                claimants = others.len(),
                "more than one other train on crossing, yielding to the earliest only"
            );
            others.truncate(1);
        }
        others
    }

    fn end_position(
        &self,
        snapshot: &Snapshot,
        train: TrainIndex,
        end: TrainEnd,
    ) -> Option<OrientedPoint> {
        let roster = snapshot.roster();
        let car = match end {
            TrainEnd::Head => roster.head(train),
            TrainEnd::Tail => roster.tail(train),
        };

        let car = match car {
            Ok(car) => car,
            Err(err) => {
                self.skip(train, &err);
                return None;
            }
        };

        match snapshot.position(car) {
            Some(point) => Some(*point),
            None => {
                self.skip_unpositioned(train, car);
                None
            }
        }
    }

    fn skip(&self, train: TrainIndex, err: &DomainError) {
        if self.steady {
            warn!(%train, error = %err, "roster anomaly, skipping train");
        } else {
            debug!(%train, error = %err, "train not ready, skipping");
        }
    }

    fn skip_unpositioned(&self, train: TrainIndex, car: &CarId) {
        if self.steady {
            warn!(%train, %car, "car has no known position, skipping train");
        } else {
            debug!(%train, %car, "car has no position yet, skipping");
        }
    }
}

/// Cars of `train` from the first one that has not passed `crossing`,
/// in train order. Cars without a known position are skipped.
fn unreached_cars(
    snapshot: &Snapshot,
    train: TrainIndex,
    crossing: &OrientedPoint,
) -> Vec<OrientedPoint> {
    let mut blocking = Vec::new();
    let mut reached_first_unpassed = false;

    for car in snapshot.roster().cars(train) {
        let Some(point) = snapshot.position(car) else {
            debug!(%train, %car, "blocking car has no position, ignored");
            continue;
        };

        if !reached_first_unpassed && !has_passed_loose(point, crossing) {
            reached_first_unpassed = true;
        }
        if reached_first_unpassed {
            blocking.push(*point);
        }
    }

    blocking
}
