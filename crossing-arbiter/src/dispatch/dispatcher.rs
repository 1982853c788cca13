//! Translation between wire messages and the world state.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::DispatchError;
use super::messages::{Outbound, PositionReport, TextMessage};
use super::transport::Transport;
use crate::arbiter::YieldInstruction;
use crate::domain::{CarId, DomainError, ReplyAddress, TrainIndex};
use crate::world::{Snapshot, SnapshotWriter, World};

/// Counts from one ingest phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    /// Reports merged into the world.
    pub accepted: usize,

    /// Reports rejected because of a malformed sender identity or a car claimed by
    /// another train.
    pub rejected: usize,

    /// Cars added to a train roster for the first time.
    pub new_cars: usize,
}

/// Boundary between the transport and the arbitration core.
///
/// Owns the [`World`]: inbound reports are merged here, and the outbound
/// side only builds messages and hands them to the [`Transport`].
pub struct Dispatcher<T> {
    world: World,
    transport: T,
}

impl<T: Transport> Dispatcher<T> {
    pub fn new(train_count: usize, transport: T) -> Self {
        Self {
            world: World::new(train_count),
            transport,
        }
    }

    /// The current world revision.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.world.snapshot()
    }

    /// Merge a batch of reports into the world as a single revision.
    ///
    /// A report whose sender identity is malformed is rejected and logged;
    /// the rest of the batch is still applied.
    pub fn ingest(&mut self, batch: &[PositionReport]) -> IngestSummary {
        self.world.apply(|writer| {
            let mut summary = IngestSummary::default();
            for report in batch {
                match merge_report(writer, report) {
                    Ok(new_cars) => {
                        summary.accepted += 1;
                        summary.new_cars += new_cars;
                    }
                    Err(err) => {
                        warn!(
                            sender = %report.sender.network_id,
                            group = %report.sender.group,
                            error = %err,
                            "rejected position report"
                        );
                        summary.rejected += 1;
                    }
                }
            }
            summary
        })
    }

    /// Send a yield instruction to the train it addresses.
    pub fn emit_yield(&self, instruction: YieldInstruction) -> Result<(), DispatchError> {
        info!(
            group = %instruction.group,
            crossing = instruction.crossing.0,
            blocking = instruction.blocking_cars().len(),
            "sending yield instruction"
        );
        self.transport.deliver(Outbound::Yield(instruction))
    }

    /// Send a text to one car.
    ///
    /// Returns `Ok(false)` without sending anything if the car's address is
    /// not known.
    pub fn unicast(&self, car: &CarId, text: &str) -> Result<bool, DispatchError> {
        let snapshot = self.world.snapshot();
        let Some(address) = snapshot.addresses().get(car.as_str()) else {
            debug!(%car, "no address for car, text dropped");
            return Ok(false);
        };

        self.transport.deliver(Outbound::Text(TextMessage {
            to: address.clone(),
            text: text.to_string(),
        }))?;
        Ok(true)
    }
}

/// Merge one report. Returns the number of cars newly added to the roster.
///
/// Only the sender joins a train; positions of any other cars carried in
/// the report are merged without touching the roster. Nothing is written
/// unless the sender identity is valid and the sender is not already a
/// member of another train.
fn merge_report(
    writer: &mut SnapshotWriter<'_>,
    report: &PositionReport,
) -> Result<usize, DomainError> {
    let train = TrainIndex::from_group_label(&report.sender.group)?;
    let sender = CarId::from_network_id(&report.sender.network_id)?;

    let mut new_cars = 0;
    if writer
        .roster()
        .register_ranked(train, sender.clone(), report.rank)?
    {
        debug!(%train, car = %sender, "car joined train");
        new_cars += 1;
    }

    writer.positions().update(&report.positions);
    writer
        .addresses()
        .record(sender, ReplyAddress::new(report.sender.network_id.clone()));

    Ok(new_cars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::RecordingTransport;
    use crate::domain::{CrossingId, Heading, OrientedPoint};

    fn pt(x: f64, y: f64) -> OrientedPoint {
        OrientedPoint::new(x, y, Heading::North)
    }

    fn report(network_id: &str, group: &str, x: f64, y: f64) -> PositionReport {
        PositionReport::own_position(network_id, group, pt(x, y)).unwrap()
    }

    fn dispatcher() -> (Dispatcher<RecordingTransport>, RecordingTransport) {
        let transport = RecordingTransport::new();
        (Dispatcher::new(2, transport.clone()), transport)
    }

    #[test]
    fn ingest_updates_positions_roster_and_addresses() {
        let (mut d, _) = dispatcher();

        let summary = d.ingest(&[
            report("a0#1", "train0", 1.0, 2.0),
            report("b0#1", "train1", 3.0, 4.0),
        ]);

        assert_eq!(
            summary,
            IngestSummary {
                accepted: 2,
                rejected: 0,
                new_cars: 2
            }
        );
        let snap = d.snapshot();
        assert_eq!(snap.position(&CarId::new("a0")), Some(&pt(1.0, 2.0)));
        assert_eq!(snap.roster().head(TrainIndex(1)).unwrap().as_str(), "b0");
        assert_eq!(snap.addresses().get("a0").unwrap().as_str(), "a0#1");
    }

    #[test]
    fn batch_is_one_revision() {
        let (mut d, _) = dispatcher();
        let before = d.snapshot().revision();

        d.ingest(&[
            report("a0#1", "train0", 1.0, 2.0),
            report("a1#1", "train0", 1.0, 3.0),
        ]);

        let snap = d.snapshot();
        assert_eq!(snap.revision(), before + 1);
        let names: Vec<&str> = snap
            .roster()
            .cars(TrainIndex(0))
            .iter()
            .map(|c| c.as_str())
            .collect();
        assert_eq!(names, ["a0", "a1"]);
    }

    #[test]
    fn repeated_reports_do_not_duplicate_cars() {
        let (mut d, _) = dispatcher();
        d.ingest(&[report("a0#1", "train0", 1.0, 2.0)]);
        let summary = d.ingest(&[report("a0#1", "train0", 5.0, 5.0)]);

        assert_eq!(summary.new_cars, 0);
        let snap = d.snapshot();
        assert_eq!(snap.roster().cars(TrainIndex(0)).len(), 1);
        assert_eq!(snap.position(&CarId::new("a0")), Some(&pt(5.0, 5.0)));
    }

    #[test]
    fn malformed_reports_are_rejected_individually() {
        let (mut d, _) = dispatcher();

        let summary = d.ingest(&[
            report("bad#1", "trainX", 0.0, 0.0),
            report("a0#1", "train0", 1.0, 2.0),
            report("far#1", "train7", 0.0, 0.0),
        ]);

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected, 2);
        let snap = d.snapshot();
        assert!(snap.position(&CarId::new("bad")).is_none());
        assert!(snap.position(&CarId::new("far")).is_none());
        assert_eq!(snap.roster().car_count(), 1);
    }

    #[test]
    fn short_network_id_rejected() {
        let (mut d, _) = dispatcher();
        let mut r = report("a0#1", "train0", 1.0, 2.0);
        r.sender.network_id = "a".into();

        let summary = d.ingest(&[r]);
        assert_eq!(summary.rejected, 1);
        assert!(d.snapshot().positions().is_empty());
    }

    #[test]
    fn extra_cars_update_positions_only() {
        let (mut d, _) = dispatcher();
        let mut r = report("lead#1", "train1", 0.0, 0.0);
        r.positions.insert(CarId::new("follower"), pt(0.0, 10.0));

        let summary = d.ingest(&[r]);

        assert_eq!(summary.new_cars, 1);
        let snap = d.snapshot();
        let cars: Vec<&str> = snap
            .roster()
            .cars(TrainIndex(1))
            .iter()
            .map(|c| c.as_str())
            .collect();
        assert_eq!(cars, ["lead"]);
        assert_eq!(snap.position(&CarId::new("follower")), Some(&pt(0.0, 10.0)));
        assert!(snap.roster().train_of(&CarId::new("follower")).is_none());
        // Only the sender gets an address
        assert!(snap.addresses().get("follower").is_none());
    }

    #[test]
    fn foreign_car_in_report_stays_in_its_train() {
        let (mut d, _) = dispatcher();
        d.ingest(&[report("b0#1", "train1", 50.0, 50.0)]);

        let mut r = report("a0#1", "train0", 0.0, 0.0);
        r.positions.insert(CarId::new("b0"), pt(60.0, 50.0));
        let summary = d.ingest(&[r]);

        assert_eq!(summary.accepted, 1);
        let snap = d.snapshot();
        let b0 = CarId::new("b0");
        assert_eq!(snap.roster().cars(TrainIndex(0)), [CarId::new("a0")]);
        assert_eq!(snap.roster().cars(TrainIndex(1)), [b0.clone()]);
        assert_eq!(snap.roster().tail(TrainIndex(0)).unwrap().as_str(), "a0");
        assert_eq!(snap.roster().train_of(&b0), Some(TrainIndex(1)));
        assert_eq!(snap.position(&b0), Some(&pt(60.0, 50.0)));
    }

    #[test]
    fn sender_switching_train_is_rejected() {
        let (mut d, _) = dispatcher();
        d.ingest(&[report("b0#1", "train1", 50.0, 50.0)]);

        let summary = d.ingest(&[report("b0#1", "train0", 70.0, 50.0)]);

        assert_eq!(summary.rejected, 1);
        let snap = d.snapshot();
        assert!(snap.roster().cars(TrainIndex(0)).is_empty());
        assert_eq!(snap.position(&CarId::new("b0")), Some(&pt(50.0, 50.0)));
    }

    #[test]
    fn ranked_reports_fix_train_order() {
        let (mut d, _) = dispatcher();
        d.ingest(&[
            report("c2#1", "train0", 0.0, 20.0).with_rank(2),
            report("c0#1", "train0", 0.0, 0.0).with_rank(0),
            report("c1#1", "train0", 0.0, 10.0).with_rank(1),
        ]);

        let snap = d.snapshot();
        assert_eq!(snap.roster().head(TrainIndex(0)).unwrap().as_str(), "c0");
        assert_eq!(snap.roster().tail(TrainIndex(0)).unwrap().as_str(), "c2");
    }

    #[test]
    fn unicast_known_and_unknown() {
        let (mut d, transport) = dispatcher();
        d.ingest(&[report("a0#1", "train0", 1.0, 2.0)]);

        assert_eq!(d.unicast(&CarId::new("a0"), "hello"), Ok(true));
        assert_eq!(d.unicast(&CarId::new("nobody"), "hello"), Ok(false));

        assert_eq!(
            transport.sent(),
            vec![Outbound::Text(TextMessage {
                to: ReplyAddress::new("a0#1"),
                text: "hello".into(),
            })]
        );
    }

    #[test]
    fn emit_yield_delivers() {
        let (d, transport) = dispatcher();
        let instruction = YieldInstruction {
            group: "train0".into(),
            train: TrainIndex(0),
            crossing: CrossingId(0),
            payload: vec![pt(100.0, 100.0)],
        };

        d.emit_yield(instruction.clone()).unwrap();

        assert_eq!(transport.yields(), vec![instruction]);
    }
}
