//! World state: positions, rosters and reply addresses.
//!
//! The three stores are bundled into an immutable, versioned [`Snapshot`].
//! [`World`] is the single writer: each ingest phase produces the next
//! revision, and the arbitration tick reads whichever revision it was
//! handed. A tick can never observe a half-applied batch.

mod addresses;
mod positions;
mod roster;

use std::sync::Arc;

pub use addresses::AddressBook;
pub use positions::{PositionStore, neighbors};
pub use roster::TrainRoster;

use crate::domain::{CarId, OrientedPoint};

/// Consistent view of the world at one revision.
#[derive(Debug, Clone)]
pub struct Snapshot {
    revision: u64,
    positions: PositionStore,
    roster: TrainRoster,
    addresses: AddressBook,
}

impl Snapshot {
    /// An empty world for `train_count` trains.
    pub fn new(train_count: usize) -> Self {
        Self {
            revision: 0,
            positions: PositionStore::new(),
            roster: TrainRoster::new(train_count),
            addresses: AddressBook::new(),
        }
    }

    /// Number of committed ingest phases that produced this snapshot.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn positions(&self) -> &PositionStore {
        &self.positions
    }

    pub fn roster(&self) -> &TrainRoster {
        &self.roster
    }

    pub fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    /// Latest position of a car.
    pub fn position(&self, car: &CarId) -> Option<&OrientedPoint> {
        self.positions.get(car.as_str())
    }

    /// Cars strictly within `radius` of the given car, excluding its own train.
    pub fn neighbors_of(&self, car: &CarId, radius: f64) -> Vec<(CarId, OrientedPoint)> {
        let Some(target) = self.position(car) else {
            return Vec::new();
        };
        let own_train = self.roster.train_of(car);

        let mut found: Vec<(CarId, OrientedPoint)> = self
            .positions
            .neighbors(target, radius, |other| {
                other == car || (own_train.is_some() && self.roster.train_of(other) == own_train)
            })
            .into_iter()
            .map(|(id, point)| (id.clone(), point))
            .collect();
        found.sort_by(|a, b| a.0.cmp(&b.0));
        found
    }
}

/// Mutable access used during an ingest phase.
pub struct SnapshotWriter<'a> {
    snapshot: &'a mut Snapshot,
}

impl SnapshotWriter<'_> {
    pub fn positions(&mut self) -> &mut PositionStore {
        &mut self.snapshot.positions
    }

    pub fn roster(&mut self) -> &mut TrainRoster {
        &mut self.snapshot.roster
    }

    pub fn addresses(&mut self) -> &mut AddressBook {
        &mut self.snapshot.addresses
    }
}

/// Owner of the current snapshot.
#[derive(Debug)]
pub struct World {
    current: Arc<Snapshot>,
}

impl World {
    pub fn new(train_count: usize) -> Self {
        Self {
            current: Arc::new(Snapshot::new(train_count)),
        }
    }

    /// The current revision. Cheap to clone; never changes once handed out.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current)
    }

    /// Apply one ingest phase and commit it as the next revision.
    ///
    /// If a reader still holds the previous revision it is left untouched;
    /// the writer works on a copy.
    pub fn apply<R>(&mut self, phase: impl FnOnce(&mut SnapshotWriter<'_>) -> R) -> R {
        let snapshot = Arc::make_mut(&mut self.current);
        let mut writer = SnapshotWriter { snapshot };
        let result = phase(&mut writer);
        writer.snapshot.revision += 1;
        result
    }
}
