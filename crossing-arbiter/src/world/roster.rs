//! Ordered membership of cars in trains.

use crate::domain::{CarId, DomainError, TrainIndex};

/// Cars of one train, head first.
#[derive(Debug, Clone, Default)]
struct TrainCars {
    cars: Vec<CarId>,
    /// Physical rank reported with each car, parallel to `cars`.
    ranks: Vec<Option<u32>>,
}

impl TrainCars {
    fn contains(&self, car: &CarId) -> bool {
        self.cars.contains(car)
    }

    fn insert(&mut self, car: CarId, rank: Option<u32>) {
        let at = match rank {
            Some(r) => self
                .ranks
                .iter()
                .position(|existing| existing.is_some_and(|e| e > r))
                .unwrap_or(self.cars.len()),
            None => self.cars.len(),
        };
        self.cars.insert(at, car);
        self.ranks.insert(at, rank);
    }
}

/// Per-train ordered list of car identifiers.
///
/// Cars are placed in the order they first announce themselves, unless
/// they report an explicit physical rank, in which case they are inserted
/// ahead of any registered car with a higher rank. Membership only grows
/// and the relative order of registered cars never changes.
#[derive(Debug, Clone)]
pub struct TrainRoster {
    trains: Vec<TrainCars>,
}

impl TrainRoster {
    /// Create a roster for `train_count` trains, all empty.
    pub fn new(train_count: usize) -> Self {
        Self {
            trains: vec![TrainCars::default(); train_count],
        }
    }

    /// Number of trains in the fleet.
    pub fn train_count(&self) -> usize {
        self.trains.len()
    }

    /// Iterate over train indices in order.
    pub fn train_indices(&self) -> impl Iterator<Item = TrainIndex> + use<> {
        (0..self.trains.len()).map(TrainIndex)
    }

    /// Append a car to a train in arrival order.
    ///
    /// Returns `true` if the car was newly added. Registering a car that is
    /// already present leaves the roster unchanged.
    pub fn register(&mut self, train: TrainIndex, car: CarId) -> Result<bool, DomainError> {
        self.register_ranked(train, car, None)
    }

    /// Register a car with an optional physical rank (0 is the head).
    ///
    /// A car belongs to exactly one train; registering it anywhere else
    /// fails with [`DomainError::CarInOtherTrain`].
    pub fn register_ranked(
        &mut self,
        train: TrainIndex,
        car: CarId,
        rank: Option<u32>,
    ) -> Result<bool, DomainError> {
        if let Some(owner) = self.train_of(&car).filter(|owner| *owner != train) {
            return Err(DomainError::CarInOtherTrain { car, train, owner });
        }

        let train_count = self.trains.len();
        let cars = self
            .trains
            .get_mut(train.0)
            .ok_or(DomainError::UnknownTrain { train, train_count })?;

        if cars.contains(&car) {
            return Ok(false);
        }

        cars.insert(car, rank);
        Ok(true)
    }

    /// The cars of a train, head first. Empty for unknown trains.
    pub fn cars(&self, train: TrainIndex) -> &[CarId] {
        self.trains
            .get(train.0)
            .map(|t| t.cars.as_slice())
            .unwrap_or_default()
    }

    /// The leading car of a train.
    pub fn head(&self, train: TrainIndex) -> Result<&CarId, DomainError> {
        self.cars(train)
            .first()
            .ok_or(DomainError::EmptyTrain(train))
    }

    /// The last car of a train.
    pub fn tail(&self, train: TrainIndex) -> Result<&CarId, DomainError> {
        self.cars(train)
            .last()
            .ok_or(DomainError::EmptyTrain(train))
    }

    /// Train a car belongs to, if registered.
    pub fn train_of(&self, car: &CarId) -> Option<TrainIndex> {
        self.trains
            .iter()
            .position(|t| t.contains(car))
            .map(TrainIndex)
    }

    /// Total number of registered cars across all trains.
    pub fn car_count(&self) -> usize {
        self.trains.iter().map(|t| t.cars.len()).sum()
    }

    /// True once every train has at least `cars_per_train` cars.
    pub fn is_complete(&self, cars_per_train: usize) -> bool {
        let needed = cars_per_train.max(1);
        self.trains.iter().all(|t| t.cars.len() >= needed)
    }
}
