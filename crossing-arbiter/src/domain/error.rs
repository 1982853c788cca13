//! Domain error types.
//!
//! These errors represent malformed identities and roster inconsistencies
//! in the domain layer. They are distinct from transport and IO errors.

use super::{CarId, TrainIndex};

/// Domain-level errors for validation and roster consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A train has no registered cars yet
    #[error("{0} has no registered cars")]
    EmptyTrain(TrainIndex),

    /// Group label does not end in a decimal digit
    #[error("malformed group label {0:?}: must end in a digit")]
    MalformedGroupLabel(String),

    /// Network identifier too short to carry the transport suffix
    #[error("malformed network id {0:?}")]
    MalformedNetworkId(String),

    /// Train index outside the configured fleet
    #[error("{train} is outside the fleet of {train_count} trains")]
    UnknownTrain {
        train: TrainIndex,
        train_count: usize,
    },

    /// Car is already registered to a different train
    #[error("car {car} belongs to {owner}, cannot join {train}")]
    CarInOtherTrain {
        car: CarId,
        train: TrainIndex,
        owner: TrainIndex,
    },
}
