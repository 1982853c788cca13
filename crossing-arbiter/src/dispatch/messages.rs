//! Wire messages exchanged with cars and trains.
//!
//! Every message is one JSON object tagged by `kind`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arbiter::YieldInstruction;
use crate::domain::{CarId, DomainError, OrientedPoint, ReplyAddress};

/// Who sent a report, as seen by the transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SenderIdentity {
    /// Network identifier of the sending agent: car id plus a two-character suffix.
    pub network_id: String,

    /// Communication group of the sender; its last character is the train index.
    pub group: String,
}

/// A batch of positions from one sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub sender: SenderIdentity,

    /// Physical position of the sender in its train (0 is the head car).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,

    pub positions: BTreeMap<CarId, OrientedPoint>,
}

impl PositionReport {
    /// A report in which a car announces only its own position.
    pub fn own_position(
        network_id: impl Into<String>,
        group: impl Into<String>,
        point: OrientedPoint,
    ) -> Result<Self, DomainError> {
        let network_id = network_id.into();
        let car = CarId::from_network_id(&network_id)?;
        Ok(Self {
            sender: SenderIdentity {
                network_id,
                group: group.into(),
            },
            rank: None,
            positions: BTreeMap::from([(car, point)]),
        })
    }

    /// Attach a physical rank to the report.
    pub fn with_rank(mut self, rank: u32) -> Self {
        self.rank = Some(rank);
        self
    }
}

/// Messages accepted from the outside world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inbound {
    /// Position update from a car.
    Report(PositionReport),

    /// Request to forward a text to a single car.
    Notify { car: CarId, text: String },
}

/// Text addressed to a single car.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextMessage {
    pub to: ReplyAddress,
    pub text: String,
}

/// Messages sent to the outside world.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outbound {
    /// Slow-down instruction for every car of a train.
    Yield(YieldInstruction),

    /// Best-effort text for one car.
    Text(TextMessage),
}
