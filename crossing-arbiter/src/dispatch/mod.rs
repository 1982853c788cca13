//! Inbound and outbound message handling.
//!
//! The actual transport is external. This module owns the message shapes,
//! merges inbound position reports into the world, and turns arbitration
//! decisions into addressed outbound messages.

mod dispatcher;
mod error;
mod messages;
mod mock;
mod transport;

pub use dispatcher::{Dispatcher, IngestSummary};
pub use error::DispatchError;
pub use messages::{Inbound, Outbound, PositionReport, SenderIdentity, TextMessage};
pub use mock::RecordingTransport;
pub use transport::{ChannelTransport, Transport, write_json_lines};
