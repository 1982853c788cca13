//! Recording transport for tests and dry runs.

use std::sync::{Arc, Mutex};

use super::error::DispatchError;
use super::messages::Outbound;
use super::transport::Transport;
use crate::arbiter::YieldInstruction;

/// Transport that keeps every delivered message in memory.
///
/// Clones share the same log, so a test can hand one clone to the
/// dispatcher and inspect the other.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Outbound>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every message delivered so far, in order.
    pub fn sent(&self) -> Vec<Outbound> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Only the yield instructions delivered so far.
    pub fn yields(&self) -> Vec<YieldInstruction> {
        self.sent()
            .into_iter()
            .filter_map(|m| match m {
                Outbound::Yield(y) => Some(y),
                Outbound::Text(_) => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn deliver(&self, message: Outbound) -> Result<(), DispatchError> {
        let mut sent = self
            .sent
            .lock()
            .map_err(|e| DispatchError::Delivery(e.to_string()))?;
        sent.push(message);
        Ok(())
    }
}
