//! Delivery of outbound messages.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::warn;

use super::error::DispatchError;
use super::messages::Outbound;

/// Trait for delivering outbound messages.
///
/// This abstraction keeps the actual message transport outside the core
/// and allows the dispatcher to be tested with a recording mock.
pub trait Transport {
    /// Hand one message to the transport. Delivery is best-effort.
    fn deliver(&self, message: Outbound) -> Result<(), DispatchError>;
}

/// Transport that forwards messages into an unbounded channel.
///
/// The receiving half is typically drained by a writer task.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    sender: mpsc::UnboundedSender<Outbound>,
}

impl ChannelTransport {
    /// Create a transport and the receiver its messages arrive on.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Outbound>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl Transport for ChannelTransport {
    fn deliver(&self, message: Outbound) -> Result<(), DispatchError> {
        self.sender
            .send(message)
            .map_err(|_| DispatchError::Closed)
    }
}

/// Drain `receiver` into `out` as JSON lines, flushing after each one.
///
/// Returns the number of lines written once every sender has gone away.
/// A message that fails to encode is logged and skipped; a write or flush
/// failure ends the loop.
pub async fn write_json_lines<W>(
    mut receiver: mpsc::UnboundedReceiver<Outbound>,
    mut out: W,
) -> std::io::Result<usize>
where
    W: AsyncWrite + Unpin,
{
    let mut written = 0;
    while let Some(message) = receiver.recv().await {
        let mut line = match serde_json::to_vec(&message) {
            Ok(line) => line,
            Err(e) => {
                warn!("failed to encode outbound message: {e}");
                continue;
            }
        };
        line.push(b'\n');
        out.write_all(&line).await?;
        out.flush().await?;
        written += 1;
    }
    Ok(written)
}
