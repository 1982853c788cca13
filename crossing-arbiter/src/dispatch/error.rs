//! Dispatch error types.

/// Errors from handing messages to the transport.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The receiving side of the transport has gone away
    #[error("transport closed")]
    Closed,

    /// The transport refused the message
    #[error("delivery failed: {0}")]
    Delivery(String),
}
