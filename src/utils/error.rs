//! The `error` module defines the error types used within `wampsub`.
//!
//! Broker errors are the ones the routing core surfaces to its caller;
//! transport errors wrap everything that can go wrong on a connection,
//! including a broker error that ends the session.

use thiserror::Error;

use crate::broker::message::MessageKind;
use crate::session::SessionId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BrokerError {
    /// A message kind the broker does not handle was delivered to it. Fatal
    /// for the originating session; the caller decides how to close it.
    #[error("protocol violation: unexpected message {0}")]
    Protocol(MessageKind),

    #[error("session {0} is already registered")]
    DuplicateSession(SessionId),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to decode message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode message: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("websocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Broker(#[from] BrokerError),
}
