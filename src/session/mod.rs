//! The `session` module defines how the broker sees a connected client.
//!
//! The broker never owns a session. It keeps a `SessionId` in its indices and
//! resolves it to a handle through the [`SessionRegistry`] only when it has
//! something to send.

pub mod channel_session;
pub mod registry;

pub use channel_session::ChannelSession;
pub use registry::SessionRegistry;

use crate::broker::message::Message;

/// Protocol-level session identifier, stable for the lifetime of a session.
pub type SessionId = u64;

/// A connected client's addressable endpoint.
pub trait Session: Send + Sync {
    fn id(&self) -> SessionId;

    /// Hand a message to the transport. Must not block; delivery failures are
    /// the transport's concern and are not reported back.
    fn send(&self, msg: Message);
}

#[cfg(test)]
mod tests;
