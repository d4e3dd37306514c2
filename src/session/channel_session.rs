//! Channel-backed session handle
//!
//! `ChannelSession` holds the sending side of a per-session unbounded channel.
//! The transport drains the receiving side into the socket, so `send` is a
//! plain enqueue and per-session ordering is the channel's FIFO order.

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use super::{Session, SessionId};
use crate::broker::message::Message;

#[derive(Debug, Clone)]
pub struct ChannelSession {
    pub id: SessionId,
    pub sender: UnboundedSender<Message>,
}

impl ChannelSession {
    pub fn new(id: SessionId, sender: UnboundedSender<Message>) -> Self {
        Self { id, sender }
    }
}

impl Session for ChannelSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn send(&self, msg: Message) {
        if let Err(e) = self.sender.send(msg) {
            debug!("dropping {} for closed session {}", e.0.kind(), self.id);
        }
    }
}
