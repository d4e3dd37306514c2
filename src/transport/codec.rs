//! JSON text-frame codec for protocol messages.

use tungstenite::protocol::Message as WsMessage;

use crate::broker::message::Message;
use crate::utils::error::TransportError;

pub fn decode(text: &str) -> Result<Message, TransportError> {
    serde_json::from_str(text).map_err(TransportError::Decode)
}

pub fn encode(msg: &Message) -> Result<WsMessage, TransportError> {
    serde_json::to_string(msg)
        .map(WsMessage::text)
        .map_err(TransportError::Encode)
}
