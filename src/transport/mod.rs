//! The `transport` module carries protocol messages between WebSocket
//! clients and the broker.
//!
//! Messages travel as JSON text frames (see `codec`); `websocket` runs the
//! server and ties each connection's lifetime to a broker session.

pub mod codec;
pub mod websocket;

pub use websocket::{serve, start_websocket_server};

#[cfg(test)]
mod tests;
