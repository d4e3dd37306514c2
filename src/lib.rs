//! # wampsub
//!
//! `wampsub` is the broker role of a session-oriented publish/subscribe
//! protocol: sessions subscribe to named topics and publish events that are
//! fanned out to the current subscribers, filtered per publish by eligible and
//! exclude lists, self-exclusion and publisher disclosure.
//!
//! ## Core Modules
//!
//! - `broker`: the subscription index and the engine that dispatches PUBLISH,
//!   SUBSCRIBE and UNSUBSCRIBE requests.
//! - `session`: the `Session` handle the broker sends through, and the
//!   registry resolving session ids to handles.
//! - `config`: server configuration loading.
//! - `transport`: a WebSocket server carrying JSON-encoded messages.
//! - `utils`: error types and logging setup.

pub mod broker;
pub mod config;
pub mod session;
pub mod transport;
pub mod utils;
