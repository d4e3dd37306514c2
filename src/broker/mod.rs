//! The routing core: subscription index, id allocation, protocol messages and
//! the engine that dispatches inbound requests.

pub mod engine;
pub mod id;
pub mod index;
pub mod message;
pub mod topic;

pub use engine::Broker;
pub use id::{IdAllocator, SequentialIds};
pub use index::SubscriptionIndex;
