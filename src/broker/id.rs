//! Identifier allocation
//!
//! Subscription, publication and session ids all come from one allocator and
//! live in the protocol id space `1..=2^53`, the integers a JSON number
//! represents exactly.

use std::sync::atomic::{AtomicU64, Ordering};

/// Largest id the protocol allows.
pub const MAX_ID: u64 = 1 << 53;

/// Source of protocol ids.
///
/// Ids are unique until the allocator exhausts the id space and wraps. Past
/// that point an id may repeat, so consumers that keep ids alive must skip
/// ones still in use: the subscription index does, and a repeated session id
/// is rejected as a duplicate join.
pub trait IdAllocator: Send + Sync + std::fmt::Debug {
    /// Returns the next id in `1..=MAX_ID`.
    fn next_id(&self) -> u64;
}

/// Hands out 1, 2, 3, ... and restarts at 1 past [`MAX_ID`].
#[derive(Debug)]
pub struct SequentialIds {
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first.clamp(1, MAX_ID)),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator for SequentialIds {
    fn next_id(&self) -> u64 {
        let mut current = self.next.load(Ordering::Relaxed);
        loop {
            let following = if current >= MAX_ID { 1 } else { current + 1 };
            match self.next.compare_exchange_weak(
                current,
                following,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return current,
                Err(actual) => current = actual,
            }
        }
    }
}
