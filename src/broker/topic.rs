//! Index entries
//!
//! A topic and its subscription are two views of one binding: `TopicEntry`
//! is keyed by topic name, `SubscriptionEntry` by subscription id. Both hold
//! the same subscriber set; the index keeps them in step.

use std::collections::HashSet;

use super::message::SubscriptionId;
use crate::session::SessionId;

/// A topic's live subscription and the sessions subscribed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicEntry {
    pub subscription: SubscriptionId,
    pub subscribers: HashSet<SessionId>,
}

impl TopicEntry {
    /// Create an entry for a newly allocated subscription, with no subscribers yet.
    pub fn new(subscription: SubscriptionId) -> Self {
        Self {
            subscription,
            subscribers: HashSet::new(),
        }
    }

    /// Add a subscriber. Duplicate adds are ignored.
    pub fn subscribe(&mut self, session: SessionId) {
        self.subscribers.insert(session);
    }

    /// Remove a subscriber; absent sessions are ignored.
    pub fn unsubscribe(&mut self, session: SessionId) {
        self.subscribers.remove(&session);
    }

    /// An empty entry must be deleted from the index.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}

/// A subscription's topic and the sessions subscribed to it. Mirrors the
/// `TopicEntry` for the same binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionEntry {
    pub topic: String,
    pub subscribers: HashSet<SessionId>,
}

impl SubscriptionEntry {
    /// Create an entry bound to `topic`, with no subscribers yet.
    pub fn new(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            subscribers: HashSet::new(),
        }
    }

    /// Add a subscriber. Duplicate adds are ignored.
    pub fn subscribe(&mut self, session: SessionId) {
        self.subscribers.insert(session);
    }

    /// Remove a subscriber; absent sessions are ignored.
    pub fn unsubscribe(&mut self, session: SessionId) {
        self.subscribers.remove(&session);
    }

    /// An empty entry must be deleted from the index.
    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }
}
