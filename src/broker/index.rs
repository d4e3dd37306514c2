//! Subscription index
//!
//! Four mappings kept consistent as one unit:
//! - `sessions`: session id -> live session handle (the registry)
//! - `session_subscriptions`: session id -> ids of the subscriptions it holds
//! - `topic_subscription`: topic -> (subscription id, subscribers)
//! - `subscription_subscribers`: subscription id -> (topic, subscribers)
//!
//! A topic or subscription entry exists iff its subscriber set is non-empty,
//! and the two views of one binding always hold the same subscribers. All
//! mutation goes through the methods below; none of them touches one view
//! without the other.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use super::id::IdAllocator;
use super::message::SubscriptionId;
use super::topic::{SubscriptionEntry, TopicEntry};
use crate::session::{Session, SessionId, SessionRegistry};
use crate::utils::error::BrokerError;

#[derive(Debug)]
pub struct SubscriptionIndex {
    ids: Arc<dyn IdAllocator>,
    sessions: SessionRegistry,
    session_subscriptions: HashMap<SessionId, HashSet<SubscriptionId>>,
    topic_subscription: HashMap<String, TopicEntry>,
    subscription_subscribers: HashMap<SubscriptionId, SubscriptionEntry>,
}

impl SubscriptionIndex {
    pub fn new(ids: Arc<dyn IdAllocator>) -> Self {
        Self {
            ids,
            sessions: SessionRegistry::new(),
            session_subscriptions: HashMap::new(),
            topic_subscription: HashMap::new(),
            subscription_subscribers: HashMap::new(),
        }
    }

    /// Registers a session with no subscriptions.
    ///
    /// Fails with `DuplicateSession` if the id is already joined; the index is
    /// left as it was.
    pub fn add_session(&mut self, session: Arc<dyn Session>) -> Result<(), BrokerError> {
        let id = session.id();
        if self.session_subscriptions.contains_key(&id) || !self.sessions.register(session) {
            return Err(BrokerError::DuplicateSession(id));
        }
        self.session_subscriptions.insert(id, HashSet::new());
        debug_assert!(self.check_invariants().is_ok());
        Ok(())
    }

    /// Drops a session and every subscriber entry it holds, deleting topics
    /// and subscriptions it was the last subscriber of.
    ///
    /// # Panics
    ///
    /// If the session is not registered.
    pub fn remove_session(&mut self, session: SessionId) -> Arc<dyn Session> {
        let Some(subscriptions) = self.session_subscriptions.remove(&session) else {
            panic!("remove_session: session {session} is not registered");
        };
        for subscription in subscriptions {
            self.detach(session, subscription);
        }
        let handle = match self.sessions.deregister(session) {
            Some(handle) => handle,
            None => panic!("remove_session: session {session} missing from registry"),
        };
        debug_assert!(self.check_invariants().is_ok());
        handle
    }

    /// Subscribes a session to a topic, creating the topic's subscription on
    /// first use. Subscribing twice returns the same id and changes nothing.
    ///
    /// # Panics
    ///
    /// If the session is not registered.
    pub fn subscribe(&mut self, session: SessionId, topic: &str) -> SubscriptionId {
        self.assert_registered(session, "subscribe");

        let subscription = match self.topic_subscription.get_mut(topic) {
            Some(entry) => {
                entry.subscribe(session);
                entry.subscription
            }
            None => {
                let mut entry = TopicEntry::new(self.fresh_subscription_id());
                entry.subscribe(session);
                let id = entry.subscription;
                self.topic_subscription.insert(topic.to_string(), entry);
                id
            }
        };

        self.subscription_subscribers
            .entry(subscription)
            .or_insert_with(|| SubscriptionEntry::new(topic))
            .subscribe(session);

        if let Some(held) = self.session_subscriptions.get_mut(&session) {
            held.insert(subscription);
        }
        debug_assert!(self.check_invariants().is_ok());
        subscription
    }

    /// Removes a session from one subscription. Returns false, without
    /// mutating anything, if the subscription id is unknown.
    ///
    /// A live subscription the session does not hold still returns true and
    /// leaves every subscriber in place.
    ///
    /// # Panics
    ///
    /// If the session is not registered.
    pub fn unsubscribe(&mut self, session: SessionId, subscription: SubscriptionId) -> bool {
        self.assert_registered(session, "unsubscribe");

        if !self.detach(session, subscription) {
            return false;
        }
        if let Some(held) = self.session_subscriptions.get_mut(&session) {
            held.remove(&subscription);
        }
        debug_assert!(self.check_invariants().is_ok());
        true
    }

    /// Snapshot of a topic's subscription id and subscribers, or `None` if
    /// nobody is subscribed to it.
    pub fn receivers(&self, topic: &str) -> Option<(SubscriptionId, HashSet<SessionId>)> {
        self.topic_subscription
            .get(topic)
            .map(|entry| (entry.subscription, entry.subscribers.clone()))
    }

    /// The registry of joined sessions, for resolving ids to handles.
    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    /// Whether the session has joined and not yet left.
    pub fn is_registered(&self, session: SessionId) -> bool {
        self.session_subscriptions.contains_key(&session)
    }

    /// Ids of the subscriptions a session currently holds.
    pub fn subscriptions_of(&self, session: SessionId) -> Option<&HashSet<SubscriptionId>> {
        self.session_subscriptions.get(&session)
    }

    /// Topic bound to a live subscription.
    pub fn topic_of(&self, subscription: SubscriptionId) -> Option<&str> {
        self.subscription_subscribers
            .get(&subscription)
            .map(|entry| entry.topic.as_str())
    }

    /// Number of joined sessions.
    pub fn session_count(&self) -> usize {
        self.session_subscriptions.len()
    }

    /// Number of topics with at least one subscriber.
    pub fn topic_count(&self) -> usize {
        self.topic_subscription.len()
    }

    /// Verifies every cross-index invariant, reporting the first violation.
    pub fn check_invariants(&self) -> Result<(), String> {
        if self.sessions.len() != self.session_subscriptions.len() {
            return Err(format!(
                "registry holds {} sessions, subscription map holds {}",
                self.sessions.len(),
                self.session_subscriptions.len()
            ));
        }

        for (topic, entry) in &self.topic_subscription {
            if entry.is_empty() {
                return Err(format!("topic {topic:?} has no subscribers"));
            }
            match self.subscription_subscribers.get(&entry.subscription) {
                Some(mirror) if mirror.topic == *topic && mirror.subscribers == entry.subscribers => {}
                Some(_) => {
                    return Err(format!(
                        "topic {topic:?} and subscription {} disagree",
                        entry.subscription
                    ));
                }
                None => {
                    return Err(format!(
                        "topic {topic:?} points at missing subscription {}",
                        entry.subscription
                    ));
                }
            }
        }

        for (subscription, entry) in &self.subscription_subscribers {
            if entry.is_empty() {
                return Err(format!("subscription {subscription} has no subscribers"));
            }
            match self.topic_subscription.get(&entry.topic) {
                Some(mirror) if mirror.subscription == *subscription => {}
                _ => {
                    return Err(format!(
                        "subscription {subscription} is not the live one for {:?}",
                        entry.topic
                    ));
                }
            }
            for session in &entry.subscribers {
                let holds = self
                    .session_subscriptions
                    .get(session)
                    .is_some_and(|held| held.contains(subscription));
                if !holds {
                    return Err(format!(
                        "session {session} subscribed to {subscription} but does not record it"
                    ));
                }
            }
        }

        for (session, held) in &self.session_subscriptions {
            if !self.sessions.contains(*session) {
                return Err(format!("session {session} is not in the registry"));
            }
            for subscription in held {
                let listed = self
                    .subscription_subscribers
                    .get(subscription)
                    .is_some_and(|entry| entry.subscribers.contains(session));
                if !listed {
                    return Err(format!(
                        "session {session} records {subscription} but is not a subscriber"
                    ));
                }
            }
        }

        Ok(())
    }

    /// Removes `session` from both views of `subscription`, deleting any entry
    /// left empty. Leaves `session_subscriptions` to the caller.
    fn detach(&mut self, session: SessionId, subscription: SubscriptionId) -> bool {
        let Some(entry) = self.subscription_subscribers.get_mut(&subscription) else {
            return false;
        };
        entry.unsubscribe(session);
        let topic = entry.topic.clone();
        if entry.is_empty() {
            self.subscription_subscribers.remove(&subscription);
        }

        if let Some(entry) = self.topic_subscription.get_mut(&topic) {
            entry.unsubscribe(session);
            if entry.is_empty() {
                self.topic_subscription.remove(&topic);
            }
        }
        true
    }

    /// Next allocator id not already naming a live subscription. Only matters
    /// once the allocator has wrapped.
    fn fresh_subscription_id(&self) -> SubscriptionId {
        loop {
            let id = self.ids.next_id();
            if !self.subscription_subscribers.contains_key(&id) {
                return id;
            }
        }
    }

    fn assert_registered(&self, session: SessionId, op: &str) {
        assert!(
            self.session_subscriptions.contains_key(&session),
            "{op}: session {session} is not registered"
        );
    }
}
