//! Broker engine
//!
//! Translates inbound PUBLISH, SUBSCRIBE and UNSUBSCRIBE requests into
//! subscription index operations and outbound messages.
//!
//! Concurrency and usage notes:
//! - The API is synchronous and expects to be held behind one lock (for
//!   example `Arc<Mutex<Broker>>`). Each join, leave and inbound message is
//!   handled to completion under that lock, so a session leaving is never
//!   interleaved with a publish that could reach it.
//! - Outbound messages go through `Session::send`, which only enqueues. A
//!   slow receiver never stalls the lock holder.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::id::{IdAllocator, SequentialIds};
use super::index::SubscriptionIndex;
use super::message::{
    ErrorCode, ErrorReply, EventTemplate, Message, MessageKind, Publish, Published, Subscribe,
    Subscribed, Unsubscribe, Unsubscribed,
};
use crate::session::{Session, SessionId};
use crate::utils::error::BrokerError;

#[derive(Debug)]
pub struct Broker {
    ids: Arc<dyn IdAllocator>,
    index: SubscriptionIndex,
}

impl Default for Broker {
    fn default() -> Self {
        Self::new()
    }
}

impl Broker {
    pub fn new() -> Self {
        Self::with_allocator(Arc::new(SequentialIds::new()))
    }

    pub fn with_allocator(ids: Arc<dyn IdAllocator>) -> Self {
        Self {
            index: SubscriptionIndex::new(ids.clone()),
            ids,
        }
    }

    /// The allocator behind subscription and publication ids. The transport
    /// draws session ids from it too.
    pub fn allocator(&self) -> Arc<dyn IdAllocator> {
        self.ids.clone()
    }

    pub fn index(&self) -> &SubscriptionIndex {
        &self.index
    }

    pub fn add_session(&mut self, session: Arc<dyn Session>) -> Result<(), BrokerError> {
        let id = session.id();
        self.index.add_session(session)?;
        info!("session {id} joined");
        Ok(())
    }

    /// # Panics
    ///
    /// If the session is not registered.
    pub fn remove_session(&mut self, session: SessionId) {
        let held = self
            .index
            .subscriptions_of(session)
            .map_or(0, HashSet::len);
        self.index.remove_session(session);
        info!("session {session} left, dropped {held} subscription(s)");
    }

    /// Handles one inbound message from a registered session.
    ///
    /// Any kind other than PUBLISH, SUBSCRIBE or UNSUBSCRIBE is a protocol
    /// violation and is returned to the caller, which should end the session.
    ///
    /// # Panics
    ///
    /// If the session is not registered.
    pub fn process_message(&mut self, session: SessionId, msg: Message) -> Result<(), BrokerError> {
        let Some(handle) = self.index.sessions().resolve(session) else {
            panic!("process_message: session {session} is not registered");
        };

        match msg {
            Message::Publish(publish) => self.process_publish(handle.as_ref(), publish),
            Message::Subscribe(subscribe) => self.process_subscribe(handle.as_ref(), subscribe),
            Message::Unsubscribe(unsubscribe) => {
                self.process_unsubscribe(handle.as_ref(), unsubscribe)
            }
            other => {
                warn!("session {session} sent unexpected {}", other.kind());
                return Err(BrokerError::Protocol(other.kind()));
            }
        }
        Ok(())
    }

    fn process_publish(&mut self, publisher: &dyn Session, publish: Publish) {
        let (subscription, receivers) = match self.index.receivers(&publish.topic) {
            Some((subscription, subscribers)) => (
                Some(subscription),
                self.filter_receivers(publisher.id(), &publish, subscribers),
            ),
            None => (None, HashSet::new()),
        };

        let publication = self.ids.next_id();

        if publish.acknowledge {
            publisher.send(Message::Published(Published {
                request: publish.request,
                publication,
            }));
        }

        let Some(subscription) = subscription else {
            debug!("publication {publication} on {:?}: no subscribers", publish.topic);
            return;
        };
        if receivers.is_empty() {
            debug!("publication {publication} on {:?}: all receivers filtered", publish.topic);
            return;
        }

        let template = EventTemplate {
            subscription,
            publication,
            args: publish.args,
            kwargs: publish.kwargs,
            publisher: publish.disclose_me.then_some(publisher.id()),
        };
        let targets = self.index.sessions().resolve_all(&receivers);
        debug!(
            "publication {publication} on {:?}: {} receiver(s)",
            publish.topic,
            targets.len()
        );
        for receiver in targets {
            receiver.send(Message::Event(template.for_receiver(receiver.id())));
        }
    }

    /// Narrows a topic's subscribers by the publish's eligible list, exclude
    /// list and self-exclusion flag, in that order.
    fn filter_receivers(
        &self,
        publisher: SessionId,
        publish: &Publish,
        mut receivers: HashSet<SessionId>,
    ) -> HashSet<SessionId> {
        if let Some(eligible) = publish.eligible.as_deref().filter(|ids| !ids.is_empty()) {
            let allowed = self.resolve_ids(eligible);
            receivers.retain(|id| allowed.contains(id));
        }

        if let Some(exclude) = publish.exclude.as_deref().filter(|ids| !ids.is_empty()) {
            let denied = self.resolve_ids(exclude);
            receivers.retain(|id| !denied.contains(id));
        }

        // Only an explicit `exclude_me: true` keeps the publisher.
        if publish.exclude_me != Some(true) {
            receivers.remove(&publisher);
        }

        receivers
    }

    /// Ids that resolve to a live session; the rest are silently dropped.
    fn resolve_ids(&self, ids: &[SessionId]) -> HashSet<SessionId> {
        self.index
            .sessions()
            .resolve_all(ids)
            .iter()
            .map(|session| session.id())
            .collect()
    }

    fn process_subscribe(&mut self, session: &dyn Session, subscribe: Subscribe) {
        let subscription = self.index.subscribe(session.id(), &subscribe.topic);
        debug!(
            "session {} subscribed to {:?} as {subscription}",
            session.id(),
            subscribe.topic
        );
        session.send(Message::Subscribed(Subscribed {
            request: subscribe.request,
            subscription,
        }));
    }

    fn process_unsubscribe(&mut self, session: &dyn Session, unsubscribe: Unsubscribe) {
        let reply = if self.index.unsubscribe(session.id(), unsubscribe.subscription) {
            debug!(
                "session {} unsubscribed from {}",
                session.id(),
                unsubscribe.subscription
            );
            Message::Unsubscribed(Unsubscribed {
                request: unsubscribe.request,
            })
        } else {
            debug!(
                "session {} tried to unsubscribe unknown {}",
                session.id(),
                unsubscribe.subscription
            );
            Message::Error(ErrorReply {
                request_kind: MessageKind::Unsubscribe,
                request: unsubscribe.request,
                error: ErrorCode::NoSuchSubscription,
            })
        };
        session.send(reply);
    }
}
