use std::sync::Arc;

use super::{ChannelSession, Session, SessionRegistry};
use crate::broker::message::{Message, Unsubscribed};
use tokio::sync::mpsc;

#[test]
fn test_channel_session_send() {
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let session = ChannelSession::new(7, tx);
    assert_eq!(session.id(), 7);

    session.send(Message::Unsubscribed(Unsubscribed { request: 3 }));
    match rx.try_recv().unwrap() {
        Message::Unsubscribed(u) => assert_eq!(u.request, 3),
        other => panic!("Expected Unsubscribed, got {:?}", other),
    }
}

#[test]
fn test_channel_session_send_after_close_is_silent() {
    let (tx, rx) = mpsc::unbounded_channel::<Message>();
    let session = ChannelSession::new(1, tx);
    drop(rx);
    session.send(Message::Unsubscribed(Unsubscribed { request: 1 }));
}

#[test]
fn test_registry_register_and_resolve() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = mpsc::unbounded_channel::<Message>();
    assert!(registry.register(Arc::new(ChannelSession::new(1, tx.clone()))));
    assert!(!registry.register(Arc::new(ChannelSession::new(1, tx.clone()))));
    assert!(registry.register(Arc::new(ChannelSession::new(2, tx))));

    assert_eq!(registry.len(), 2);
    assert_eq!(registry.resolve(2).map(|s| s.id()), Some(2));
    assert!(registry.resolve(3).is_none());

    let resolved: Vec<_> = registry
        .resolve_all(&[1, 3, 2])
        .iter()
        .map(|s| s.id())
        .collect();
    assert_eq!(resolved, vec![1, 2]);
}

#[test]
fn test_registry_deregister() {
    let mut registry = SessionRegistry::new();
    let (tx, _rx) = mpsc::unbounded_channel::<Message>();
    registry.register(Arc::new(ChannelSession::new(1, tx)));

    assert!(registry.deregister(1).is_some());
    assert!(registry.deregister(1).is_none());
    assert!(!registry.contains(1));
    assert!(registry.is_empty());
}
