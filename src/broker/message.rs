//! Protocol messages handled by the broker
//!
//! Only the fields the routing core reads or writes are modelled. Payloads
//! (`args`/`kwargs`) are opaque JSON passed through to receivers untouched.
//!
//! The serde representation is the transport's wire format: a JSON object
//! tagged by `"type"`, for example
//! `{"type":"subscribe","request":1,"topic":"news"}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::SessionId;

pub type RequestId = u64;
pub type SubscriptionId = u64;
pub type PublicationId = u64;

pub type Args = Vec<Value>;
pub type Kwargs = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    Welcome,
    Goodbye,
    Error,
    Publish,
    Published,
    Subscribe,
    Subscribed,
    Unsubscribe,
    Unsubscribed,
    Event,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageKind::Welcome => "WELCOME",
            MessageKind::Goodbye => "GOODBYE",
            MessageKind::Error => "ERROR",
            MessageKind::Publish => "PUBLISH",
            MessageKind::Published => "PUBLISHED",
            MessageKind::Subscribe => "SUBSCRIBE",
            MessageKind::Subscribed => "SUBSCRIBED",
            MessageKind::Unsubscribe => "UNSUBSCRIBE",
            MessageKind::Unsubscribed => "UNSUBSCRIBED",
            MessageKind::Event => "EVENT",
        };
        f.write_str(name)
    }
}

/// Application error codes reported in an ERROR reply, serialized as URIs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "wamp.error.no_such_subscription")]
    NoSuchSubscription,
}

impl ErrorCode {
    pub fn uri(&self) -> &'static str {
        match self {
            ErrorCode::NoSuchSubscription => "wamp.error.no_such_subscription",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.uri())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    Welcome(Welcome),
    Goodbye(Goodbye),
    Error(ErrorReply),
    Publish(Publish),
    Published(Published),
    Subscribe(Subscribe),
    Subscribed(Subscribed),
    Unsubscribe(Unsubscribe),
    Unsubscribed(Unsubscribed),
    Event(Event),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::Welcome(_) => MessageKind::Welcome,
            Message::Goodbye(_) => MessageKind::Goodbye,
            Message::Error(_) => MessageKind::Error,
            Message::Publish(_) => MessageKind::Publish,
            Message::Published(_) => MessageKind::Published,
            Message::Subscribe(_) => MessageKind::Subscribe,
            Message::Subscribed(_) => MessageKind::Subscribed,
            Message::Unsubscribe(_) => MessageKind::Unsubscribe,
            Message::Unsubscribed(_) => MessageKind::Unsubscribed,
            Message::Event(_) => MessageKind::Event,
        }
    }
}

/// Sent by the transport when a session has joined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Welcome {
    pub session: SessionId,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Goodbye {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub request_kind: MessageKind,
    pub request: RequestId,
    pub error: ErrorCode,
}

/// A publish request.
///
/// `exclude_me` is tri-state on the wire: absent, false or true. The
/// publisher is dropped from its own receivers unless it is explicitly true.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Publish {
    pub request: RequestId,
    pub topic: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<Kwargs>,
    #[serde(default)]
    pub acknowledge: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligible: Option<Vec<SessionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude: Option<Vec<SessionId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclude_me: Option<bool>,
    #[serde(default)]
    pub disclose_me: bool,
}

impl Publish {
    pub fn new(request: RequestId, topic: impl Into<String>) -> Self {
        Self {
            request,
            topic: topic.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Published {
    pub request: RequestId,
    pub publication: PublicationId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscribe {
    pub request: RequestId,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscribed {
    pub request: RequestId,
    pub subscription: SubscriptionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unsubscribe {
    pub request: RequestId,
    pub subscription: SubscriptionId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unsubscribed {
    pub request: RequestId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Addressing metadata: the session this copy is delivered to.
    pub receiver: SessionId,
    pub subscription: SubscriptionId,
    pub publication: PublicationId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Args>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<Kwargs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<SessionId>,
}

/// Everything an event carries except its receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct EventTemplate {
    pub subscription: SubscriptionId,
    pub publication: PublicationId,
    pub args: Option<Args>,
    pub kwargs: Option<Kwargs>,
    pub publisher: Option<SessionId>,
}

impl EventTemplate {
    pub fn for_receiver(&self, receiver: SessionId) -> Event {
        Event {
            receiver,
            subscription: self.subscription,
            publication: self.publication,
            args: self.args.clone(),
            kwargs: self.kwargs.clone(),
            publisher: self.publisher,
        }
    }
}
