use super::codec::{decode, encode};
use crate::broker::message::{Event, Message, Subscribe};
use crate::utils::error::TransportError;
use serde_json::json;
use tungstenite::protocol::Message as WsMessage;

#[test]
fn test_decode_subscribe() {
    let msg = decode(r#"{"type":"subscribe","request":1,"topic":"news"}"#).unwrap();
    assert_eq!(
        msg,
        Message::Subscribe(Subscribe {
            request: 1,
            topic: "news".to_string(),
        })
    );
}

#[test]
fn test_decode_publish_with_options() {
    let text = json!({
        "type": "publish",
        "request": 2,
        "topic": "news",
        "args": [1, "two"],
        "kwargs": {"k": true},
        "acknowledge": true,
        "eligible": [5, 6],
        "exclude_me": false,
        "disclose_me": true
    })
    .to_string();

    let Message::Publish(publish) = decode(&text).unwrap() else {
        panic!("Expected Publish");
    };
    assert!(publish.acknowledge);
    assert!(publish.disclose_me);
    assert_eq!(publish.eligible, Some(vec![5, 6]));
    assert_eq!(publish.exclude, None);
    assert_eq!(publish.exclude_me, Some(false));
    assert_eq!(publish.args, Some(vec![json!(1), json!("two")]));
}

#[test]
fn test_decode_rejects_unknown_type() {
    let err = decode(r#"{"type":"call","request":1}"#).unwrap_err();
    assert!(matches!(err, TransportError::Decode(_)));
}

#[test]
fn test_encode_event_omits_absent_fields() {
    let msg = Message::Event(Event {
        receiver: 3,
        subscription: 1,
        publication: 2,
        args: None,
        kwargs: None,
        publisher: None,
    });
    let WsMessage::Text(text) = encode(&msg).unwrap() else {
        panic!("Expected a text frame");
    };
    let value: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(
        value,
        json!({"type": "event", "receiver": 3, "subscription": 1, "publication": 2})
    );
}
