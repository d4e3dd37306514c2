//! WebSocket transport
//!
//! A thin adapter between sockets and the broker:
//! - accept TCP/WebSocket connections
//! - join each connection as a `ChannelSession` with a fresh session id and
//!   tell the client its id with a WELCOME
//! - decode text frames and hand them to `Broker::process_message`
//! - drain the session's channel into the socket from a writer task
//! - remove the session exactly once when either side ends the connection
//!
//! A protocol violation or an undecodable frame ends the connection. GOODBYE
//! from the client ends it cleanly.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use futures_util::stream::SplitStream;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing::{debug, info, warn};
use tungstenite::protocol::frame::coding::CloseCode;
use tungstenite::protocol::{CloseFrame, Message as WsMessage};

use crate::broker::Broker;
use crate::broker::message::{Message, Welcome};
use crate::config::Settings;
use crate::session::{ChannelSession, Session, SessionId};
use crate::transport::codec;
use crate::utils::error::TransportError;

pub async fn start_websocket_server(
    addr: &str,
    broker: Arc<Mutex<Broker>>,
    settings: Settings,
) -> Result<(), TransportError> {
    let listener = TcpListener::bind(addr).await?;
    info!("WebSocket server listening on ws://{}", listener.local_addr()?);
    serve(listener, broker, settings).await;
    Ok(())
}

/// Accepts connections on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, broker: Arc<Mutex<Broker>>, settings: Settings) {
    let max_sessions = settings.broker.max_sessions;
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("accept failed: {e}");
                continue;
            }
        };

        let broker = broker.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer, broker, max_sessions).await {
                warn!("connection {peer} closed: {e}");
            }
        });
    }
}

fn lock(broker: &Mutex<Broker>) -> MutexGuard<'_, Broker> {
    broker.lock().expect("broker lock poisoned")
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    broker: Arc<Mutex<Broker>>,
    max_sessions: usize,
) -> Result<(), TransportError> {
    let ws_stream = accept_async(stream).await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let joined = {
        let mut broker = lock(&broker);
        if broker.index().session_count() >= max_sessions {
            None
        } else {
            let session = ChannelSession::new(broker.allocator().next_id(), tx);
            let id = session.id();
            // WELCOME goes out under the lock, ahead of anything routed to the session
            session.send(Message::Welcome(Welcome { session: id }));
            broker.add_session(Arc::new(session))?;
            Some(id)
        }
    };

    let Some(session_id) = joined else {
        warn!("refusing {peer}: session limit {max_sessions} reached");
        ws_sender
            .send(WsMessage::Close(Some(CloseFrame {
                code: CloseCode::Again,
                reason: "session limit reached".into(),
            })))
            .await?;
        return Ok(());
    };
    info!("{peer} joined as session {session_id}");

    let writer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let frame = match codec::encode(&msg) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("session {session_id}: {e}");
                    continue;
                }
            };
            if let Err(e) = ws_sender.send(frame).await {
                debug!("session {session_id}: send failed: {e}");
                return;
            }
        }
        let _ = ws_sender.close().await;
    });

    let outcome = read_loop(&mut ws_receiver, &broker, session_id).await;

    // dropping the registry's handle closes the channel and stops the writer
    lock(&broker).remove_session(session_id);
    let _ = writer.await;
    info!("session {session_id} disconnected");
    outcome
}

async fn read_loop(
    ws_receiver: &mut SplitStream<WebSocketStream<TcpStream>>,
    broker: &Mutex<Broker>,
    session_id: SessionId,
) -> Result<(), TransportError> {
    while let Some(frame) = ws_receiver.next().await {
        let text = match frame? {
            WsMessage::Text(text) => text,
            WsMessage::Close(_) => break,
            _ => continue,
        };

        let msg = codec::decode(&text)?;
        if let Message::Goodbye(goodbye) = msg {
            debug!("session {session_id} said goodbye: {:?}", goodbye.reason);
            break;
        }
        lock(broker).process_message(session_id, msg)?;
    }
    Ok(())
}
