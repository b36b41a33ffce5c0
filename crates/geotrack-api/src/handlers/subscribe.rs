use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use geotrack_core::models::Subject;
use geotrack_engine::{Dispatcher, Received, Subscription};
use serde::Serialize;

use crate::dto::LagNotice;
use crate::error::ApiError;
use crate::state::AppState;

/// Upgrade to a WebSocket streaming the subject's events as JSON text frames
pub async fn subscribe(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let subject = Subject::parse(&kind, &id)?;
    let dispatcher = state.tracking.dispatcher().clone();

    Ok(ws.on_upgrade(move |socket| {
        let subscription = dispatcher.subscribe(subject);
        stream_events(socket, subscription, dispatcher)
    }))
}

async fn stream_events(
    mut socket: WebSocket,
    mut subscription: Subscription,
    dispatcher: Arc<Dispatcher>,
) {
    tracing::info!(
        subject = %subscription.subject(),
        id = %subscription.id(),
        "Subscriber connected"
    );

    loop {
        tokio::select! {
            received = subscription.recv() => {
                let sent = match received {
                    Some(Received::Event(event)) => send_json(&mut socket, &event).await,
                    Some(Received::Lagged(missed)) => {
                        send_json(&mut socket, &LagNotice::new(missed)).await
                    }
                    None => false,
                };
                if !sent {
                    break;
                }
            }
            incoming = socket.recv() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // Inbound frames carry nothing for us
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!(
        subject = %subscription.subject(),
        id = %subscription.id(),
        missed = subscription.missed_events(),
        "Subscriber disconnected"
    );
    dispatcher.unsubscribe(subscription);
}

async fn send_json<T: Serialize>(socket: &mut WebSocket, frame: &T) -> bool {
    match serde_json::to_string(frame) {
        Ok(text) => socket.send(Message::Text(text.into())).await.is_ok(),
        Err(e) => {
            tracing::error!(error = %e, "Failed to encode event frame");
            false
        }
    }
}
