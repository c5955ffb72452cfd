use axum::{
    extract::{
        ws::{Message, WebSocket},
        Path, State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::stream::StreamExt;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::event::EventBus;
use crate::shared::{AppError, AppState};

/// GET /tournaments/:id/live
///
/// Streams every tournament event as a JSON text frame until the client disconnects.
pub async fn live_feed(
    ws: WebSocketUpgrade,
    Path(tournament_id): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    state.tournament_service.get_tournament(&tournament_id).await?;

    info!(tournament_id = %tournament_id, "Live feed connection requested");
    let event_bus = state.event_bus.clone();
    Ok(ws.on_upgrade(move |socket| stream_events(socket, tournament_id, event_bus)))
}

async fn stream_events(mut socket: WebSocket, tournament_id: String, event_bus: EventBus) {
    let mut receiver = event_bus.subscribe(&tournament_id).await;

    loop {
        tokio::select! {
            event = receiver.recv() => match event {
                Ok(event) => {
                    let text = match serde_json::to_string(&event) {
                        Ok(text) => text,
                        Err(e) => {
                            warn!(error = %e, event_type = event.event_type(), "Failed to encode live event");
                            continue;
                        }
                    };
                    if socket.send(Message::Text(text)).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(tournament_id = %tournament_id, skipped, "Live viewer fell behind, events skipped");
                }
                Err(RecvError::Closed) => break,
            },

            incoming = socket.next() => match incoming {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                // The feed is one-way
                Some(Ok(_)) => {}
            },
        }
    }

    debug!(tournament_id = %tournament_id, "Live feed connection closed");
}
