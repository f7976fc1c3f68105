// handlers/protected/notification_ws.rs - GET /api/v1/notifications/ws handler
//
// Browsers cannot set an Authorization header on a WebSocket handshake, so the
// bearer token arrives as `?token=` and is checked here instead of by the
// protected-route middleware.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;

use crate::api::ApiQuery;
use crate::auth::TenantContext;
use crate::error::ApiError;
use crate::middleware::authenticate;
use crate::notify::NotificationHub;
use crate::routes::AppState;

#[derive(Debug, Deserialize)]
pub struct SocketQuery {
    pub token: Option<String>,
}

pub async fn notification_socket(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SocketQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, ApiError> {
    let token = query
        .token
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::unauthorized("Missing token"))?;
    let ctx = authenticate(token.trim())?;

    if ctx.username.trim().is_empty() {
        return Err(ApiError::invalid_token("username not found in token"));
    }

    let hub = state.hub.clone();
    Ok(ws.on_upgrade(move |socket| serve_socket(socket, hub, ctx)))
}

async fn serve_socket(socket: WebSocket, hub: NotificationHub, ctx: TenantContext) {
    let (conn_id, mut frames) = hub.register(&ctx);
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(frame) = frames.recv().await {
            if sender.send(Message::Text(frame)).await.is_err() {
                break;
            }
        }
    });

    let peer = ctx.username.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(message) = receiver.next().await {
            match message {
                Ok(Message::Close(_)) => break,
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {}
                Ok(Message::Text(text)) => tracing::debug!("Ignoring client frame from {}: {}", peer, text),
                Ok(Message::Binary(_)) => {}
                Err(e) => {
                    tracing::debug!("Socket error for {}: {}", peer, e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.unregister(&ctx, conn_id);
}
