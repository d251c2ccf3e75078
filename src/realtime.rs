//! Realtime chat channel over WebSocket
//!
//! Lifecycle per connection: `Connecting -> Authenticating -> Open -> Closed`.
//! The handshake is refused with 401 unless the token (from `?token=` or the
//! session cookie) verifies, so unauthenticated clients never reach `Open`.
//!
//! Frames are JSON objects of the form `{"event": "...", "data": {...}}`:
//!
//! - client `user-message` `{content}` -> server `ai-response` (mock reply)
//! - client `analyze-image` `{image?}` -> server `ai-response` (fixed reply)
//! - anything unparseable -> server `error` `{message}`
//!
//! Nothing is retained across reconnects.

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use crate::constants::{MSG_SOCKET_IMAGE_REPLY, TOKEN_COOKIE};
use crate::middleware::{authenticate, AuthenticatedUser};
use crate::models::ChatReply;
use crate::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Authenticating,
    Open,
    Closed,
}

#[derive(Debug, Default, Deserialize)]
pub struct HandshakeAuth {
    pub token: Option<String>,
}

/// Events sent by the client
#[derive(Debug, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    UserMessage {
        #[serde(default)]
        content: String,
    },
    AnalyzeImage {
        #[serde(default)]
        image: Option<String>,
    },
}

/// Events sent by the server
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    AiResponse(ChatReply),
    Error { message: String },
}

/// `GET /ws` - authenticate, then upgrade
pub async fn socket_handler(
    State(state): State<AppState>,
    Query(auth): Query<HandshakeAuth>,
    jar: CookieJar,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let mut conn_state = ConnectionState::Connecting;
    transition(&mut conn_state, ConnectionState::Authenticating);

    let token = auth
        .token
        .as_deref()
        .or_else(|| jar.get(TOKEN_COOKIE).map(|c| c.value()));

    let user = match authenticate(token, &state.config.jwt_secret) {
        Ok(user) => user,
        Err(e) => {
            transition(&mut conn_state, ConnectionState::Closed);
            tracing::info!("Socket handshake rejected: {}", e);
            return e.into_response();
        }
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    ws.on_upgrade(move |socket| run_connection(socket, state, user, conn_state))
}

fn transition(current: &mut ConnectionState, next: ConnectionState) {
    tracing::trace!("Socket state {:?} -> {:?}", current, next);
    *current = next;
}

async fn run_connection(
    mut socket: WebSocket,
    state: AppState,
    user: AuthenticatedUser,
    mut conn_state: ConnectionState,
) {
    transition(&mut conn_state, ConnectionState::Open);
    tracing::info!("User {} connected", user.user_id);

    while let Some(msg) = socket.recv().await {
        let msg = match msg {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!("Socket error for user {}: {}", user.user_id, e);
                break;
            }
        };

        let reply = match msg {
            Message::Text(text) => handle_frame(&state, &text).await,
            Message::Close(_) => break,
            // Pings are answered by axum
            _ => continue,
        };

        let payload = match serde_json::to_string(&reply) {
            Ok(p) => p,
            Err(e) => {
                tracing::error!("Failed to encode socket event: {}", e);
                continue;
            }
        };

        if socket.send(Message::Text(payload)).await.is_err() {
            break;
        }
    }

    transition(&mut conn_state, ConnectionState::Closed);
    tracing::info!("User {} disconnected", user.user_id);
}

/// Turn one inbound text frame into exactly one outbound event
pub async fn handle_frame(state: &AppState, text: &str) -> ServerEvent {
    match serde_json::from_str::<ClientEvent>(text) {
        Ok(ClientEvent::UserMessage { content }) => {
            ServerEvent::AiResponse(state.mock.respond(&content).await)
        }
        Ok(ClientEvent::AnalyzeImage { image }) => {
            tracing::debug!(
                "Socket image analysis request ({} bytes)",
                image.as_deref().map_or(0, str::len)
            );
            ServerEvent::AiResponse(ChatReply::assistant(MSG_SOCKET_IMAGE_REPLY))
        }
        Err(e) => {
            tracing::debug!("Unparseable socket frame: {}", e);
            ServerEvent::Error {
                message: "Failed to process message".to_string(),
            }
        }
    }
}
