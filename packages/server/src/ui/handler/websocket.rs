//! WebSocket connection handlers.
//!
//! One task reads inbound frames and dispatches them in arrival order; a
//! second task drains the connection's outbound channel into the socket.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, MessageContent, Password, Photo, RoomName, ServerEvent, Username,
        ValueObjectError,
    },
    infrastructure::dto::websocket::{
        ChatMessagePayload, ClearMessagesPayload, ClientMessage, JoinRoomPayload, LoginPayload,
        RegisterUserPayload, SignupPayload, TypingPayload,
    },
    ui::state::AppState,
    usecase::{AuthError, AuthenticatedUser},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.max_message_size(state.max_message_bytes)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// # Arguments
///
/// * `rx` - Channel receiver fed by the MessagePusher
/// * `sender` - WebSocket sink to send frames to this client
///
/// # Returns
///
/// A `JoinHandle` for the spawned task
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this connection to receive frames
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_participant_usecase.execute(tx).await;

    let state_clone = state.clone();

    // Spawn a task to receive frames from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on connection '{}': {}", connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    handle_frame(&state_clone, connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Connection '{}' requested close", connection_id);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to forward pushed frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    if let Err(e) = state
        .disconnect_participant_usecase
        .execute(&connection_id)
        .await
    {
        tracing::warn!(
            "Failed to announce disconnect of '{}': {}",
            connection_id,
            e
        );
    }
}

/// Decode one inbound frame, run it and answer the originating connection
async fn handle_frame(state: &AppState, connection_id: ConnectionId, text: &str) {
    let reply = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => {
            tracing::debug!(
                "Connection '{}' sent '{}'",
                connection_id,
                message_name(&message)
            );
            dispatch(state, connection_id, message).await
        }
        Err(e) => {
            tracing::warn!(
                "Malformed frame from connection '{}': {}",
                connection_id,
                e
            );
            Some(ServerEvent::Error {
                reason: format!("Malformed frame: {}", e),
            })
        }
    };

    if let Some(event) = reply
        && let Err(e) = state.message_pusher.push_to(&connection_id, &event).await
    {
        tracing::warn!(
            "Failed to reply '{}' to connection '{}': {}",
            event.name(),
            connection_id,
            e
        );
    }
}

fn message_name(message: &ClientMessage) -> &'static str {
    match message {
        ClientMessage::Signup(_) => "signup",
        ClientMessage::Login(_) => "login",
        ClientMessage::RegisterUser(_) => "register-user",
        ClientMessage::JoinRoom(_) => "join-room",
        ClientMessage::ChatMessage(_) => "chat-message",
        ClientMessage::Typing(_) => "typing",
        ClientMessage::ClearMessages(_) => "clearMessages",
    }
}

/// Run an inbound event
///
/// # Returns
///
/// The event to send back to the originating connection only, if any.
async fn dispatch(
    state: &AppState,
    connection_id: ConnectionId,
    message: ClientMessage,
) -> Option<ServerEvent> {
    match message {
        ClientMessage::Signup(payload) => Some(signup(state, payload).await),
        ClientMessage::Login(payload) => Some(login(state, payload).await),
        ClientMessage::RegisterUser(payload) => {
            register_user(state, connection_id, payload).await.err()
        }
        ClientMessage::JoinRoom(payload) => join_room(state, connection_id, payload).await.err(),
        ClientMessage::ChatMessage(payload) => {
            chat_message(state, connection_id, payload).await.err()
        }
        ClientMessage::Typing(payload) => {
            typing(state, connection_id, payload).await;
            None
        }
        ClientMessage::ClearMessages(payload) => clear_messages(state, payload).await.err(),
    }
}

fn error_event(reason: impl ToString) -> ServerEvent {
    ServerEvent::Error {
        reason: reason.to_string(),
    }
}

fn auth_reply(result: Result<AuthenticatedUser, AuthError>) -> ServerEvent {
    match result {
        Ok(user) => ServerEvent::AuthSuccess {
            username: user.username,
            photo: user.photo,
        },
        Err(e @ (AuthError::Persistence(_) | AuthError::Hashing(_))) => {
            tracing::error!("Authentication failed: {}", e);
            ServerEvent::AuthFail {
                reason: "Authentication is temporarily unavailable".to_string(),
            }
        }
        Err(e) => ServerEvent::AuthFail {
            reason: e.to_string(),
        },
    }
}

fn credentials(
    username: String,
    password: String,
) -> Result<(Username, Password), ValueObjectError> {
    Ok((Username::new(username)?, Password::new(password)?))
}

async fn signup(state: &AppState, payload: SignupPayload) -> ServerEvent {
    let (username, password) = match credentials(payload.username, payload.password) {
        Ok(credentials) => credentials,
        Err(e) => {
            return ServerEvent::AuthFail {
                reason: e.to_string(),
            };
        }
    };
    auth_reply(
        state
            .auth_usecase
            .signup(username, password, Photo::new(payload.photo))
            .await,
    )
}

async fn login(state: &AppState, payload: LoginPayload) -> ServerEvent {
    let (username, password) = match credentials(payload.username, payload.password) {
        Ok(credentials) => credentials,
        // 不正な形式の資格情報も誤パスワードと区別しない
        Err(_) => {
            return ServerEvent::AuthFail {
                reason: AuthError::InvalidCredentials.to_string(),
            };
        }
    };
    auth_reply(state.auth_usecase.login(username, password).await)
}

async fn register_user(
    state: &AppState,
    connection_id: ConnectionId,
    payload: RegisterUserPayload,
) -> Result<(), ServerEvent> {
    let username = Username::new(payload.username).map_err(error_event)?;
    state
        .presence_usecase
        .register(connection_id, username, Photo::new(payload.photo))
        .await
        .map_err(|e| {
            tracing::error!("Failed to register connection '{}': {}", connection_id, e);
            error_event(e)
        })
}

async fn join_room(
    state: &AppState,
    connection_id: ConnectionId,
    payload: JoinRoomPayload,
) -> Result<(), ServerEvent> {
    let room = RoomName::new(payload.room).map_err(error_event)?;
    state
        .room_usecase
        .join(connection_id, room)
        .await
        .map(|_| ())
        .map_err(error_event)
}

async fn chat_message(
    state: &AppState,
    connection_id: ConnectionId,
    payload: ChatMessagePayload,
) -> Result<(), ServerEvent> {
    let room = RoomName::new(payload.room).map_err(error_event)?;
    let sender = Username::new(payload.sender).map_err(error_event)?;
    let content = MessageContent::new(payload.content).map_err(error_event)?;
    state
        .broadcast
        .publish(room, sender, content)
        .await
        .map(|_| ())
        .map_err(|e| {
            tracing::error!(
                "Failed to publish message from connection '{}': {}",
                connection_id,
                e
            );
            error_event(e)
        })
}

/// Relay a typing signal; never answers the originator
async fn typing(state: &AppState, connection_id: ConnectionId, payload: TypingPayload) {
    // best-effort: 不正な入力も配信の失敗も応答しない
    let (room, name) = match (RoomName::new(payload.room), Username::new(payload.name)) {
        (Ok(room), Ok(name)) => (room, name),
        (Err(e), _) | (_, Err(e)) => {
            tracing::debug!("Dropped typing from '{}': {}", connection_id, e);
            return;
        }
    };
    if let Err(e) = state
        .broadcast
        .relay_typing(room, name, &connection_id)
        .await
    {
        tracing::debug!("Failed to relay typing from '{}': {}", connection_id, e);
    }
}

async fn clear_messages(state: &AppState, payload: ClearMessagesPayload) -> Result<(), ServerEvent> {
    state
        .clear_messages_usecase
        .execute(Some(&payload.token))
        .await
        .map_err(error_event)
}
