//! WebSocket connection handlers.
//!
//! One socket = one session. The server assigns the connection ID,
//! pushes it back as CONNECTED, then routes every inbound envelope to
//! its UseCase. Each request gets exactly one ack; game-wide fan-out
//! happens inside the UseCases.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{Connection, ConnectionId},
    infrastructure::dto::websocket::{
        ActionEnvelope, ActionName, ConnectedPayload, ConnectionDto, CreateGamePayload,
        DeclareWinPayload, DrawnTilePayload, GameDeletedPayload, GameDto, GameListPayload,
        GameLoadedPayload, InGameUpdatePayload, InteractionCountPayload, JoinGamePayload,
        PlayTilePayload, ResponseEnvelope, SelfPlayTilePayload, SendMessagePayload,
        SetUsernamePayload, TileInteractionPayload, UserListPayload,
    },
    ui::state::AppState,
    usecase::{DrawTileOutcome, InteractionOutcome, LeaveGameError, LeaveOutcome},
};

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, StatusCode> {
    // Create a channel for this session to receive pushed frames
    let (tx, rx) = mpsc::unbounded_channel();

    // Use ConnectSessionUseCase to assign an ID and register the session
    // (register_client is called inside the UseCase)
    match state.connect_session_usecase.execute(tx).await {
        Ok(connection) => {
            tracing::info!(
                "Session '{}' connected and registered",
                connection.id.as_str()
            );
            Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, connection, rx)))
        }
        Err(e) => {
            tracing::error!("Failed to register a new session: {}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Spawns a task that receives frames from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound flow: acks and server pushes (via rx channel)
/// are sent to this client's WebSocket connection.
///
/// # Arguments
///
/// * `rx` - Channel receiver for frames addressed to this session
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
        while let Some(msg) = rx.recv().await {
            // Send the frame to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    connection: Connection,
    rx: mpsc::UnboundedReceiver<String>,
) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = connection.id.clone();

    // Tell the client its server-assigned connection ID
    {
        let connected = ResponseEnvelope::push(
            ActionName::Connected,
            ConnectedPayload {
                connection_id: connection_id.as_str().to_string(),
            },
        );
        if let Err(e) = sender.send(Message::Text(connected.to_json().into())).await {
            tracing::error!(
                "Failed to send CONNECTED to '{}': {}",
                connection_id.as_str(),
                e
            );
            teardown(&state, &connection_id).await;
            return;
        }
        tracing::info!("Sent CONNECTED to '{}'", connection_id.as_str());
    }

    let connection_id_clone = connection_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive actions from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Parse the incoming envelope
                    let envelope = match serde_json::from_str::<ActionEnvelope>(&text) {
                        Ok(envelope) => envelope,
                        Err(e) => {
                            tracing::warn!("Failed to parse action envelope: {}", e);
                            continue;
                        }
                    };
                    dispatch_action(&state_clone, &connection_id_clone, envelope).await;
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!(
                        "Session '{}' requested close",
                        connection_id_clone.as_str()
                    );
                    break;
                }
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

    teardown(&state, &connection_id).await;
}

/// Leave the current game (if any), then drop the session registration.
async fn teardown(state: &Arc<AppState>, connection_id: &ConnectionId) {
    match state.leave_game_usecase.execute(connection_id).await {
        Ok(_) => {
            tracing::info!(
                "Session '{}' left its game on disconnect",
                connection_id.as_str()
            );
        }
        Err(LeaveGameError::NotInGame) => {
            // Lobby-only sessions are not in a game
        }
        Err(e) => {
            tracing::warn!(
                "Failed to leave game for '{}': {}",
                connection_id.as_str(),
                e
            );
        }
    }

    match state.disconnect_session_usecase.execute(connection_id).await {
        Ok(()) => {
            tracing::info!(
                "Session '{}' disconnected and removed from registry",
                connection_id.as_str()
            );
        }
        Err(e) => {
            tracing::warn!(
                "Failed to disconnect session '{}': {}",
                connection_id.as_str(),
                e
            );
        }
    }
}

/// Routes one inbound envelope to its UseCase and delivers the ack.
async fn dispatch_action(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    envelope: ActionEnvelope,
) {
    let action = envelope.action;
    let payload = envelope.payload;

    let ack = match action {
        ActionName::SetUsername => handle_set_username(state, connection_id, payload).await,
        ActionName::GetAllUsers => handle_get_all_users(state).await,
        ActionName::CreateGame => handle_create_game(state, connection_id, payload).await,
        ActionName::GetAllGames => handle_get_all_games(state).await,
        ActionName::JoinGame => handle_join_game(state, connection_id, payload).await,
        ActionName::LeaveGame => handle_leave_game(state, connection_id).await,
        ActionName::StartGame => handle_start_game(state, connection_id).await,
        ActionName::GamePageLoad => handle_game_page_load(state, connection_id).await,
        ActionName::SendMessage => handle_send_message(state, connection_id, payload).await,
        ActionName::DrawTile => handle_draw_tile(state, connection_id).await,
        ActionName::PlayTile => handle_play_tile(state, connection_id, payload).await,
        ActionName::PlayedTileInteraction => {
            handle_tile_interaction(state, connection_id, payload).await
        }
        ActionName::WinningTiles => handle_winning_tiles(state, connection_id, payload).await,
        ActionName::SelfPlayTile => handle_self_play_tile(state, connection_id, payload).await,
        ActionName::GameReset => handle_game_reset(state, connection_id).await,
        other => {
            // Server-to-client actions are not valid requests
            tracing::warn!(
                "Received push-only action {:?} from '{}'",
                other,
                connection_id.as_str()
            );
            return;
        }
    };

    if let Err(e) = state.message_pusher.push_to(connection_id, &ack.to_json()).await {
        tracing::warn!(
            "Failed to deliver {:?} ack to '{}': {}",
            action,
            connection_id.as_str(),
            e
        );
    }
}

/// Decode an action payload, or build the failure ack for it.
fn decode_payload<T: serde::de::DeserializeOwned>(
    action: ActionName,
    payload: serde_json::Value,
) -> Result<T, ResponseEnvelope> {
    serde_json::from_value(payload)
        .map_err(|e| ResponseEnvelope::failure(action, format!("invalid payload: {}", e)))
}

async fn handle_set_username(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: SetUsernamePayload = match decode_payload(ActionName::SetUsername, payload) {
        Ok(payload) => payload,
        Err(failure) => return failure,
    };
    match state
        .set_username_usecase
        .execute(connection_id, payload.username)
        .await
    {
        Ok(connection) => {
            ResponseEnvelope::ok(ActionName::SetUsername, ConnectionDto::from(connection))
        }
        Err(e) => ResponseEnvelope::failure(ActionName::SetUsername, e.to_string()),
    }
}

async fn handle_get_all_users(state: &Arc<AppState>) -> ResponseEnvelope {
    let connections = state.get_connections_usecase.execute().await;

    // Domain Model から DTO への変換
    let users: Vec<ConnectionDto> = connections.into_iter().map(ConnectionDto::from).collect();
    ResponseEnvelope::ok(ActionName::GetAllUsers, UserListPayload { users })
}

async fn handle_create_game(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: CreateGamePayload = match decode_payload(ActionName::CreateGame, payload) {
        Ok(payload) => payload,
        Err(failure) => return failure,
    };
    match state
        .create_game_usecase
        .execute(
            connection_id,
            payload.game_name,
            payload.game_type,
            payload.game_version,
        )
        .await
    {
        Ok(game) => ResponseEnvelope::ok(ActionName::CreateGame, GameDto::from(game)),
        Err(e) => ResponseEnvelope::failure(ActionName::CreateGame, e.to_string()),
    }
}

async fn handle_get_all_games(state: &Arc<AppState>) -> ResponseEnvelope {
    let games = state.get_games_usecase.execute().await;

    // Domain Model から DTO への変換
    let games: Vec<GameDto> = games.into_iter().map(GameDto::from).collect();
    ResponseEnvelope::ok(ActionName::GetAllGames, GameListPayload { games })
}

async fn handle_join_game(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: JoinGamePayload = match decode_payload(ActionName::JoinGame, payload) {
        Ok(payload) => payload,
        Err(failure) => return failure,
    };
    match state
        .join_game_usecase
        .execute(connection_id, payload.game_id)
        .await
    {
        Ok(game) => ResponseEnvelope::ok(ActionName::JoinGame, GameDto::from(game)),
        Err(e) => ResponseEnvelope::failure(ActionName::JoinGame, e.to_string()),
    }
}

async fn handle_leave_game(state: &Arc<AppState>, connection_id: &ConnectionId) -> ResponseEnvelope {
    match state.leave_game_usecase.execute(connection_id).await {
        Ok(LeaveOutcome::Left { game }) => {
            ResponseEnvelope::ok(ActionName::LeaveGame, GameDto::from(game))
        }
        Ok(LeaveOutcome::Deleted { game_id }) => ResponseEnvelope::ok(
            ActionName::LeaveGame,
            GameDeletedPayload {
                game_id: game_id.into_string(),
            },
        ),
        Err(e) => ResponseEnvelope::failure(ActionName::LeaveGame, e.to_string()),
    }
}

async fn handle_start_game(state: &Arc<AppState>, connection_id: &ConnectionId) -> ResponseEnvelope {
    match state.start_game_usecase.execute(connection_id).await {
        Ok(game) => ResponseEnvelope::ok(ActionName::StartGame, GameDto::from(game)),
        Err(e) => ResponseEnvelope::failure(ActionName::StartGame, e.to_string()),
    }
}

async fn handle_game_page_load(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
) -> ResponseEnvelope {
    match state.mark_game_loaded_usecase.execute(connection_id).await {
        Ok(loaded_count) => {
            ResponseEnvelope::ok(ActionName::GamePageLoad, GameLoadedPayload { loaded_count })
        }
        Err(e) => ResponseEnvelope::failure(ActionName::GamePageLoad, e.to_string()),
    }
}

async fn handle_send_message(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: SendMessagePayload = match decode_payload(ActionName::SendMessage, payload) {
        Ok(payload) => payload,
        Err(failure) => return failure,
    };
    match state
        .send_message_usecase
        .execute(connection_id, payload.message)
        .await
    {
        Ok(_targets) => ResponseEnvelope::ok(ActionName::SendMessage, serde_json::Value::Null),
        Err(e) => ResponseEnvelope::failure(ActionName::SendMessage, e.to_string()),
    }
}

async fn handle_draw_tile(state: &Arc<AppState>, connection_id: &ConnectionId) -> ResponseEnvelope {
    match state.draw_tile_usecase.execute(connection_id).await {
        Ok(DrawTileOutcome::Drawn {
            tile,
            current_index,
        }) => ResponseEnvelope::ok(
            ActionName::DrawTile,
            DrawnTilePayload {
                tile: Some(tile),
                current_index,
            },
        ),
        Ok(DrawTileOutcome::Exhausted { current_index }) => ResponseEnvelope::ok(
            ActionName::DrawTile,
            DrawnTilePayload {
                tile: None,
                current_index,
            },
        ),
        Err(e) => ResponseEnvelope::failure(ActionName::DrawTile, e.to_string()),
    }
}

async fn handle_play_tile(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: PlayTilePayload = match decode_payload(ActionName::PlayTile, payload) {
        Ok(payload) => payload,
        Err(failure) => return failure,
    };
    match state
        .play_tile_usecase
        .execute(connection_id, payload.tile)
        .await
    {
        Ok(_state) => ResponseEnvelope::ok(ActionName::PlayTile, serde_json::Value::Null),
        Err(e) => ResponseEnvelope::failure(ActionName::PlayTile, e.to_string()),
    }
}

async fn handle_tile_interaction(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: TileInteractionPayload =
        match decode_payload(ActionName::PlayedTileInteraction, payload) {
            Ok(payload) => payload,
            Err(failure) => return failure,
        };
    match state
        .submit_interaction_usecase
        .execute(
            connection_id,
            payload.meld_type,
            payload.played_tiles,
            payload.skip_interaction,
        )
        .await
    {
        Ok(InteractionOutcome::Pending { collected }) => ResponseEnvelope::ok(
            ActionName::PlayedTileInteraction,
            InteractionCountPayload {
                interaction_count: collected,
            },
        ),
        // 決着させた本人は IN_GAME_UPDATE を受け取らないので、ack が結果を運ぶ
        Ok(InteractionOutcome::Resolved {
            claimant,
            meld_type,
            played_tiles,
            next_turn,
        }) => ResponseEnvelope::ok(
            ActionName::PlayedTileInteraction,
            InGameUpdatePayload {
                connection_id: claimant.map(|id| id.into_string()),
                meld_type,
                played_tiles,
                current_turn: next_turn,
            },
        ),
        Err(e) => ResponseEnvelope::failure(ActionName::PlayedTileInteraction, e.to_string()),
    }
}

async fn handle_winning_tiles(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: DeclareWinPayload = match decode_payload(ActionName::WinningTiles, payload) {
        Ok(payload) => payload,
        Err(failure) => return failure,
    };
    match state
        .declare_win_usecase
        .execute(connection_id, payload.tiles)
        .await
    {
        Ok(()) => ResponseEnvelope::ok(ActionName::WinningTiles, serde_json::Value::Null),
        Err(e) => ResponseEnvelope::failure(ActionName::WinningTiles, e.to_string()),
    }
}

async fn handle_self_play_tile(
    state: &Arc<AppState>,
    connection_id: &ConnectionId,
    payload: serde_json::Value,
) -> ResponseEnvelope {
    let payload: SelfPlayTilePayload = match decode_payload(ActionName::SelfPlayTile, payload) {
        Ok(payload) => payload,
        Err(failure) => return failure,
    };
    match state
        .self_play_tile_usecase
        .execute(connection_id, payload.tile)
        .await
    {
        Ok(_state) => ResponseEnvelope::ok(ActionName::SelfPlayTile, serde_json::Value::Null),
        Err(e) => ResponseEnvelope::failure(ActionName::SelfPlayTile, e.to_string()),
    }
}

async fn handle_game_reset(state: &Arc<AppState>, connection_id: &ConnectionId) -> ResponseEnvelope {
    match state.resync_game_usecase.execute(connection_id).await {
        Ok(()) => ResponseEnvelope::ok(ActionName::GameReset, serde_json::Value::Null),
        Err(e) => ResponseEnvelope::failure(ActionName::GameReset, e.to_string()),
    }
}
