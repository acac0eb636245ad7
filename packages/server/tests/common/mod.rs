//! Shared wiring for the integration tests: an in-process server plus a
//! minimal WebSocket client speaking the action envelope protocol.

use std::sync::Arc;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

use jansou_server::{
    infrastructure::{
        message_pusher::WebSocketMessagePusher,
        repository::{
            InMemoryConnectionRepository, InMemoryGameRepository, InMemoryGameStateRepository,
        },
    },
    ui::{Server, state::AppState},
    usecase::{
        ConnectSessionUseCase, CreateGameUseCase, DeclareWinUseCase, DisconnectSessionUseCase,
        DrawTileUseCase, GameBroadcaster, GetConnectionsUseCase, GetGamesUseCase, JoinGameUseCase,
        LeaveGameUseCase, MarkGameLoadedUseCase, PlayTileUseCase, ResyncGameUseCase,
        SelfPlayTileUseCase, SendMessageUseCase, SetUsernameUseCase, StartGameUseCase,
        SubmitInteractionUseCase,
    },
};

pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// Wire a full server the way the binary does and run it in the background.
///
/// `deal_delay` replaces the production wait between NEW_ROUND and the next
/// deal so round restarts can be observed without sleeping in tests.
pub async fn spawn_server(port: u16, deal_delay: Duration) {
    let connection_repository = Arc::new(InMemoryConnectionRepository::new());
    let game_repository = Arc::new(InMemoryGameRepository::new());
    let game_state_repository = Arc::new(InMemoryGameStateRepository::new());
    let message_pusher = Arc::new(WebSocketMessagePusher::new());
    let broadcaster = Arc::new(GameBroadcaster::with_deal_delay(
        message_pusher.clone(),
        game_state_repository.clone(),
        deal_delay,
    ));

    let app_state = AppState {
        connect_session_usecase: Arc::new(ConnectSessionUseCase::new(
            connection_repository.clone(),
            message_pusher.clone(),
        )),
        disconnect_session_usecase: Arc::new(DisconnectSessionUseCase::new(
            connection_repository.clone(),
            message_pusher.clone(),
        )),
        set_username_usecase: Arc::new(SetUsernameUseCase::new(connection_repository.clone())),
        get_connections_usecase: Arc::new(GetConnectionsUseCase::new(
            connection_repository.clone(),
        )),
        create_game_usecase: Arc::new(CreateGameUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
        )),
        get_games_usecase: Arc::new(GetGamesUseCase::new(game_repository.clone())),
        join_game_usecase: Arc::new(JoinGameUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
            broadcaster.clone(),
        )),
        leave_game_usecase: Arc::new(LeaveGameUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        start_game_usecase: Arc::new(StartGameUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
            broadcaster.clone(),
        )),
        mark_game_loaded_usecase: Arc::new(MarkGameLoadedUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        send_message_usecase: Arc::new(SendMessageUseCase::new(
            connection_repository.clone(),
            game_repository.clone(),
            broadcaster.clone(),
        )),
        draw_tile_usecase: Arc::new(DrawTileUseCase::new(
            connection_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        play_tile_usecase: Arc::new(PlayTileUseCase::new(
            connection_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        submit_interaction_usecase: Arc::new(SubmitInteractionUseCase::new(
            connection_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        declare_win_usecase: Arc::new(DeclareWinUseCase::new(
            connection_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        self_play_tile_usecase: Arc::new(SelfPlayTileUseCase::new(
            connection_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        resync_game_usecase: Arc::new(ResyncGameUseCase::new(
            connection_repository.clone(),
            game_state_repository.clone(),
            broadcaster.clone(),
        )),
        message_pusher,
    };

    let server = Server::new(app_state);
    tokio::spawn(async move {
        let _ = server.run("127.0.0.1".to_string(), port).await;
    });

    // Give the listener time to bind
    tokio::time::sleep(Duration::from_millis(200)).await;
}

/// One WebSocket session against a test server.
pub struct WsClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
    pub connection_id: String,
}

impl WsClient {
    /// Connect and consume the CONNECTED handshake.
    pub async fn connect(port: u16) -> Self {
        let url = format!("ws://127.0.0.1:{}/ws", port);
        let (stream, _) = connect_async(&url).await.expect("failed to connect");
        let mut client = Self {
            stream,
            connection_id: String::new(),
        };
        let connected = client.recv_json().await;
        assert_eq!(connected["action"], "CONNECTED");
        client.connection_id = connected["payload"]["connectionId"]
            .as_str()
            .expect("CONNECTED should carry a connection id")
            .to_string();
        client
    }

    /// Send one request envelope.
    pub async fn send(&mut self, action: &str, payload: Value) {
        let frame = serde_json::json!({ "action": action, "payload": payload });
        self.stream
            .send(Message::Text(frame.to_string().into()))
            .await
            .expect("failed to send frame");
    }

    /// Receive the next JSON frame, failing the test on timeout.
    pub async fn recv_json(&mut self) -> Value {
        loop {
            let msg = timeout(RECV_TIMEOUT, self.stream.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("stream closed")
                .expect("websocket error");
            match msg {
                Message::Text(text) => {
                    return serde_json::from_str(&text).expect("frame should be JSON");
                }
                Message::Ping(_) | Message::Pong(_) => continue,
                other => panic!("unexpected frame: {:?}", other),
            }
        }
    }

    /// Skip frames until one with the given action arrives.
    pub async fn recv_action(&mut self, action: &str) -> Value {
        loop {
            let frame = self.recv_json().await;
            if frame["action"] == action {
                return frame;
            }
        }
    }

    /// Close the socket politely.
    pub async fn close(mut self) {
        let _ = self.stream.send(Message::Close(None)).await;
    }
}
