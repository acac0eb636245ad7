//! Four-player mahjong WebSocket server.
//!
//! Hosts the lobby (usernames, game creation, joining) and the in-game
//! coordinator (draws, discards, claim windows, wins) over a single
//! WebSocket endpoint.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin jansou-server
//! cargo run --bin jansou-server -- --host 0.0.0.0 --port 3000
//! ```

use std::sync::Arc;

use clap::Parser;

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
use jansou_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "server")]
#[command(about = "Four-player mahjong WebSocket server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repositories
    // 2. MessagePusher
    // 3. GameBroadcaster
    // 4. UseCases
    // 5. AppState
    // 6. Server

    // 1. Create Repositories (in-memory database)
    let connection_repository = Arc::new(InMemoryConnectionRepository::new());
    let game_repository = Arc::new(InMemoryGameRepository::new());
    let game_state_repository = Arc::new(InMemoryGameStateRepository::new());

    // 2. Create MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. Create GameBroadcaster (game-wide fan-out on top of the pusher)
    let broadcaster = Arc::new(GameBroadcaster::new(
        message_pusher.clone(),
        game_state_repository.clone(),
    ));

    // 4. Create UseCases
    let connect_session_usecase = Arc::new(ConnectSessionUseCase::new(
        connection_repository.clone(),
        message_pusher.clone(),
    ));
    let disconnect_session_usecase = Arc::new(DisconnectSessionUseCase::new(
        connection_repository.clone(),
        message_pusher.clone(),
    ));
    let set_username_usecase = Arc::new(SetUsernameUseCase::new(connection_repository.clone()));
    let get_connections_usecase =
        Arc::new(GetConnectionsUseCase::new(connection_repository.clone()));
    let create_game_usecase = Arc::new(CreateGameUseCase::new(
        connection_repository.clone(),
        game_repository.clone(),
    ));
    let get_games_usecase = Arc::new(GetGamesUseCase::new(game_repository.clone()));
    let join_game_usecase = Arc::new(JoinGameUseCase::new(
        connection_repository.clone(),
        game_repository.clone(),
        broadcaster.clone(),
    ));
    let leave_game_usecase = Arc::new(LeaveGameUseCase::new(
        connection_repository.clone(),
        game_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));
    let start_game_usecase = Arc::new(StartGameUseCase::new(
        connection_repository.clone(),
        game_repository.clone(),
        broadcaster.clone(),
    ));
    let mark_game_loaded_usecase = Arc::new(MarkGameLoadedUseCase::new(
        connection_repository.clone(),
        game_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));
    let send_message_usecase = Arc::new(SendMessageUseCase::new(
        connection_repository.clone(),
        game_repository.clone(),
        broadcaster.clone(),
    ));
    let draw_tile_usecase = Arc::new(DrawTileUseCase::new(
        connection_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));
    let play_tile_usecase = Arc::new(PlayTileUseCase::new(
        connection_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));
    let submit_interaction_usecase = Arc::new(SubmitInteractionUseCase::new(
        connection_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));
    let declare_win_usecase = Arc::new(DeclareWinUseCase::new(
        connection_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));
    let self_play_tile_usecase = Arc::new(SelfPlayTileUseCase::new(
        connection_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));
    let resync_game_usecase = Arc::new(ResyncGameUseCase::new(
        connection_repository.clone(),
        game_state_repository.clone(),
        broadcaster.clone(),
    ));

    // 5. Assemble AppState
    let app_state = AppState {
        connect_session_usecase,
        disconnect_session_usecase,
        set_username_usecase,
        get_connections_usecase,
        create_game_usecase,
        get_games_usecase,
        join_game_usecase,
        leave_game_usecase,
        start_game_usecase,
        mark_game_loaded_usecase,
        send_message_usecase,
        draw_tile_usecase,
        play_tile_usecase,
        submit_interaction_usecase,
        declare_win_usecase,
        self_play_tile_usecase,
        resync_game_usecase,
        message_pusher,
    };

    // 6. Create and run the server
    let server = Server::new(app_state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
