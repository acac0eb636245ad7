//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    infrastructure::dto::http::{GameDetailDto, GameSummaryDto},
    ui::state::AppState,
};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Get list of games
pub async fn get_games(State(state): State<Arc<AppState>>) -> Json<Vec<GameSummaryDto>> {
    let games = state.get_games_usecase.execute().await;

    // Domain Model から DTO への変換
    let summaries: Vec<GameSummaryDto> = games.into_iter().map(GameSummaryDto::from).collect();

    Json(summaries)
}

/// Get game detail by ID
pub async fn get_game_detail(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<GameDetailDto>, StatusCode> {
    let game = state
        .get_games_usecase
        .execute()
        .await
        .into_iter()
        .find(|game| game.id.as_str() == game_id);

    match game {
        // Domain Model から DTO への変換
        Some(game) => Ok(Json(GameDetailDto::from(game))),
        None => Err(StatusCode::NOT_FOUND),
    }
}
