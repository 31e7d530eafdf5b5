use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::{error::ApiError, middleware::auth::AuthenticatedUser, state::AppState};
use shared::models::game::{ColorPreference, Game, GameMode};
use shared::services::game_service::ClockSnapshot;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/games", post(create_game))
        .route("/games/join-by-code", post(join_by_room_code))
        .route("/games/{game_id}", get(get_game))
        .route("/games/{game_id}/join", post(join_game))
        .route("/games/{game_id}/moves", post(submit_move))
        .route("/games/{game_id}/leave", post(leave_game))
}

#[derive(Debug, Deserialize)]
pub struct CreateGameRequest {
    pub color_preference: ColorPreference,
    pub mode: GameMode,
    pub base_time_seconds: Option<i64>,
    pub increment_seconds: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct JoinByCodeRequest {
    pub room_code: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitMoveRequest {
    pub new_fen: String,
    pub move_played: String,
}

#[derive(Debug, Serialize)]
pub struct GameStateResponse {
    pub game: Game,
    pub clock: ClockSnapshot,
}

async fn create_game(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<CreateGameRequest>,
) -> Result<Json<Game>, ApiError> {
    let game = state
        .game_service
        .create_game(
            &authenticated_user.user_id,
            payload.color_preference,
            payload.mode,
            payload.base_time_seconds,
            payload.increment_seconds,
        )
        .await?;
    Ok(Json(game))
}

async fn join_game(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(game_id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let game = state
        .game_service
        .join_game(&game_id, &authenticated_user.user_id)
        .await?;
    Ok(Json(game))
}

async fn join_by_room_code(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Json(payload): Json<JoinByCodeRequest>,
) -> Result<Json<Game>, ApiError> {
    let game = state
        .game_service
        .join_by_room_code(&payload.room_code, &authenticated_user.user_id)
        .await?;
    Ok(Json(game))
}

async fn submit_move(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(game_id): Path<String>,
    Json(payload): Json<SubmitMoveRequest>,
) -> Result<Json<Game>, ApiError> {
    let game = state
        .game_service
        .submit_move(
            &game_id,
            &authenticated_user.user_id,
            &payload.new_fen,
            &payload.move_played,
        )
        .await?;
    Ok(Json(game))
}

async fn leave_game(
    State(state): State<AppState>,
    authenticated_user: AuthenticatedUser,
    Path(game_id): Path<String>,
) -> Result<Json<Game>, ApiError> {
    let game = state
        .game_service
        .leave_game(&game_id, &authenticated_user.user_id)
        .await?;
    Ok(Json(game))
}

async fn get_game(
    State(state): State<AppState>,
    _authenticated_user: AuthenticatedUser,
    Path(game_id): Path<String>,
) -> Result<Json<GameStateResponse>, ApiError> {
    let game = state.game_service.get_game(&game_id).await?;
    let clock = state.game_service.clock_snapshot(&game)?;
    Ok(Json(GameStateResponse { game, clock }))
}
