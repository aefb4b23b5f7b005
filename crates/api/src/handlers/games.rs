//! Handlers for the waiting-room leaderboard game.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use kiss_core::error::CoreError;
use kiss_db::models::game_score::{CreateGameScore, GameScore};
use kiss_db::repositories::GameScoreRepo;
use kiss_events::PortalEvent;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Longest accepted player name. Anything longer is a kiosk input bug.
const MAX_PLAYER_NAME_LEN: usize = 32;

const DEFAULT_MODE: &str = "default";
const DEFAULT_LEADERBOARD_SIZE: i64 = 10;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for the public `POST /games/scores`.
#[derive(Debug, Deserialize)]
pub struct SubmitScoreRequest {
    pub player_name: String,
    pub score: i64,
    pub mode: Option<String>,
}

/// Query parameters for `GET /games/leaderboard`.
#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub mode: Option<String>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/games/scores
///
/// Public score submission from the kiosk. Publishes `game.score_submitted`.
pub async fn submit_score(
    State(state): State<AppState>,
    Json(input): Json<SubmitScoreRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<GameScore>>)> {
    let player_name = input.player_name.trim();
    if player_name.is_empty() || player_name.len() > MAX_PLAYER_NAME_LEN {
        return Err(AppError::Core(CoreError::Validation(format!(
            "player_name must be 1..={MAX_PLAYER_NAME_LEN} characters"
        ))));
    }
    if input.score < 0 {
        return Err(AppError::Core(CoreError::Validation(
            "score must not be negative".into(),
        )));
    }

    let score = GameScoreRepo::create(
        &state.pool,
        &CreateGameScore {
            player_name: player_name.to_string(),
            score: input.score,
            mode: input.mode.unwrap_or_else(|| DEFAULT_MODE.to_string()),
        },
    )
    .await?;

    state.event_bus.publish(
        PortalEvent::new("game.score_submitted")
            .with_source("game_score", score.id)
            .with_payload(serde_json::json!({
                "mode": score.mode,
                "score": score.score,
            })),
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: score })))
}

/// GET /api/v1/games/leaderboard
///
/// Top scores for a mode, ordered score descending with earlier
/// submissions winning ties.
pub async fn leaderboard(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> AppResult<Json<DataResponse<Vec<GameScore>>>> {
    let mode = params.mode.as_deref().unwrap_or(DEFAULT_MODE);
    let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD_SIZE).clamp(1, 100);

    let scores = GameScoreRepo::leaderboard(&state.pool, mode, limit).await?;
    Ok(Json(DataResponse { data: scores }))
}
