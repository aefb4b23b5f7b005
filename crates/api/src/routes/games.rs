//! Route definitions for the waiting-room game leaderboard.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::games;
use crate::state::AppState;

/// Public game routes mounted at `/games`.
///
/// ```text
/// POST /scores       -> submit_score (anonymous)
/// GET  /leaderboard  -> leaderboard (top scores per mode)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/scores", post(games::submit_score))
        .route("/leaderboard", get(games::leaderboard))
}
