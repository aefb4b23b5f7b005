//! Leaderboard game score rows.

use kiss_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// Row from the `game_scores` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GameScore {
    pub id: DbId,
    pub player_name: String,
    pub score: i64,
    pub mode: String,
    pub created_at: Timestamp,
}

/// DTO for submitting a score.
#[derive(Debug)]
pub struct CreateGameScore {
    pub player_name: String,
    pub score: i64,
    pub mode: String,
}
