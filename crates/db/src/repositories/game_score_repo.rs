//! Repository for the `game_scores` table.

use sqlx::PgPool;

use crate::models::game_score::{CreateGameScore, GameScore};

const COLUMNS: &str = "id, player_name, score, mode, created_at";

pub struct GameScoreRepo;

impl GameScoreRepo {
    pub async fn create(pool: &PgPool, input: &CreateGameScore) -> Result<GameScore, sqlx::Error> {
        let query = format!(
            "INSERT INTO game_scores (player_name, score, mode)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GameScore>(&query)
            .bind(&input.player_name)
            .bind(input.score)
            .bind(&input.mode)
            .fetch_one(pool)
            .await
    }

    /// Top scores for a mode. Ties rank by earliest submission.
    pub async fn leaderboard(
        pool: &PgPool,
        mode: &str,
        limit: i64,
    ) -> Result<Vec<GameScore>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM game_scores
             WHERE mode = $1
             ORDER BY score DESC, created_at ASC
             LIMIT $2"
        );
        sqlx::query_as::<_, GameScore>(&query)
            .bind(mode)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
