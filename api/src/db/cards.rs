use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::card::{Card, CreateCard};

pub struct CardRepository;

impl CardRepository {
    /// Fails with a foreign key violation if `deck_id` does not exist.
    pub async fn create(
        pool: &SqlitePool,
        deck_id: i64,
        card: &CreateCard,
        now: DateTime<Utc>,
    ) -> Result<Card, sqlx::Error> {
        sqlx::query_as::<_, Card>(
            r#"
INSERT INTO cards (deck_id, front, back, created_at, updated_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(deck_id)
        .bind(&card.front)
        .bind(&card.back)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn list_for_deck(pool: &SqlitePool, deck_id: i64) -> Result<Vec<Card>, sqlx::Error> {
        sqlx::query_as::<_, Card>("SELECT * FROM cards WHERE deck_id = ? ORDER BY id")
            .bind(deck_id)
            .fetch_all(pool)
            .await
    }
}
