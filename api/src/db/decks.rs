use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::deck::{CreateDeck, Deck};

pub struct DeckRepository;

impl DeckRepository {
    pub async fn create(
        pool: &SqlitePool,
        user_id: &str,
        deck: &CreateDeck,
        now: DateTime<Utc>,
    ) -> Result<Deck, sqlx::Error> {
        sqlx::query_as::<_, Deck>(
            r#"
INSERT INTO decks (user_id, name, description, created_at, updated_at)
VALUES (?, ?, ?, ?, ?)
RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(&deck.name)
        .bind(&deck.description)
        .bind(now)
        .bind(now)
        .fetch_one(pool)
        .await
    }

    pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Deck>, sqlx::Error> {
        sqlx::query_as::<_, Deck>("SELECT * FROM decks WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Deck>, sqlx::Error> {
        sqlx::query_as::<_, Deck>("SELECT * FROM decks WHERE user_id = ? ORDER BY created_at, id")
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Deletes the deck and, through the foreign key, all of its cards.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM decks WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }
}
