use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::models::user::{User, UserProfile};

pub struct UserRepository;

impl UserRepository {
    /// Inserts the user, or overwrites the profile if the id already exists.
    ///
    /// `created_at` is kept from the first insert.
    pub async fn create(
        pool: &SqlitePool,
        id: &str,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
INSERT INTO users (id, email, first_name, last_name, image_url, created_at, updated_at)
VALUES (?, ?, ?, ?, ?, ?, ?)
ON CONFLICT (id) DO UPDATE SET
    email = excluded.email,
    first_name = excluded.first_name,
    last_name = excluded.last_name,
    image_url = excluded.image_url,
    updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.image_url)
        .bind(now)
        .bind(now)
        .execute(pool)
        .await?;

        Ok(())
    }

    /// Returns the number of rows updated; zero when the user is unknown.
    pub async fn update(
        pool: &SqlitePool,
        id: &str,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            r#"
UPDATE users
SET email = ?, first_name = ?, last_name = ?, image_url = ?, updated_at = ?
WHERE id = ?
            "#,
        )
        .bind(&profile.email)
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(&profile.image_url)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Returns the number of rows deleted; zero when the user is unknown.
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn get(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
