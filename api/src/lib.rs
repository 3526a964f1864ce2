//! Backend glue for the flashcards app: a Clerk user-sync webhook and the
//! decks/cards schema it lives next to.

use std::sync::Arc;

use sqlx::SqlitePool;

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod rest;
pub mod svix;

pub use config::Config;
pub use error::AppError;
pub use rest::router;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub webhook: Arc<svix::Webhook>,
}

impl AppState {
    pub fn new(db: SqlitePool, webhook: svix::Webhook) -> Self {
        Self {
            db,
            webhook: Arc::new(webhook),
        }
    }
}
