//! Environment-driven configuration.

use std::{env, net::SocketAddr, str::FromStr};

use thiserror::Error;
use tracing::info;

pub const CLERK_WEBHOOK_SECRET: &str = "CLERK_WEBHOOK_SECRET";
pub const DATABASE_URL: &str = "DATABASE_URL";
pub const DATABASE_MAX_CONNECTIONS: &str = "DATABASE_MAX_CONNECTIONS";
pub const BIND_ADDR: &str = "BIND_ADDR";

const DEFAULT_DATABASE_URL: &str = "sqlite://flashcards.db";
const DEFAULT_MAX_CONNECTIONS: &str = "5";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set; add it from the Clerk dashboard to .env or the process environment")]
    Missing(&'static str),
    #[error("invalid {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub bind_addr: SocketAddr,
    pub clerk_webhook_secret: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("bind_addr", &self.bind_addr)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let clerk_webhook_secret = lookup(CLERK_WEBHOOK_SECRET)
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing(CLERK_WEBHOOK_SECRET))?;

        Ok(Self {
            database_url: or_default(&lookup, DATABASE_URL, DEFAULT_DATABASE_URL),
            database_max_connections: parse(
                &lookup,
                DATABASE_MAX_CONNECTIONS,
                DEFAULT_MAX_CONNECTIONS,
            )?,
            bind_addr: parse(&lookup, BIND_ADDR, DEFAULT_BIND_ADDR)?,
            clerk_webhook_secret,
        })
    }
}

fn or_default<F>(lookup: &F, key: &str, default: &str) -> String
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    })
}

fn parse<F, T>(lookup: &F, key: &'static str, default: &str) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    or_default(lookup, key, default)
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::Invalid {
            key,
            reason: e.to_string(),
        })
}
