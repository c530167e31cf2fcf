//! Patron storage configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Upper bound on pooled PostgreSQL connections.
pub const MAX_POOL_SIZE: u32 = 100;

/// Where patrons are kept, and how the PostgreSQL pool is sized when they
/// are not kept in memory.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL (`postgres://` or `postgresql://`)
    pub url: String,

    /// Keep patrons in process memory instead of PostgreSQL
    pub in_memory: bool,

    /// Apply `migrations/` before serving
    pub run_migrations: bool,

    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// In-memory storage needs no connection settings, so nothing is
    /// checked in that mode.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.in_memory {
            return Ok(());
        }

        match self.url.split_once("://") {
            None if self.url.is_empty() => {
                return Err(ValidationError::MissingRequired("DATABASE_URL"))
            }
            Some(("postgres" | "postgresql", _)) => {}
            _ => return Err(ValidationError::InvalidDatabaseUrl),
        }

        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > MAX_POOL_SIZE {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "postgresql://localhost:5432/fundacio_molins".to_string(),
            in_memory: false,
            run_migrations: false,
            min_connections: 1,
            max_connections: 10,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}
