//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresPatronRepository` - Patron persistence backed by a `PgPool`
//! - `run_migrations` - Applies the schema in `migrations/`

mod patron_repository;

pub use patron_repository::{run_migrations, PostgresPatronRepository};
