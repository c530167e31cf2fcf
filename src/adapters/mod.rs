//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `http` - REST API (axum)
//! - `memory` - In-memory patron storage
//! - `postgres` - PostgreSQL patron storage

pub mod http;
pub mod memory;
pub mod postgres;

pub use http::{build_router, PatronAppState};
pub use memory::InMemoryPatronRepository;
pub use postgres::{run_migrations, PostgresPatronRepository};
