//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PatronRepository` - Patron persistence (PostgreSQL, in-memory)

mod patron_repository;

pub use patron_repository::{PatronFilter, PatronPage, PatronRepository, DEFAULT_PAGE_SIZE};
