//! In-memory adapters for tests and database-less development runs.

mod patron_repository;

pub use patron_repository::InMemoryPatronRepository;
