//! Foundation Patrons - Patron and board-member registry API
//!
//! Manages the people who sit on a foundation's board: who they are,
//! what charge they hold, and the term during which they hold it.
//!
//! Layers:
//! - `domain` - Value objects and the `Patron` aggregate
//! - `ports` - Repository trait implemented by storage adapters
//! - `application` - Use-case handlers (create, list, update, renew, ...)
//! - `adapters` - HTTP API plus in-memory and PostgreSQL storage
//! - `config` - Environment-driven configuration

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
