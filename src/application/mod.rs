//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write, query handlers read; all of them depend on ports
//! only, never on adapters.

pub mod handlers;

pub use handlers::patron;
