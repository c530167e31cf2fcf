//! HTTP adapters - REST API implementations.

pub mod patron;
pub mod router;

pub use patron::{patron_routes, PatronAppState};
pub use router::build_router;
