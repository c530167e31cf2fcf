//! HTTP adapter for patron endpoints.
//!
//! Exposes the patron registry via REST API, mounted under the configured
//! prefix (default `/api/v1`):
//! - `GET /patrons` - List patrons
//! - `POST /patrons` - Register a patron
//! - `GET /patrons/:id` - Get a patron
//! - `PUT /patrons/:id` - Update a patron
//! - `DELETE /patrons/:id` - Remove a patron
//! - `POST /patrons/:id/renew` - Renew an expired patron

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{healthz, PatronApiError, PatronAppState};
pub use routes::patron_routes;
