//! Axum router configuration for patron endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_patron, delete_patron, get_patron, list_patrons, renew_patron, update_patron,
    PatronAppState,
};

/// Create the patron API router.
///
/// # Routes
///
/// - `GET /patrons` - List patrons (`page`, `limit`, `role`, `search`, `active`)
/// - `POST /patrons` - Register a patron
/// - `GET /patrons/:id` - Get a patron
/// - `PUT /patrons/:id` - Update a patron
/// - `DELETE /patrons/:id` - Remove a patron
/// - `POST /patrons/:id/renew` - Renew an expired patron
pub fn patron_routes() -> Router<PatronAppState> {
    Router::new()
        .route("/patrons", get(list_patrons).post(create_patron))
        .route(
            "/patrons/:id",
            get(get_patron).put(update_patron).delete(delete_patron),
        )
        .route("/patrons/:id/renew", post(renew_patron))
}
