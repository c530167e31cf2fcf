//! HTTP handlers for patron endpoints.
//!
//! These handlers connect Axum routes to application layer command/query handlers.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::application::handlers::patron::{
    CreatePatronHandler, DeletePatronCommand, DeletePatronHandler, GetPatronHandler,
    GetPatronQuery, ListPatronsHandler, ListPatronsQuery, RenewPatronHandler,
    UpdatePatronHandler,
};
use crate::domain::foundation::ErrorCode;
use crate::domain::patron::PatronError;
use crate::ports::PatronRepository;

use super::dto::{
    ApiResponse, CreatePatronRequest, ErrorResponse, ListPatronsParams, RenewPatronRequest,
    UpdatePatronRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; the repository is shared behind an `Arc`.
#[derive(Clone)]
pub struct PatronAppState {
    pub repository: Arc<dyn PatronRepository>,
}

impl PatronAppState {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    pub fn create_patron_handler(&self) -> CreatePatronHandler {
        CreatePatronHandler::new(self.repository.clone())
    }

    pub fn get_patron_handler(&self) -> GetPatronHandler {
        GetPatronHandler::new(self.repository.clone())
    }

    pub fn list_patrons_handler(&self) -> ListPatronsHandler {
        ListPatronsHandler::new(self.repository.clone())
    }

    pub fn update_patron_handler(&self) -> UpdatePatronHandler {
        UpdatePatronHandler::new(self.repository.clone())
    }

    pub fn delete_patron_handler(&self) -> DeletePatronHandler {
        DeletePatronHandler::new(self.repository.clone())
    }

    pub fn renew_patron_handler(&self) -> RenewPatronHandler {
        RenewPatronHandler::new(self.repository.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /patrons - List patrons with filters and pagination
pub async fn list_patrons(
    State(state): State<PatronAppState>,
    params: Result<Query<ListPatronsParams>, QueryRejection>,
) -> Result<impl IntoResponse, PatronApiError> {
    let Query(params) = params?;
    let query = ListPatronsQuery::from(params);

    let result = state.list_patrons_handler().handle(query).await?;

    Ok(Json(ApiResponse::data(result)))
}

/// GET /patrons/:id - Get a single patron
pub async fn get_patron(
    State(state): State<PatronAppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, PatronApiError> {
    let Path(id) = id?;

    let result = state.get_patron_handler().handle(GetPatronQuery { id }).await?;

    Ok(Json(ApiResponse::data(result)))
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST/PUT/DELETE endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /patrons - Register a patron
pub async fn create_patron(
    State(state): State<PatronAppState>,
    body: Result<Json<CreatePatronRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PatronApiError> {
    let Json(request) = body?;
    let cmd = request.into_command()?;

    let result = state.create_patron_handler().handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::data(result).with_message("Patron created successfully")),
    ))
}

/// PUT /patrons/:id - Update a patron
pub async fn update_patron(
    State(state): State<PatronAppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<UpdatePatronRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PatronApiError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let cmd = request.into_command(id)?;

    let result = state.update_patron_handler().handle(cmd).await?;

    Ok(Json(
        ApiResponse::data(result).with_message("Patron updated successfully"),
    ))
}

/// DELETE /patrons/:id - Remove a patron
pub async fn delete_patron(
    State(state): State<PatronAppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, PatronApiError> {
    let Path(id) = id?;

    state
        .delete_patron_handler()
        .handle(DeletePatronCommand { id })
        .await?;

    Ok(Json(ApiResponse::message("Patron deleted successfully")))
}

/// POST /patrons/:id/renew - Start a new term for an expired patron
pub async fn renew_patron(
    State(state): State<PatronAppState>,
    id: Result<Path<String>, PathRejection>,
    body: Result<Json<RenewPatronRequest>, JsonRejection>,
) -> Result<impl IntoResponse, PatronApiError> {
    let Path(id) = id?;
    let Json(request) = body?;
    let cmd = request.into_command(id)?;

    let result = state.renew_patron_handler().handle(cmd).await?;

    Ok(Json(
        ApiResponse::data(result).with_message("Patron renewed successfully"),
    ))
}

/// GET /healthz - Liveness probe
pub async fn healthz() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error wrapper that converts patron errors into HTTP responses.
#[derive(Debug)]
pub struct PatronApiError(PatronError);

impl From<PatronError> for PatronApiError {
    fn from(err: PatronError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for PatronApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(PatronError::Validation {
            field: None,
            message: format!("Invalid request body: {}", rejection.body_text()),
        })
    }
}

impl From<QueryRejection> for PatronApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(PatronError::Validation {
            field: None,
            message: format!("Invalid query string: {}", rejection.body_text()),
        })
    }
}

impl From<PathRejection> for PatronApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(PatronError::validation("id", rejection.body_text()))
    }
}

impl IntoResponse for PatronApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.0.code() {
            ErrorCode::ValidationFailed => StatusCode::BAD_REQUEST,
            ErrorCode::PatronNotFound => StatusCode::NOT_FOUND,
            ErrorCode::PatronExists => StatusCode::CONFLICT,
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if self.0.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        let mut body = ErrorResponse::new(self.0.code().to_string(), self.0.to_string());
        if let PatronError::Validation {
            field: Some(field), ..
        } = &self.0
        {
            body = body.with_details(serde_json::json!({ "field": field }));
        }

        (status, Json(body)).into_response()
    }
}
