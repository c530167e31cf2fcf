//! HTTP request/response DTOs for patron endpoints.
//!
//! Field names follow the public API's camelCase convention. Dates arrive
//! as ISO-8601 strings and are converted to [`Timestamp`] here, before any
//! command is built.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::application::handlers::patron::{
    CreatePatronCommand, ListPatronsQuery, RenewPatronCommand, UpdatePatronCommand,
};
use crate::domain::foundation::Timestamp;
use crate::domain::patron::PatronError;
use crate::domain::person::Role;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to register a patron.
///
/// Missing strings are treated as empty so they fail domain validation with
/// a field-specific message instead of a generic deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePatronRequest {
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub role: Option<String>,
    pub charge: String,
    pub renovation_date: Option<String>,
    pub ending_date: Option<String>,
}

impl CreatePatronRequest {
    pub fn into_command(self) -> Result<CreatePatronCommand, PatronError> {
        Ok(CreatePatronCommand {
            email: self.email,
            given_name: self.given_name,
            family_name: self.family_name,
            role: self
                .role
                .unwrap_or_else(|| Role::default().as_str().to_string()),
            charge: self.charge,
            renovation_date: required_date("renovationDate", self.renovation_date)?,
            ending_date: required_date("endingDate", self.ending_date)?,
        })
    }
}

/// Request to update a patron. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdatePatronRequest {
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub role: Option<String>,
    pub charge: Option<String>,
    pub renovation_date: Option<String>,
    pub ending_date: Option<String>,
}

impl UpdatePatronRequest {
    pub fn into_command(self, id: String) -> Result<UpdatePatronCommand, PatronError> {
        Ok(UpdatePatronCommand {
            id,
            email: self.email,
            given_name: self.given_name,
            family_name: self.family_name,
            role: self.role,
            charge: self.charge,
            renovation_date: optional_date("renovationDate", self.renovation_date)?,
            ending_date: optional_date("endingDate", self.ending_date)?,
        })
    }
}

/// Request to renew a patron for a new term.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenewPatronRequest {
    pub ending_date: Option<String>,
}

impl RenewPatronRequest {
    pub fn into_command(self, id: String) -> Result<RenewPatronCommand, PatronError> {
        Ok(RenewPatronCommand {
            id,
            ending_date: required_date("endingDate", self.ending_date)?,
        })
    }
}

/// Query string for `GET /patrons`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListPatronsParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub role: Option<String>,
    pub search: Option<String>,
    #[serde(alias = "isActive")]
    pub active: Option<bool>,
}

impl From<ListPatronsParams> for ListPatronsQuery {
    fn from(params: ListPatronsParams) -> Self {
        ListPatronsQuery {
            page: params.page,
            limit: params.limit,
            role: params.role,
            search: params.search,
            active: params.active,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Success envelope shared by every patron endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Additional details (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Date parsing
// ════════════════════════════════════════════════════════════════════════════════

/// Accepts RFC 3339 (`2024-01-15T10:30:00Z`) or a bare date (`2024-01-15`,
/// read as midnight UTC).
pub fn parse_iso_date(field: &str, raw: &str) -> Result<Timestamp, PatronError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Timestamp::from_datetime(dt.with_timezone(&Utc)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(Timestamp::from_date(date));
    }
    Err(PatronError::validation(
        field,
        format!("{} must be an ISO-8601 date, got '{}'", field, raw),
    ))
}

fn required_date(field: &str, raw: Option<String>) -> Result<Timestamp, PatronError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_iso_date(field, &raw),
        _ => Err(PatronError::validation(field, format!("{} is required", field))),
    }
}

fn optional_date(field: &str, raw: Option<String>) -> Result<Option<Timestamp>, PatronError> {
    raw.map(|raw| parse_iso_date(field, &raw)).transpose()
}
