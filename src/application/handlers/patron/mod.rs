//! Patron handlers.
//!
//! Command and query handlers for the patron registry:
//!
//! ## Commands
//! - Registering a patron
//! - Updating a patron's fields or term
//! - Renewing an expired patron
//! - Removing a patron
//!
//! ## Queries
//! - Get a patron by id
//! - List patrons with filters and pagination

mod create_patron;
mod delete_patron;
mod dto;
mod get_patron;
mod list_patrons;
mod renew_patron;
mod update_patron;

#[cfg(test)]
pub(crate) mod test_support;

use crate::domain::foundation::PatronId;
use crate::domain::patron::PatronError;

// Commands
pub use create_patron::{CreatePatronCommand, CreatePatronHandler};
pub use delete_patron::{DeletePatronCommand, DeletePatronHandler};
pub use renew_patron::{RenewPatronCommand, RenewPatronHandler};
pub use update_patron::{UpdatePatronCommand, UpdatePatronHandler};

// Queries
pub use get_patron::{GetPatronHandler, GetPatronQuery};
pub use list_patrons::{ListPatronsHandler, ListPatronsQuery, MAX_PAGE_SIZE};

// Read models
pub use dto::{PatronDto, PatronListDto};

fn parse_id(raw: &str) -> Result<PatronId, PatronError> {
    if raw.trim().is_empty() {
        return Err(PatronError::validation("id", "Patron id is required"));
    }
    Ok(PatronId::new(raw)?)
}
