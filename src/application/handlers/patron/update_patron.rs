//! UpdatePatronHandler - Command handler for partial patron updates.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::patron::PatronError;
use crate::domain::person::Email;
use crate::ports::PatronRepository;

use super::{parse_id, PatronDto};

/// Command to update a patron. Absent fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UpdatePatronCommand {
    pub id: String,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub role: Option<String>,
    pub charge: Option<String>,
    pub renovation_date: Option<Timestamp>,
    pub ending_date: Option<Timestamp>,
}

/// Handler for updating patrons.
pub struct UpdatePatronHandler {
    repository: Arc<dyn PatronRepository>,
}

impl UpdatePatronHandler {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdatePatronCommand) -> Result<PatronDto, PatronError> {
        // 1. Require a well-formed id
        let id = parse_id(&cmd.id)?;

        // 2. Load current state
        let mut patron = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| PatronError::not_found(id.as_str()))?;

        // 3. Email changes must stay unique
        if let Some(raw) = cmd.email.as_deref() {
            let email = Email::new(raw)?;
            if &email != patron.email() {
                if let Some(other) = self.repository.find_by_email(&email).await? {
                    if other.id() != Some(&id) {
                        return Err(PatronError::conflict(email.as_str()));
                    }
                }
            }
            patron.set_email(email.as_str())?;
        }

        // 4. Apply remaining fields through the aggregate's guards
        if let Some(given_name) = cmd.given_name.as_deref() {
            patron.set_given_name(given_name)?;
        }
        if let Some(family_name) = cmd.family_name.as_deref() {
            patron.set_family_name(family_name)?;
        }
        if let Some(role) = cmd.role.as_deref() {
            patron.set_role(role)?;
        }
        if let Some(charge) = cmd.charge.as_deref() {
            patron.set_charge(charge)?;
        }
        match (cmd.renovation_date, cmd.ending_date) {
            (Some(start), Some(end)) => patron.set_term(start, end)?,
            (Some(start), None) => patron.set_renovation_date(start)?,
            (None, Some(end)) => patron.set_ending_date(end)?,
            (None, None) => {}
        }

        // 5. Persist; the row may have been deleted since step 2
        let updated = self
            .repository
            .update(&id, &patron)
            .await
            .map_err(|err| {
                if err.code == ErrorCode::PatronExists {
                    PatronError::conflict(patron.email().as_str())
                } else {
                    PatronError::from(err)
                }
            })?
            .ok_or_else(|| PatronError::not_found(id.as_str()))?;

        tracing::info!(patron_id = %id, "Patron updated");

        Ok(PatronDto::from(&updated))
    }
}
