//! DeletePatronHandler - Command handler for removing patrons.

use std::sync::Arc;

use crate::domain::patron::PatronError;
use crate::ports::PatronRepository;

use super::parse_id;

/// Command to remove a patron.
#[derive(Debug, Clone)]
pub struct DeletePatronCommand {
    pub id: String,
}

/// Handler for removing patrons.
pub struct DeletePatronHandler {
    repository: Arc<dyn PatronRepository>,
}

impl DeletePatronHandler {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: DeletePatronCommand) -> Result<(), PatronError> {
        let id = parse_id(&cmd.id)?;

        if self.repository.find_by_id(&id).await?.is_none() {
            return Err(PatronError::not_found(id.as_str()));
        }

        if !self.repository.delete(&id).await? {
            tracing::error!(patron_id = %id, "Delete reported no rows for an existing patron");
            return Err(PatronError::internal("Failed to delete patron"));
        }

        tracing::info!(patron_id = %id, "Patron deleted");
        Ok(())
    }
}
