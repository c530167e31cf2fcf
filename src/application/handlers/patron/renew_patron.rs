//! RenewPatronHandler - Command handler for starting a new term.

use std::sync::Arc;

use crate::domain::foundation::Timestamp;
use crate::domain::patron::PatronError;
use crate::ports::PatronRepository;

use super::{parse_id, PatronDto};

/// Command to renew an expired patron until `ending_date`.
#[derive(Debug, Clone)]
pub struct RenewPatronCommand {
    pub id: String,
    pub ending_date: Timestamp,
}

/// Handler for renewing patrons.
pub struct RenewPatronHandler {
    repository: Arc<dyn PatronRepository>,
}

impl RenewPatronHandler {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: RenewPatronCommand) -> Result<PatronDto, PatronError> {
        self.handle_at(cmd, Timestamp::now()).await
    }

    /// Renews as of `now`; the new term starts at `now`.
    pub async fn handle_at(
        &self,
        cmd: RenewPatronCommand,
        now: Timestamp,
    ) -> Result<PatronDto, PatronError> {
        let id = parse_id(&cmd.id)?;

        let patron = self
            .repository
            .find_by_id(&id)
            .await?
            .ok_or_else(|| PatronError::not_found(id.as_str()))?;

        let renewed = patron.renew_at(cmd.ending_date, now)?;

        let stored = self
            .repository
            .update(&id, &renewed)
            .await?
            .ok_or_else(|| PatronError::not_found(id.as_str()))?;

        tracing::info!(
            patron_id = %id,
            ending_date = %stored.ending_date().date_string(),
            "Patron renewed"
        );

        Ok(PatronDto::from(&stored))
    }
}
