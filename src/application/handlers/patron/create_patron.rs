//! CreatePatronHandler - Command handler for registering patrons.

use std::sync::Arc;

use crate::domain::foundation::{ErrorCode, Timestamp};
use crate::domain::patron::{NewPatron, Patron, PatronError};
use crate::ports::PatronRepository;

use super::PatronDto;

/// Command to register a new patron.
#[derive(Debug, Clone)]
pub struct CreatePatronCommand {
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub role: String,
    pub charge: String,
    pub renovation_date: Timestamp,
    pub ending_date: Timestamp,
}

/// Handler for registering patrons.
pub struct CreatePatronHandler {
    repository: Arc<dyn PatronRepository>,
}

impl CreatePatronHandler {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: CreatePatronCommand) -> Result<PatronDto, PatronError> {
        // 1. Validate and assemble the aggregate
        let patron = Patron::create(NewPatron {
            email: cmd.email,
            given_name: cmd.given_name,
            family_name: cmd.family_name,
            role: cmd.role,
            charge: cmd.charge,
            renovation_date: cmd.renovation_date,
            ending_date: cmd.ending_date,
        })?;

        // 2. Reject duplicate emails
        if self.repository.find_by_email(patron.email()).await?.is_some() {
            return Err(PatronError::conflict(patron.email().as_str()));
        }

        // 3. Persist; a concurrent insert can still trip the unique constraint
        let created = self.repository.create(&patron).await.map_err(|err| {
            if err.code == ErrorCode::PatronExists {
                PatronError::conflict(patron.email().as_str())
            } else {
                PatronError::from(err)
            }
        })?;

        tracing::info!(
            patron_id = created.id().map(|id| id.as_str()).unwrap_or_default(),
            "Patron created"
        );

        Ok(PatronDto::from(&created))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::patron::test_support::{at, stored_patron, MockPatronRepository};
    use crate::domain::foundation::{DomainError, PatronId};
    use crate::domain::person::Email;
    use crate::ports::{PatronFilter, PatronPage};
    use async_trait::async_trait;

    fn command(email: &str) -> CreatePatronCommand {
        CreatePatronCommand {
            email: email.to_string(),
            given_name: "joan".to_string(),
            family_name: "riera".to_string(),
            role: "admin".to_string(),
            charge: "secretary of the board".to_string(),
            renovation_date: at(2024, 1, 1),
            ending_date: at(2027, 1, 1),
        }
    }

    #[tokio::test]
    async fn creates_and_returns_normalized_patron() {
        let repo = Arc::new(MockPatronRepository::new());
        let handler = CreatePatronHandler::new(repo.clone());

        let dto = handler.handle(command("Joan@Example.com")).await.unwrap();

        assert!(dto.id.is_some());
        assert_eq!(dto.email, "joan@example.com");
        assert_eq!(dto.given_name, "Joan");
        assert_eq!(dto.charge, "Secretary of the Board");
        assert_eq!(dto.abbreviation, "SB");
        assert!(dto.created_at.is_some());
        assert_eq!(repo.writes(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict_not_validation() {
        let repo = Arc::new(MockPatronRepository::with(vec![stored_patron("a@b.com")]));
        let handler = CreatePatronHandler::new(repo.clone());

        let err = handler.handle(command("A@B.com")).await.unwrap_err();

        assert_eq!(err, PatronError::conflict("a@b.com"));
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn invalid_input_is_validation_and_skips_repository() {
        let repo = Arc::new(MockPatronRepository::new());
        let handler = CreatePatronHandler::new(repo.clone());

        let mut cmd = command("a@b.com");
        cmd.given_name = "J0hn!".to_string();
        let err = handler.handle(cmd).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::ValidationFailed);
        assert_eq!(repo.writes(), 0);
    }

    #[tokio::test]
    async fn database_failure_surfaces_as_database_error() {
        let repo = Arc::new(MockPatronRepository {
            fail_writes: true,
            ..Default::default()
        });
        let handler = CreatePatronHandler::new(repo);

        let err = handler.handle(command("a@b.com")).await.unwrap_err();
        assert!(matches!(err, PatronError::Database(_)));
    }

    /// Simulates losing the race: the pre-check sees nothing, the insert
    /// hits the unique constraint.
    struct RacingRepository;

    #[async_trait]
    impl PatronRepository for RacingRepository {
        async fn find(&self, _filter: &PatronFilter) -> Result<PatronPage, DomainError> {
            Ok(PatronPage::default())
        }
        async fn find_by_id(&self, _id: &PatronId) -> Result<Option<Patron>, DomainError> {
            Ok(None)
        }
        async fn find_by_email(&self, _email: &Email) -> Result<Option<Patron>, DomainError> {
            Ok(None)
        }
        async fn create(&self, _patron: &Patron) -> Result<Patron, DomainError> {
            Err(DomainError::new(ErrorCode::PatronExists, "duplicate key"))
        }
        async fn update(
            &self,
            _id: &PatronId,
            _patron: &Patron,
        ) -> Result<Option<Patron>, DomainError> {
            Ok(None)
        }
        async fn delete(&self, _id: &PatronId) -> Result<bool, DomainError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn unique_violation_on_insert_is_conflict() {
        let handler = CreatePatronHandler::new(Arc::new(RacingRepository));

        let err = handler.handle(command("a@b.com")).await.unwrap_err();
        assert_eq!(err, PatronError::conflict("a@b.com"));
    }
}
