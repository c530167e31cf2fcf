//! GetPatronHandler - Query handler for a single patron.

use std::sync::Arc;

use crate::domain::patron::PatronError;
use crate::ports::PatronRepository;

use super::{parse_id, PatronDto};

/// Query to fetch one patron by id.
#[derive(Debug, Clone)]
pub struct GetPatronQuery {
    pub id: String,
}

/// Handler for fetching a patron.
pub struct GetPatronHandler {
    repository: Arc<dyn PatronRepository>,
}

impl GetPatronHandler {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetPatronQuery) -> Result<PatronDto, PatronError> {
        let id = parse_id(&query.id)?;

        self.repository
            .find_by_id(&id)
            .await?
            .map(PatronDto::from)
            .ok_or_else(|| PatronError::not_found(id.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::patron::test_support::{stored_patron, MockPatronRepository};
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn returns_existing_patron() {
        let patron = stored_patron("a@b.com");
        let id = patron.id().unwrap().to_string();
        let handler = GetPatronHandler::new(Arc::new(MockPatronRepository::with(vec![patron])));

        let dto = handler.handle(GetPatronQuery { id: id.clone() }).await.unwrap();
        assert_eq!(dto.id, Some(id));
        assert_eq!(dto.email, "a@b.com");
    }

    #[tokio::test]
    async fn missing_patron_is_not_found() {
        let handler = GetPatronHandler::new(Arc::new(MockPatronRepository::new()));

        let err = handler
            .handle(GetPatronQuery {
                id: "507f1f77bcf86cd799439011".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err, PatronError::not_found("507f1f77bcf86cd799439011"));
    }

    #[tokio::test]
    async fn malformed_id_is_validation() {
        let handler = GetPatronHandler::new(Arc::new(MockPatronRepository::new()));

        let err = handler
            .handle(GetPatronQuery {
                id: "abc".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationFailed);
    }

    #[tokio::test]
    async fn read_failure_is_database_error() {
        let handler = GetPatronHandler::new(Arc::new(MockPatronRepository {
            fail_reads: true,
            ..Default::default()
        }));

        let err = handler
            .handle(GetPatronQuery {
                id: "507f1f77bcf86cd799439011".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::DatabaseError);
    }
}
