//! ListPatronsHandler - Query handler for paginated patron listings.

use std::sync::Arc;

use crate::domain::patron::PatronError;
use crate::domain::person::Role;
use crate::ports::{PatronFilter, PatronRepository, DEFAULT_PAGE_SIZE};

use super::{PatronDto, PatronListDto};

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Query to list patrons.
#[derive(Debug, Clone, Default)]
pub struct ListPatronsQuery {
    /// 1-based; defaults to 1.
    pub page: Option<u32>,
    /// Defaults to 10, at most 100.
    pub limit: Option<u32>,
    pub role: Option<String>,
    pub search: Option<String>,
    pub active: Option<bool>,
}

/// Handler for listing patrons.
pub struct ListPatronsHandler {
    repository: Arc<dyn PatronRepository>,
}

impl ListPatronsHandler {
    pub fn new(repository: Arc<dyn PatronRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListPatronsQuery) -> Result<PatronListDto, PatronError> {
        let page = query.page.unwrap_or(1);
        let limit = query.limit.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(PatronError::validation("page", "Page must be at least 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&limit) {
            return Err(PatronError::validation(
                "limit",
                format!("Limit must be between 1 and {}", MAX_PAGE_SIZE),
            ));
        }
        let role = query
            .role
            .as_deref()
            .map(str::parse::<Role>)
            .transpose()?;

        let filter = PatronFilter {
            page,
            limit,
            role,
            search: query.search,
            active: query.active,
        };

        let result = self.repository.find(&filter).await?;
        let patrons = result.items.iter().map(PatronDto::from).collect();

        Ok(PatronListDto::new(patrons, result.total, page, limit))
    }
}
