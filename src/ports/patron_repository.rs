//! Patron repository port.
//!
//! Defines the contract for persisting and retrieving Patron aggregates.
//! Implementations handle the actual storage operations.
//!
//! # Design
//!
//! - **Storage assigns identity**: `create` returns the patron with its id
//!   and audit stamps filled in
//! - **Unique email**: a duplicate email on write surfaces as `PatronExists`
//! - **True totals**: `find` reports the full matching count, not the page size
//!
//! # Example
//!
//! ```ignore
//! async fn register(
//!     repo: &dyn PatronRepository,
//!     patron: Patron,
//! ) -> Result<Patron, DomainError> {
//!     if repo.find_by_email(patron.email()).await?.is_some() {
//!         return Err(DomainError::new(ErrorCode::PatronExists, "duplicate email"));
//!     }
//!     repo.create(&patron).await
//! }
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, PatronId};
use crate::domain::patron::Patron;
use crate::domain::person::{Email, Role};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Filtering and pagination options for [`PatronRepository::find`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatronFilter {
    /// 1-based page number.
    pub page: u32,

    /// Maximum items per page.
    pub limit: u32,

    /// Only patrons with this role.
    pub role: Option<Role>,

    /// Case-insensitive substring matched against given name, family name,
    /// email and charge.
    pub search: Option<String>,

    /// `Some(true)` keeps patrons whose ending date has not passed,
    /// `Some(false)` keeps those whose ending date has.
    pub active: Option<bool>,
}

impl Default for PatronFilter {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
            role: None,
            search: None,
            active: None,
        }
    }
}

impl PatronFilter {
    /// Creates a filter for one page with no other criteria.
    pub fn paginated(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Default::default()
        }
    }

    /// Number of matching rows to skip.
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }

    /// Search term with surrounding whitespace removed; `None` when blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty())
    }
}

/// One page of patrons plus the total number of matches.
#[derive(Debug, Clone, Default)]
pub struct PatronPage {
    pub items: Vec<Patron>,
    pub total: u64,
}

/// Repository port for Patron aggregate persistence.
#[async_trait]
pub trait PatronRepository: Send + Sync {
    /// Lists patrons matching `filter`, ordered by creation time.
    async fn find(&self, filter: &PatronFilter) -> Result<PatronPage, DomainError>;

    /// Find a patron by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &PatronId) -> Result<Option<Patron>, DomainError>;

    /// Find a patron by email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<Patron>, DomainError>;

    /// Persist a new patron, assigning its id and audit stamps.
    ///
    /// # Errors
    ///
    /// - `PatronExists` if the email is already registered
    /// - `DatabaseError` on persistence failure
    async fn create(&self, patron: &Patron) -> Result<Patron, DomainError>;

    /// Overwrite the stored patron with `patron`.
    ///
    /// Returns `None` if no patron with `id` exists at write time.
    ///
    /// # Errors
    ///
    /// - `PatronExists` if the new email belongs to another patron
    /// - `DatabaseError` on persistence failure
    async fn update(&self, id: &PatronId, patron: &Patron) -> Result<Option<Patron>, DomainError>;

    /// Remove a patron. Returns `false` if nothing was deleted.
    async fn delete(&self, id: &PatronId) -> Result<bool, DomainError>;
}
