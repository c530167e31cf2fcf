//! In-Memory Patron Repository
//!
//! Stores patrons in process memory with the same contract as the
//! PostgreSQL adapter, including the unique email rule.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, PatronId, Timestamp};
use crate::domain::patron::Patron;
use crate::domain::person::Email;
use crate::ports::{PatronFilter, PatronPage, PatronRepository};

#[derive(Debug, Clone)]
struct Entry {
    /// Insertion order, used as the listing order.
    seq: u64,
    patron: Patron,
}

#[derive(Debug, Default)]
struct Store {
    next_seq: u64,
    patrons: HashMap<PatronId, Entry>,
}

impl Store {
    fn email_taken(&self, email: &Email, except: Option<&PatronId>) -> bool {
        self.patrons
            .iter()
            .any(|(id, entry)| Some(id) != except && entry.patron.email() == email)
    }
}

/// In-memory storage for patrons
#[derive(Debug, Clone, Default)]
pub struct InMemoryPatronRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryPatronRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

}

fn duplicate_email(email: &Email) -> DomainError {
    DomainError::new(ErrorCode::PatronExists, "Email is already registered")
        .with_detail("email", email.as_str())
}

fn matches(patron: &Patron, filter: &PatronFilter, now: Timestamp) -> bool {
    if let Some(role) = filter.role {
        if patron.role() != role {
            return false;
        }
    }
    if let Some(active) = filter.active {
        let ongoing = !patron.ending_date().is_before(&now);
        if ongoing != active {
            return false;
        }
    }
    if let Some(term) = filter.search_term() {
        let needle = term.to_lowercase();
        let haystacks = [
            patron.given_name().as_str(),
            patron.family_name().as_str(),
            patron.email().as_str(),
            patron.charge().as_str(),
        ];
        if !haystacks
            .iter()
            .any(|hay| hay.to_lowercase().contains(&needle))
        {
            return false;
        }
    }
    true
}

#[async_trait]
impl PatronRepository for InMemoryPatronRepository {
    async fn find(&self, filter: &PatronFilter) -> Result<PatronPage, DomainError> {
        let store = self.store.read().await;
        let now = Timestamp::now();

        let mut matching: Vec<&Entry> = store
            .patrons
            .values()
            .filter(|entry| matches(&entry.patron, filter, now))
            .collect();
        matching.sort_by_key(|entry| entry.seq);

        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(filter.offset() as usize)
            .take(filter.limit as usize)
            .map(|entry| entry.patron.clone())
            .collect();

        Ok(PatronPage { items, total })
    }

    async fn find_by_id(&self, id: &PatronId) -> Result<Option<Patron>, DomainError> {
        let store = self.store.read().await;
        Ok(store.patrons.get(id).map(|entry| entry.patron.clone()))
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Patron>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .patrons
            .values()
            .find(|entry| entry.patron.email() == email)
            .map(|entry| entry.patron.clone()))
    }

    async fn create(&self, patron: &Patron) -> Result<Patron, DomainError> {
        let mut store = self.store.write().await;
        if store.email_taken(patron.email(), None) {
            return Err(duplicate_email(patron.email()));
        }

        let id = patron.id().cloned().unwrap_or_else(PatronId::generate);
        if store.patrons.contains_key(&id) {
            return Err(DomainError::database(format!(
                "Failed to create patron: id {} already exists",
                id
            )));
        }
        let now = Timestamp::now();
        let stored = patron.clone().persisted(id.clone(), now, now);

        let seq = store.next_seq;
        store.next_seq += 1;
        store.patrons.insert(
            id,
            Entry {
                seq,
                patron: stored.clone(),
            },
        );

        Ok(stored)
    }

    async fn update(&self, id: &PatronId, patron: &Patron) -> Result<Option<Patron>, DomainError> {
        let mut store = self.store.write().await;
        if !store.patrons.contains_key(id) {
            return Ok(None);
        }
        if store.email_taken(patron.email(), Some(id)) {
            return Err(duplicate_email(patron.email()));
        }

        let Some(entry) = store.patrons.get_mut(id) else {
            return Ok(None);
        };
        let created_at = entry.patron.created_at().unwrap_or_else(Timestamp::now);
        entry.patron = patron
            .clone()
            .persisted(id.clone(), created_at, Timestamp::now());

        Ok(Some(entry.patron.clone()))
    }

    async fn delete(&self, id: &PatronId) -> Result<bool, DomainError> {
        let mut store = self.store.write().await;
        Ok(store.patrons.remove(id).is_some())
    }
}
