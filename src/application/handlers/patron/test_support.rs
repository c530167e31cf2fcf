//! Shared fixtures for patron handler tests.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, PatronId, Timestamp};
use crate::domain::patron::{NewPatron, Patron};
use crate::domain::person::Email;
use crate::ports::{PatronFilter, PatronPage, PatronRepository};

pub fn at(y: i32, m: u32, d: u32) -> Timestamp {
    Timestamp::from_datetime(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
}

pub fn new_patron(email: &str) -> Patron {
    Patron::create(NewPatron {
        email: email.to_string(),
        given_name: "Anna".to_string(),
        family_name: "Puig".to_string(),
        role: "patron".to_string(),
        charge: "Treasurer".to_string(),
        renovation_date: at(2024, 1, 1),
        ending_date: at(2028, 1, 1),
    })
    .unwrap()
}

pub fn stored_patron(email: &str) -> Patron {
    new_patron(email).persisted(PatronId::generate(), at(2024, 1, 1), at(2024, 1, 1))
}

/// Vec-backed repository with switchable failure modes.
#[derive(Default)]
pub struct MockPatronRepository {
    pub patrons: Mutex<Vec<Patron>>,
    pub writes: Mutex<u32>,
    pub fail_reads: bool,
    pub fail_writes: bool,
    /// `update` reports the row as gone.
    pub vanish_on_update: bool,
    /// `delete` reports nothing deleted.
    pub refuse_delete: bool,
}

impl MockPatronRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(patrons: Vec<Patron>) -> Self {
        Self {
            patrons: Mutex::new(patrons),
            ..Default::default()
        }
    }

    pub fn writes(&self) -> u32 {
        *self.writes.lock().unwrap()
    }

    fn db_error() -> DomainError {
        DomainError::new(ErrorCode::DatabaseError, "Simulated database failure")
    }
}

#[async_trait]
impl PatronRepository for MockPatronRepository {
    async fn find(&self, filter: &PatronFilter) -> Result<PatronPage, DomainError> {
        if self.fail_reads {
            return Err(Self::db_error());
        }
        let patrons = self.patrons.lock().unwrap();
        let matching: Vec<Patron> = patrons
            .iter()
            .filter(|p| filter.role.map_or(true, |role| p.role() == role))
            .cloned()
            .collect();
        let items = matching
            .iter()
            .skip(filter.offset() as usize)
            .take(filter.limit as usize)
            .cloned()
            .collect();
        Ok(PatronPage {
            items,
            total: matching.len() as u64,
        })
    }

    async fn find_by_id(&self, id: &PatronId) -> Result<Option<Patron>, DomainError> {
        if self.fail_reads {
            return Err(Self::db_error());
        }
        let patrons = self.patrons.lock().unwrap();
        Ok(patrons.iter().find(|p| p.id() == Some(id)).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<Patron>, DomainError> {
        if self.fail_reads {
            return Err(Self::db_error());
        }
        let patrons = self.patrons.lock().unwrap();
        Ok(patrons.iter().find(|p| p.email() == email).cloned())
    }

    async fn create(&self, patron: &Patron) -> Result<Patron, DomainError> {
        if self.fail_writes {
            return Err(Self::db_error());
        }
        *self.writes.lock().unwrap() += 1;
        let now = Timestamp::now();
        let stored = patron.clone().persisted(PatronId::generate(), now, now);
        self.patrons.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &PatronId, patron: &Patron) -> Result<Option<Patron>, DomainError> {
        if self.fail_writes {
            return Err(Self::db_error());
        }
        *self.writes.lock().unwrap() += 1;
        if self.vanish_on_update {
            return Ok(None);
        }
        let mut patrons = self.patrons.lock().unwrap();
        let Some(slot) = patrons.iter_mut().find(|p| p.id() == Some(id)) else {
            return Ok(None);
        };
        let created = slot.created_at().unwrap_or_else(Timestamp::now);
        *slot = patron.clone().persisted(id.clone(), created, Timestamp::now());
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &PatronId) -> Result<bool, DomainError> {
        if self.fail_writes {
            return Err(Self::db_error());
        }
        *self.writes.lock().unwrap() += 1;
        if self.refuse_delete {
            return Ok(false);
        }
        let mut patrons = self.patrons.lock().unwrap();
        let before = patrons.len();
        patrons.retain(|p| p.id() != Some(id));
        Ok(patrons.len() < before)
    }
}
