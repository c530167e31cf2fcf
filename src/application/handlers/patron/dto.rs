//! Read models returned by patron handlers.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::patron::Patron;

/// Patron as exposed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronDto {
    pub id: Option<String>,
    pub email: String,
    pub given_name: String,
    pub family_name: String,
    pub role: String,
    pub charge: String,
    pub abbreviation: String,
    pub initials: String,
    pub renovation_date: Timestamp,
    pub ending_date: Timestamp,
    pub is_active: bool,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

impl From<&Patron> for PatronDto {
    fn from(patron: &Patron) -> Self {
        let p = patron.to_primitives();
        Self {
            id: p.id,
            email: p.email,
            given_name: p.given_name,
            family_name: p.family_name,
            role: p.role,
            charge: p.charge,
            abbreviation: patron.abbreviation(),
            initials: patron.initials(),
            renovation_date: p.renovation_date,
            ending_date: p.ending_date,
            is_active: patron.is_active(),
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<Patron> for PatronDto {
    fn from(patron: Patron) -> Self {
        Self::from(&patron)
    }
}

/// One page of patrons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatronListDto {
    pub patrons: Vec<PatronDto>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
}

impl PatronListDto {
    pub fn new(patrons: Vec<PatronDto>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            patrons,
            total,
            page,
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

fn total_pages(total: u64, limit: u32) -> u64 {
    if limit == 0 {
        return 0;
    }
    total.div_ceil(u64::from(limit))
}
