//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors)
//! - `person` - Identity value objects (email, names, role)
//! - `patron` - Patron aggregate, charge and board term

pub mod foundation;
pub mod patron;
pub mod person;
