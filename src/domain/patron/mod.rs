//! Patron module - board members, their offices and terms.

mod aggregate;
mod charge;
mod date_range;
mod errors;

pub use aggregate::{NewPatron, Patron, PatronPrimitives};
pub use charge::Charge;
pub use date_range::{DateRange, MAX_TERM_YEARS};
pub use errors::PatronError;
