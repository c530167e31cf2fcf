//! Person module - identity value objects shared by registered people.

mod email;
mod identity;
mod person_name;
mod role;

pub use email::Email;
pub use identity::Person;
pub use person_name::PersonName;
pub(crate) use person_name::title_case;
pub use role::Role;
