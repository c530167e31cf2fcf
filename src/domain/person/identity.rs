//! Shared identity record embedded in a patron.

use serde::{Deserialize, Serialize};

use super::{Email, PersonName, Role};
use crate::domain::foundation::ValidationError;

/// Identity fields common to every registered person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub email: Email,
    pub given_name: PersonName,
    pub family_name: PersonName,
    pub role: Role,
}

impl Person {
    /// Validates all identity fields. The first failing field is reported.
    pub fn new(
        email: &str,
        given_name: &str,
        family_name: &str,
        role: &str,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            email: Email::new(email)?,
            given_name: PersonName::for_field("given_name", given_name)?,
            family_name: PersonName::for_field("family_name", family_name)?,
            role: role.parse()?,
        })
    }

    /// "Given Family".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }

    /// Initials of the given name followed by those of the family name.
    pub fn initials(&self) -> String {
        format!("{}{}", self.given_name.initials(), self.family_name.initials())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_raw_strings() {
        let person = Person::new("A@B.com", "anna", "puig i ferrer", "patron").unwrap();
        assert_eq!(person.email.as_str(), "a@b.com");
        assert_eq!(person.full_name(), "Anna Puig I Ferrer");
        assert_eq!(person.initials(), "APIF");
        assert_eq!(person.role, Role::Patron);
    }

    #[test]
    fn first_failing_field_wins() {
        let err = Person::new("bad", "x", "y", "nobody").unwrap_err();
        assert_eq!(err.field(), Some("email"));

        let err = Person::new("a@b.com", "x", "y", "nobody").unwrap_err();
        assert_eq!(err.field(), Some("given_name"));

        let err = Person::new("a@b.com", "Anna", "Puig", "nobody").unwrap_err();
        assert_eq!(err.field(), Some("role"));
    }
}
