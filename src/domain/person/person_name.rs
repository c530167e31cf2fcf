//! Human name value object (given name or family name).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const MIN_LENGTH: usize = 2;
const MAX_LENGTH: usize = 100;

static ALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZÀ-ÿĀ-žА-я\s.'-]+$").expect("valid regex"));

static CONSECUTIVE_SPECIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s.'-]{2,}").expect("valid regex"));

static EDGE_SPECIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\s.'-]|[\s.'-]$").expect("valid regex"));

/// A validated, title-cased personal name.
///
/// Accepts Latin (including accented and Latin Extended-A) and Cyrillic
/// letters plus space, hyphen, apostrophe and dot. Whitespace runs collapse to
/// a single space and every space-separated token is title-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PersonName(String);

impl PersonName {
    /// Validates a name, reporting failures against the field `name`.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        Self::for_field("name", value)
    }

    /// Validates a name, reporting failures against `field`.
    pub fn for_field(field: &str, value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();

        if trimmed.is_empty() {
            return Err(ValidationError::empty_field(field));
        }
        let length = trimmed.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(ValidationError::out_of_range(
                field, MIN_LENGTH, MAX_LENGTH, length,
            ));
        }
        if !ALLOWED.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                field,
                "only letters, spaces, hyphens, apostrophes and dots are allowed",
            ));
        }
        if CONSECUTIVE_SPECIALS.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                field,
                "consecutive special characters are not allowed",
            ));
        }
        if EDGE_SPECIAL.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                field,
                "cannot start or end with a special character",
            ));
        }

        Ok(Self(normalize(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First space-separated token.
    pub fn first_name(&self) -> &str {
        self.0.split(' ').next().unwrap_or_default()
    }

    /// Last token, if the name has more than one.
    pub fn last_name(&self) -> Option<&str> {
        let mut tokens = self.0.split(' ');
        tokens.next();
        tokens.last()
    }

    /// Upper-cased first letter of each token.
    pub fn initials(&self) -> String {
        self.0
            .split(' ')
            .filter_map(|token| token.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn title_case(token: &str) -> String {
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PersonName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PersonName> for String {
    fn from(name: PersonName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn title_cases_each_token() {
        let name = PersonName::new("mARIA del carmen").unwrap();
        assert_eq!(name.as_str(), "Maria Del Carmen");
    }

    #[test]
    fn rejects_whitespace_runs() {
        assert!(PersonName::new("Maria  Puig").is_err());
    }

    #[test]
    fn keeps_accented_letters() {
        let name = PersonName::new("josé ÀNGEL").unwrap();
        assert_eq!(name.as_str(), "José Àngel");
    }

    #[test]
    fn accepts_cyrillic() {
        assert!(PersonName::new("Иван").is_ok());
    }

    #[test]
    fn first_last_and_initials() {
        let name = PersonName::new("anna maria puig").unwrap();
        assert_eq!(name.first_name(), "Anna");
        assert_eq!(name.last_name(), Some("Puig"));
        assert_eq!(name.initials(), "AMP");
    }

    #[test]
    fn single_token_has_no_last_name() {
        let name = PersonName::new("Joan").unwrap();
        assert_eq!(name.last_name(), None);
        assert_eq!(name.initials(), "J");
    }

    #[test]
    fn rejects_digits_and_symbols() {
        assert!(PersonName::new("J0hn!").is_err());
    }

    #[test]
    fn rejects_consecutive_specials() {
        assert!(PersonName::new("O''Brien").is_err());
        assert!(PersonName::new("Anne--Marie").is_err());
    }

    #[test]
    fn rejects_leading_special() {
        assert!(PersonName::new("-Anne").is_err());
        assert!(PersonName::new("Anne.").is_err());
    }

    #[test]
    fn length_bounds_count_characters() {
        assert!(PersonName::new("J").is_err());
        assert!(PersonName::new("Jo").is_ok());
        assert!(PersonName::new("É".repeat(100)).is_ok());
        assert!(PersonName::new("a".repeat(101)).is_err());
    }

    #[test]
    fn reports_configured_field() {
        let err = PersonName::for_field("family_name", "").unwrap_err();
        assert_eq!(err.field(), Some("family_name"));
    }

    proptest! {
        #[test]
        fn names_with_digits_are_rejected(prefix in "[a-z]{2,10}", digit in 0u8..10) {
            let raw = format!("{prefix}{digit}");
            prop_assert!(PersonName::new(raw).is_err());
        }

        #[test]
        fn valid_names_round_trip_through_normalization(raw in "[a-z]{2,10}( [a-z]{2,10}){0,3}") {
            let name = PersonName::new(&raw).unwrap();
            let again = PersonName::new(name.as_str()).unwrap();
            prop_assert_eq!(name, again);
        }
    }
}
