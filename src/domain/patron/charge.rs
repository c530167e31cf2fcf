//! Charge value object - the office a patron holds on the board.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;
use crate::domain::person::title_case;

const FIELD: &str = "charge";
const MIN_LENGTH: usize = 2;
const MAX_LENGTH: usize = 100;

/// Words kept lower-case unless they open the charge, and skipped by
/// [`Charge::abbreviation`].
const MINOR_WORDS: [&str; 16] = [
    "of", "the", "and", "or", "de", "del", "la", "el", "y", "e", "o", "u", "en", "con", "por",
    "para",
];

static ALLOWED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\p{L}\p{N} .'()-]+$").expect("valid regex"));

static CONSECUTIVE_SPECIALS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--|''|\.\.|\s{2,}").expect("valid regex"));

static EDGE_SPECIAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[.'-]|[.'-]$").expect("valid regex"));

/// A validated board office title such as "President" or
/// "Secretary of the Board (acting)".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Charge(String);

impl Charge {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();

        if trimmed.is_empty() {
            return Err(ValidationError::empty_field(FIELD));
        }
        if CONSECUTIVE_SPECIALS.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                FIELD,
                "consecutive special characters are not allowed",
            ));
        }
        if EDGE_SPECIAL.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                FIELD,
                "cannot start or end with a special character",
            ));
        }
        let length = trimmed.chars().count();
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(ValidationError::out_of_range(
                FIELD, MIN_LENGTH, MAX_LENGTH, length,
            ));
        }
        if !ALLOWED.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                FIELD,
                "only letters, numbers, spaces, hyphens, apostrophes, dots and parentheses are allowed",
            ));
        }

        Ok(Self(normalize(trimmed)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Upper-cased initials of the significant words.
    ///
    /// Single-character tokens, minor words and anything inside parentheses
    /// are skipped, so "Vice President of Finance (acting)" gives "VPF".
    pub fn abbreviation(&self) -> String {
        let mut depth: i32 = 0;
        let mut initials = String::new();

        for token in self.0.split(' ') {
            let inside = depth > 0 || token.starts_with('(');
            depth += token.matches('(').count() as i32 - token.matches(')').count() as i32;
            depth = depth.max(0);

            if inside || token.chars().count() <= 1 || is_minor(token) {
                continue;
            }
            if let Some(first) = token.chars().next() {
                initials.extend(first.to_uppercase());
            }
        }

        initials
    }
}

fn is_minor(token: &str) -> bool {
    let lowered = token.to_lowercase();
    MINOR_WORDS.contains(&lowered.as_str())
}

fn normalize(value: &str) -> String {
    value
        .split_whitespace()
        .enumerate()
        .map(|(index, token)| normalize_token(index, token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn normalize_token(index: usize, token: &str) -> String {
    if let Some(inner) = token
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return format!("({})", inner.to_lowercase());
    }
    if let Some(rest) = token.strip_prefix('(') {
        return format!("({}", title_case(rest));
    }
    if token.ends_with(')') {
        return token.to_lowercase();
    }
    if index > 0 && is_minor(token) {
        return token.to_lowercase();
    }
    title_case(token)
}

impl fmt::Display for Charge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Charge {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Charge> for String {
    fn from(charge: Charge) -> Self {
        charge.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn capitalises_and_keeps_minor_words_lowercase() {
        let charge = Charge::new("SECRETARY OF THE board").unwrap();
        assert_eq!(charge.as_str(), "Secretary of the Board");
    }

    #[test]
    fn first_word_is_always_capitalised() {
        let charge = Charge::new("de facto treasurer").unwrap();
        assert_eq!(charge.as_str(), "De Facto Treasurer");
    }

    #[test]
    fn parenthesised_words_are_lowercased() {
        let charge = Charge::new("President (ACTING)").unwrap();
        assert_eq!(charge.as_str(), "President (acting)");

        let charge = Charge::new("Treasurer (Pro Tempore)").unwrap();
        assert_eq!(charge.as_str(), "Treasurer (Pro tempore)");
    }

    #[test]
    fn abbreviation_skips_minor_and_parenthesised_words() {
        let charge = Charge::new("vice president of finance (acting)").unwrap();
        assert_eq!(charge.abbreviation(), "VPF");

        let charge = Charge::new("Secretari General (en funcions)").unwrap();
        assert_eq!(charge.abbreviation(), "SG");
    }

    #[test]
    fn abbreviation_skips_single_letters() {
        let charge = Charge::new("Vocal 2 del Patronat").unwrap();
        assert_eq!(charge.abbreviation(), "VP");
    }

    #[test]
    fn accepts_accented_letters_and_digits() {
        assert!(Charge::new("Secretària 1a").is_ok());
    }

    #[test]
    fn length_boundaries() {
        assert!(Charge::new("V").is_err());
        assert!(Charge::new("Vo").is_ok());
        assert!(Charge::new("a".repeat(100)).is_ok());
        assert!(Charge::new("a".repeat(101)).is_err());
    }

    #[test]
    fn rejects_symbols() {
        assert!(Charge::new("President & CEO").is_err());
        assert!(Charge::new("Chair@Board").is_err());
    }

    #[test]
    fn rejects_consecutive_specials() {
        assert!(Charge::new("Vice--President").is_err());
        assert!(Charge::new("Vice  President").is_err());
        assert!(Charge::new("Dr.. Chair").is_err());
    }

    #[test]
    fn rejects_edge_specials() {
        assert!(Charge::new("-President").is_err());
        assert!(Charge::new("President'").is_err());
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(Charge::new("  treasurer  ").unwrap().as_str(), "Treasurer");
    }

    proptest! {
        #[test]
        fn too_short_or_too_long_is_rejected(len in prop_oneof![0usize..2, 101usize..150]) {
            prop_assert!(Charge::new("a".repeat(len)).is_err());
        }

        #[test]
        fn normalization_is_idempotent(raw in "[a-z]{2,12}( [a-z]{2,12}){0,4}") {
            let once = Charge::new(&raw).unwrap();
            let twice = Charge::new(once.as_str()).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
