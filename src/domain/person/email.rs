//! Email address value object.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

const MAX_LENGTH: usize = 254;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("valid regex")
});

/// A syntactically valid, lower-cased email address.
///
/// Input is trimmed before validation. Uniqueness is not a property of the
/// value; the repository enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let trimmed = value.as_ref().trim();

        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("email"));
        }
        if trimmed.len() > MAX_LENGTH {
            return Err(ValidationError::out_of_range(
                "email",
                1,
                MAX_LENGTH,
                trimmed.len(),
            ));
        }
        if !EMAIL_PATTERN.is_match(trimmed) {
            return Err(ValidationError::invalid_format(
                "email",
                "not a valid email address",
            ));
        }
        if trimmed.contains("..") {
            return Err(ValidationError::invalid_format(
                "email",
                "consecutive dots are not allowed",
            ));
        }
        let domain = trimmed.rsplit('@').next().unwrap_or_default();
        if domain.len() < 2 {
            return Err(ValidationError::invalid_format(
                "email",
                "domain is too short",
            ));
        }

        Ok(Self(trimmed.to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Part after the `@`.
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map(|(_, d)| d).unwrap_or_default()
    }

    /// Part before the `@`.
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map(|(l, _)| l).unwrap_or_default()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Email {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}
