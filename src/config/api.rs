//! API surface configuration

use serde::Deserialize;

use super::error::ValidationError;

/// API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Path prefix every versioned route is mounted under
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

impl ApiConfig {
    /// Validate API configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let valid = self.prefix.starts_with('/')
            && (self.prefix.len() == 1 || !self.prefix.ends_with('/'));
        if !valid {
            return Err(ValidationError::InvalidApiPrefix(self.prefix.clone()));
        }
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
        }
    }
}

fn default_prefix() -> String {
    "/api/v1".to_string()
}
