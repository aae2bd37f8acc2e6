//! Public application settings

use serde::Deserialize;

use super::error::ValidationError;

/// Settings describing the public front end
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
    /// Public origin used for checkout and portal redirects
    pub domain: String,
}

impl AppSection {
    /// Domain without a trailing slash
    pub fn domain(&self) -> &str {
        self.domain.trim_end_matches('/')
    }

    /// Validate application settings
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.domain.is_empty() {
            return Err(ValidationError::MissingRequired("APP__DOMAIN"));
        }
        if !self.domain.starts_with("http://") && !self.domain.starts_with("https://") {
            return Err(ValidationError::InvalidDomain(self.domain.clone()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let app = AppSection {
            domain: "https://app.example.com/".to_string(),
        };
        assert_eq!(app.domain(), "https://app.example.com");
    }

    #[test]
    fn test_domain_requires_scheme() {
        let app = AppSection {
            domain: "app.example.com".to_string(),
        };
        assert!(matches!(app.validate(), Err(ValidationError::InvalidDomain(_))));
    }

    #[test]
    fn test_empty_domain_rejected() {
        let app = AppSection {
            domain: String::new(),
        };
        assert_eq!(app.validate(), Err(ValidationError::MissingRequired("APP__DOMAIN")));
    }
}
