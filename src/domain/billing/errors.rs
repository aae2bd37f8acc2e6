//! Errors raised while issuing checkout and portal sessions.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | ValidationFailed | 400 |
//! | Provider | 500 |

use thiserror::Error;

use crate::domain::foundation::ValidationError;

/// Session issuing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    /// Request is missing or has an invalid field.
    #[error("{message}")]
    ValidationFailed { field: String, message: String },

    /// The payment provider rejected or failed the call.
    #[error("{message}")]
    Provider { message: String, retryable: bool },
}

impl BillingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn provider(message: impl Into<String>, retryable: bool) -> Self {
        BillingError::Provider {
            message: message.into(),
            retryable,
        }
    }

    /// Returns true for caller mistakes.
    pub fn is_client_error(&self) -> bool {
        matches!(self, BillingError::ValidationFailed { .. })
    }
}

impl From<ValidationError> for BillingError {
    fn from(err: ValidationError) -> Self {
        let ValidationError::EmptyField { field } = &err;
        BillingError::validation(field.clone(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_displays_message_only() {
        let err = BillingError::validation("email", "email and user_id are required");
        assert_eq!(err.to_string(), "email and user_id are required");
        assert!(err.is_client_error());
    }

    #[test]
    fn provider_error_is_server_side() {
        let err = BillingError::provider("No such price", false);
        assert_eq!(err.to_string(), "No such price");
        assert!(!err.is_client_error());
    }

    #[test]
    fn converts_from_value_validation_error() {
        let err: BillingError = ValidationError::empty_field("user_id").into();

        match err {
            BillingError::ValidationFailed { field, message } => {
                assert_eq!(field, "user_id");
                assert_eq!(message, "Field 'user_id' cannot be empty");
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }
}
