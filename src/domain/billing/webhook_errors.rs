//! Webhook error types for Stripe webhook handling.
//!
//! Verification failures reject the delivery; processing failures are
//! acknowledged and only logged.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook processing.
#[derive(Debug, Clone, Error)]
pub enum WebhookError {
    /// The `stripe-signature` header was not sent.
    #[error("Missing signature header")]
    MissingSignature,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Signature header or payload could not be parsed.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Test-mode event delivered to a live-only endpoint.
    #[error("Test mode event rejected")]
    LivemodeRequired,

    /// Required metadata field missing from webhook event.
    #[error("Missing metadata: {0}")]
    MissingMetadata(&'static str),

    /// Required field missing from webhook payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),

    /// Payment provider call made while processing the event failed.
    #[error("Provider error: {message}")]
    Provider { message: String, retryable: bool },

    /// Store write failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true when the delivery itself is rejected.
    pub fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            WebhookError::MissingSignature
                | WebhookError::InvalidSignature
                | WebhookError::TimestampOutOfRange
                | WebhookError::InvalidTimestamp
                | WebhookError::MalformedPayload(_)
                | WebhookError::LivemodeRequired
        )
    }

    /// Returns true if the failure is transient and a replay could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            WebhookError::Provider { retryable, .. } => *retryable,
            WebhookError::Database(_) => true,
            _ => false,
        }
    }

    /// Maps the error to the HTTP status returned to Stripe.
    ///
    /// Processing failures are acknowledged with 200 so Stripe does not
    /// redeliver; they are logged for manual replay instead.
    pub fn status_code(&self) -> StatusCode {
        if self.is_verification_failure() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::OK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Error Display Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn invalid_signature_displays_correctly() {
        let err = WebhookError::InvalidSignature;
        assert_eq!(format!("{}", err), "Invalid signature");
    }

    #[test]
    fn malformed_payload_displays_detail() {
        let err = WebhookError::MalformedPayload("missing t".to_string());
        assert_eq!(format!("{}", err), "Malformed payload: missing t");
    }

    #[test]
    fn missing_metadata_displays_field() {
        let err = WebhookError::MissingMetadata("user_id");
        assert_eq!(format!("{}", err), "Missing metadata: user_id");
    }

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn verification_failures_return_400() {
        for err in [
            WebhookError::MissingSignature,
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
            WebhookError::InvalidTimestamp,
            WebhookError::MalformedPayload("x".into()),
            WebhookError::LivemodeRequired,
        ] {
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST, "{}", err);
        }
    }

    #[test]
    fn processing_failures_are_acknowledged() {
        for err in [
            WebhookError::MissingMetadata("user_id"),
            WebhookError::MissingField("items.data[0].price.id"),
            WebhookError::Provider {
                message: "timeout".into(),
                retryable: true,
            },
            WebhookError::Database("conflict".into()),
        ] {
            assert_eq!(err.status_code(), StatusCode::OK, "{}", err);
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Retryability Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn transient_failures_are_retryable() {
        assert!(WebhookError::Database("down".into()).is_retryable());
        assert!(WebhookError::Provider {
            message: "503".into(),
            retryable: true,
        }
        .is_retryable());
    }

    #[test]
    fn provider_retryability_follows_the_provider() {
        let err = WebhookError::Provider {
            message: "No such subscription: sub_gone".into(),
            retryable: false,
        };
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Provider error: No such subscription: sub_gone");
    }

    #[test]
    fn data_failures_are_not_retryable() {
        assert!(!WebhookError::MissingMetadata("user_id").is_retryable());
        assert!(!WebhookError::InvalidSignature.is_retryable());
    }
}
