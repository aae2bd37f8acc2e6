//! Payment provider port for external payment processing.
//!
//! Defines the contract for the hosted-checkout gateway (Stripe).
//! The relay never charges cards itself: it issues hosted sessions and
//! reads subscriptions back when a webhook refers to one by id.

use crate::domain::billing::StripeSubscription;
use crate::domain::foundation::UserId;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Create a checkout session for a new subscription.
    ///
    /// Returns a URL for the customer to complete payment.
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError>;

    /// Create a billing portal session for subscription management.
    ///
    /// Returns a URL for the customer to manage their subscription.
    async fn create_portal_session(
        &self,
        request: CreatePortalRequest,
    ) -> Result<PortalSession, PaymentError>;

    /// Fetch the current state of a subscription by provider ID.
    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<StripeSubscription, PaymentError>;
}

/// Request to create a checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCheckoutRequest {
    /// Internal user ID, attached to both session and subscription metadata.
    pub user_id: UserId,

    /// Customer email for pre-fill.
    pub email: String,

    /// Price the single line item subscribes to.
    pub price_id: String,

    /// Free trial length.
    pub trial_period_days: u32,

    /// URL to redirect after successful checkout.
    pub success_url: String,

    /// URL to redirect after canceled checkout.
    pub cancel_url: String,

    /// Whether promotion codes can be entered on the hosted page.
    pub allow_promotion_codes: bool,
}

/// Request to create a billing portal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePortalRequest {
    /// Provider's customer ID.
    pub customer_id: String,

    /// Where the portal sends the customer back to.
    pub return_url: String,
}

/// Checkout session for payment completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to complete checkout.
    pub url: String,
}

/// Portal session for subscription management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for customer to access portal.
    pub url: String,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Create with provider code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    /// Create a provider API error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Request rejected by the provider (bad parameters).
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());
        assert!(PaymentErrorCode::ProviderError.is_retryable());

        assert!(!PaymentErrorCode::InvalidRequest.is_retryable());
        assert!(!PaymentErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::new(PaymentErrorCode::InvalidRequest, "No such price")
            .with_provider_code("resource_missing");

        assert_eq!(err.to_string(), "invalid_request: No such price");
        assert_eq!(err.provider_code.as_deref(), Some("resource_missing"));
        assert!(!err.retryable);
    }

    #[test]
    fn not_found_names_resource() {
        let err = PaymentError::not_found("Subscription sub_1");
        assert_eq!(err.message, "Subscription sub_1 not found");
        assert_eq!(err.code, PaymentErrorCode::NotFound);
    }
}
