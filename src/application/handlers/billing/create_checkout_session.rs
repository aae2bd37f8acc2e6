//! CreateCheckoutSessionHandler - Issues a hosted Stripe checkout for a new subscription.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::UserId;
use crate::ports::{CreateCheckoutRequest, PaymentProvider};

/// Command to start a subscription checkout.
#[derive(Debug, Clone, Default)]
pub struct CreateCheckoutSessionCommand {
    pub email: Option<String>,
    pub user_id: Option<String>,
}

/// Result of a created checkout session.
#[derive(Debug, Clone)]
pub struct CreateCheckoutSessionResult {
    pub session_id: String,
    pub url: String,
}

/// Fixed parameters of every checkout this service issues.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    /// Price of the single subscription plan.
    pub price_id: String,
    /// Free trial length.
    pub trial_period_days: u32,
    /// Public origin used for the success and cancel redirects.
    pub domain: String,
}

impl CheckoutSettings {
    fn success_url(&self) -> String {
        format!("{}/success?session_id={{CHECKOUT_SESSION_ID}}", self.domain)
    }

    fn cancel_url(&self) -> String {
        format!("{}/cancel", self.domain)
    }
}

/// Handler for checkout session creation.
pub struct CreateCheckoutSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    settings: CheckoutSettings,
}

impl CreateCheckoutSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, settings: CheckoutSettings) -> Self {
        Self {
            payment_provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateCheckoutSessionCommand,
    ) -> Result<CreateCheckoutSessionResult, BillingError> {
        // 1. Both fields are required
        let (email, user_id) = match (non_blank(cmd.email), non_blank(cmd.user_id)) {
            (Some(email), Some(user_id)) => (email, UserId::new(user_id)?),
            (None, _) => {
                return Err(BillingError::validation(
                    "email",
                    "email and user_id are required",
                ))
            }
            (_, None) => {
                return Err(BillingError::validation(
                    "user_id",
                    "email and user_id are required",
                ))
            }
        };

        // 2. Create hosted session
        let session = self
            .payment_provider
            .create_checkout_session(CreateCheckoutRequest {
                user_id: user_id.clone(),
                email,
                price_id: self.settings.price_id.clone(),
                trial_period_days: self.settings.trial_period_days,
                success_url: self.settings.success_url(),
                cancel_url: self.settings.cancel_url(),
                allow_promotion_codes: true,
            })
            .await
            .map_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to create checkout session");
                BillingError::provider(e.message, e.retryable)
            })?;

        tracing::info!(user_id = %user_id, session_id = %session.id, "Checkout session created");

        Ok(CreateCheckoutSessionResult {
            session_id: session.id,
            url: session.url,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentError;

    fn settings() -> CheckoutSettings {
        CheckoutSettings {
            price_id: "price_monthly".to_string(),
            trial_period_days: 14,
            domain: "https://app.example.com".to_string(),
        }
    }

    fn handler(provider: &MockPaymentProvider) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(Arc::new(provider.clone()), settings())
    }

    fn command(email: Option<&str>, user_id: Option<&str>) -> CreateCheckoutSessionCommand {
        CreateCheckoutSessionCommand {
            email: email.map(String::from),
            user_id: user_id.map(String::from),
        }
    }

    #[tokio::test]
    async fn creates_session_with_configured_plan() {
        let provider = MockPaymentProvider::new();

        let result = handler(&provider)
            .handle(command(Some("user@example.com"), Some("u1")))
            .await
            .unwrap();

        assert!(result.url.starts_with("https://checkout.stripe.com/"));

        let request = provider.last_checkout_request().unwrap();
        assert_eq!(request.user_id.as_str(), "u1");
        assert_eq!(request.email, "user@example.com");
        assert_eq!(request.price_id, "price_monthly");
        assert_eq!(request.trial_period_days, 14);
        assert!(request.allow_promotion_codes);
        assert_eq!(
            request.success_url,
            "https://app.example.com/success?session_id={CHECKOUT_SESSION_ID}"
        );
        assert_eq!(request.cancel_url, "https://app.example.com/cancel");
    }

    #[tokio::test]
    async fn missing_email_fails_without_provider_call() {
        let provider = MockPaymentProvider::new();

        let err = handler(&provider)
            .handle(command(None, Some("u1")))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_user_id_fails_without_provider_call() {
        let provider = MockPaymentProvider::new();

        let err = handler(&provider)
            .handle(command(Some("user@example.com"), Some("   ")))
            .await
            .unwrap_err();

        assert!(matches!(err, BillingError::ValidationFailed { ref field, .. } if field == "user_id"));
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_surfaces_message() {
        let provider = MockPaymentProvider::new();
        provider.set_error(PaymentError::provider("No such price: 'price_monthly'"));

        let err = handler(&provider)
            .handle(command(Some("user@example.com"), Some("u1")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "No such price: 'price_monthly'");
        assert!(!err.is_client_error());
    }
}
