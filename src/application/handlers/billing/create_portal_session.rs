//! CreatePortalSessionHandler - Issues a Stripe billing portal session.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::ports::{CreatePortalRequest, PaymentProvider};

/// Command to open the billing portal for a customer.
#[derive(Debug, Clone, Default)]
pub struct CreatePortalSessionCommand {
    pub customer_id: Option<String>,
}

/// Result of a created portal session.
#[derive(Debug, Clone)]
pub struct CreatePortalSessionResult {
    pub url: String,
}

/// Handler for billing portal session creation.
pub struct CreatePortalSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
    return_url: String,
}

impl CreatePortalSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>, return_url: impl Into<String>) -> Self {
        Self {
            payment_provider,
            return_url: return_url.into(),
        }
    }

    pub async fn handle(
        &self,
        cmd: CreatePortalSessionCommand,
    ) -> Result<CreatePortalSessionResult, BillingError> {
        let customer_id = cmd
            .customer_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| BillingError::validation("customerId", "customerId is required"))?;

        let portal = self
            .payment_provider
            .create_portal_session(CreatePortalRequest {
                customer_id: customer_id.clone(),
                return_url: self.return_url.clone(),
            })
            .await
            .map_err(|e| {
                tracing::error!(customer_id = %customer_id, error = %e, "Failed to create portal session");
                BillingError::provider(e.message, e.retryable)
            })?;

        Ok(CreatePortalSessionResult { url: portal.url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;
    use crate::ports::PaymentError;

    fn handler(provider: &MockPaymentProvider) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(Arc::new(provider.clone()), "https://app.example.com")
    }

    #[tokio::test]
    async fn creates_portal_session_returning_to_domain() {
        let provider = MockPaymentProvider::new();

        let result = handler(&provider)
            .handle(CreatePortalSessionCommand {
                customer_id: Some("cus_1".to_string()),
            })
            .await
            .unwrap();

        assert!(result.url.contains("bps_mock_cus_1"));
        let call = &provider.calls()[0];
        assert_eq!(call.method, "create_portal_session");
        assert_eq!(call.args, vec!["cus_1", "https://app.example.com"]);
    }

    #[tokio::test]
    async fn missing_customer_id_fails_without_provider_call() {
        let provider = MockPaymentProvider::new();

        let err = handler(&provider)
            .handle(CreatePortalSessionCommand::default())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "customerId is required");
        assert!(provider.calls().is_empty());
    }

    #[tokio::test]
    async fn provider_failure_is_server_error() {
        let provider = MockPaymentProvider::new();
        provider.set_error(PaymentError::not_found("Customer cus_x"));

        let err = handler(&provider)
            .handle(CreatePortalSessionCommand {
                customer_id: Some("cus_x".to_string()),
            })
            .await
            .unwrap_err();

        assert!(!err.is_client_error());
        assert_eq!(err.to_string(), "Customer cus_x not found");
    }
}
