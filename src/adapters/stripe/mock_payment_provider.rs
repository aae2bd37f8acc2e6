//! Mock payment provider for testing.
//!
//! Provides a configurable implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured subscriptions for retrieval
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::billing::StripeSubscription;
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreatePortalRequest, PaymentError, PaymentProvider,
    PortalSession,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
/// mock.add_subscription(subscription);
/// mock.set_method_error("create_portal_session", PaymentError::network("down"));
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Subscriptions returned by `retrieve_subscription`, by ID.
    subscriptions: HashMap<String, StripeSubscription>,

    /// Last checkout request received, for parameter assertions.
    last_checkout: Option<CreateCheckoutRequest>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a subscription to the "provider".
    pub fn add_subscription(&self, subscription: StripeSubscription) {
        let id = subscription.id.clone();
        self.state().subscriptions.insert(id, subscription);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    /// Clear all configured errors.
    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    /// Returns the last checkout request received.
    pub fn last_checkout_request(&self) -> Option<CreateCheckoutRequest> {
        self.state().last_checkout.clone()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        // Method-specific errors are sticky
        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        self.record_call(
            "create_checkout_session",
            vec![request.user_id.to_string(), request.email.clone()],
        );
        self.check_error("create_checkout_session")?;

        let id = format!("cs_mock_{}", request.user_id);
        self.state().last_checkout = Some(request);

        Ok(CheckoutSession {
            url: format!("https://checkout.stripe.com/c/pay/{}", id),
            id,
        })
    }

    async fn create_portal_session(
        &self,
        request: CreatePortalRequest,
    ) -> Result<PortalSession, PaymentError> {
        self.record_call(
            "create_portal_session",
            vec![request.customer_id.clone(), request.return_url.clone()],
        );
        self.check_error("create_portal_session")?;

        let id = format!("bps_mock_{}", request.customer_id);
        Ok(PortalSession {
            url: format!("https://billing.stripe.com/p/session/{}", id),
            id,
        })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<StripeSubscription, PaymentError> {
        self.record_call("retrieve_subscription", vec![subscription_id.to_string()]);
        self.check_error("retrieve_subscription")?;

        self.state()
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found(&format!("Subscription {}", subscription_id)))
    }
}
