//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait against the Stripe REST API using
//! form-encoded requests, basic auth with the secret key, and a pinned
//! `Stripe-Version` header.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key).with_api_version("2023-10-16");
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::domain::billing::{StripeCheckoutSession, StripeSubscription};
use crate::ports::{
    CheckoutSession, CreateCheckoutRequest, CreatePortalRequest, PaymentError, PaymentErrorCode,
    PaymentProvider, PortalSession,
};

/// Default Stripe API host.
pub const DEFAULT_API_BASE_URL: &str = "https://api.stripe.com";

/// API version the payload types are written against.
pub const DEFAULT_API_VERSION: &str = "2023-10-16";

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,

    /// Value of the `Stripe-Version` header.
    api_version: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Pin a different API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }
}

/// Stripe error envelope: `{"error": {"message": ..., "code": ...}}`.
#[derive(Deserialize)]
struct StripeErrorResponse {
    error: StripeErrorBody,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    message: Option<String>,
    code: Option<String>,
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Create an adapter sharing an existing HTTP client.
    pub fn with_client(config: StripeConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .request(method, format!("{}{}", self.config.api_base_url, path))
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .header("Stripe-Version", &self.config.api_version)
    }

    /// Sends the request and decodes a 2xx body, mapping Stripe errors.
    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, PaymentError> {
        let response = builder
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(error_from_response(status, &error_text));
        }

        response.json().await.map_err(|e| {
            PaymentError::provider(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

/// Maps a non-2xx Stripe response onto a `PaymentError`.
fn error_from_response(status: reqwest::StatusCode, body: &str) -> PaymentError {
    let parsed = serde_json::from_str::<StripeErrorResponse>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|r| r.error.message.clone())
        .unwrap_or_else(|| format!("Stripe API error ({}): {}", status.as_u16(), body));

    let code = match status.as_u16() {
        401 | 403 => PaymentErrorCode::AuthenticationError,
        404 => PaymentErrorCode::NotFound,
        429 => PaymentErrorCode::RateLimitExceeded,
        400..=499 => PaymentErrorCode::InvalidRequest,
        _ => PaymentErrorCode::ProviderError,
    };

    let error = PaymentError::new(code, message);
    match parsed.and_then(|r| r.error.code) {
        Some(provider_code) => error.with_provider_code(provider_code),
        None => error,
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn create_checkout_session(
        &self,
        request: CreateCheckoutRequest,
    ) -> Result<CheckoutSession, PaymentError> {
        let user_id = request.user_id.to_string();
        let params = vec![
            ("mode", "subscription".to_string()),
            ("line_items[0][price]", request.price_id),
            ("line_items[0][quantity]", "1".to_string()),
            (
                "subscription_data[trial_period_days]",
                request.trial_period_days.to_string(),
            ),
            ("subscription_data[metadata][user_id]", user_id.clone()),
            ("metadata[user_id]", user_id),
            ("customer_email", request.email),
            ("success_url", request.success_url),
            ("cancel_url", request.cancel_url),
            (
                "allow_promotion_codes",
                request.allow_promotion_codes.to_string(),
            ),
        ];

        let session: StripeCheckoutSession = self
            .send(
                self.request(reqwest::Method::POST, "/v1/checkout/sessions")
                    .form(&params),
            )
            .await?;

        let url = session.url.ok_or_else(|| {
            PaymentError::provider(format!("Checkout session {} has no url", session.id))
        })?;

        Ok(CheckoutSession {
            id: session.id,
            url,
        })
    }

    async fn create_portal_session(
        &self,
        request: CreatePortalRequest,
    ) -> Result<PortalSession, PaymentError> {
        #[derive(Deserialize)]
        struct PortalSessionResponse {
            id: String,
            url: String,
        }

        let portal: PortalSessionResponse = self
            .send(
                self.request(reqwest::Method::POST, "/v1/billing_portal/sessions")
                    .form(&[
                        ("customer", request.customer_id.as_str()),
                        ("return_url", request.return_url.as_str()),
                    ]),
            )
            .await?;

        Ok(PortalSession {
            id: portal.id,
            url: portal.url,
        })
    }

    async fn retrieve_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<StripeSubscription, PaymentError> {
        let path = format!("/v1/subscriptions/{}", subscription_id);
        self.send(self.request(reqwest::Method::GET, &path)).await
    }
}
