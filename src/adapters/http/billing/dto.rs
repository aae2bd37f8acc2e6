//! Request and response bodies for the billing endpoints.
//!
//! Field names follow the public wire format used by existing frontends,
//! including the camelCase `customerId`.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/create-checkout-session`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateCheckoutSessionRequest {
    pub email: Option<String>,
    pub user_id: Option<String>,
}

/// Body of `POST /api/create-portal-session`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePortalSessionRequest {
    #[serde(rename = "customerId")]
    pub customer_id: Option<String>,
}

/// Hosted page the client should redirect to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUrlResponse {
    pub url: String,
}

/// Acknowledgment returned for every authentic webhook delivery.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookAckResponse {
    pub received: bool,
}

impl WebhookAckResponse {
    pub fn received() -> Self {
        Self { received: true }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
