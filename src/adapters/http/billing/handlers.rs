//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to application layer command handlers.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::application::handlers::billing::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreatePortalSessionCommand, CreatePortalSessionHandler, HandleStripeWebhookCommand,
    HandleStripeWebhookHandler,
};
use crate::domain::billing::{BillingError, StripeWebhookVerifier, WebhookError};
use crate::ports::{PaymentProvider, SubscriptionRepository};

use super::dto::{
    CreateCheckoutSessionRequest, CreatePortalSessionRequest, ErrorResponse, SessionUrlResponse,
    WebhookAckResponse,
};

/// Header carrying the Stripe webhook signature.
pub const STRIPE_SIGNATURE_HEADER: &str = "stripe-signature";

/// Plain-text body of the liveness route.
pub const LIVENESS_MESSAGE: &str = "Billing relay is up";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned for each request; every dependency is Arc-wrapped and built once
/// at startup.
#[derive(Clone)]
pub struct BillingAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub subscription_repository: Arc<dyn SubscriptionRepository>,
    pub webhook_verifier: Arc<StripeWebhookVerifier>,
    pub checkout_settings: CheckoutSettings,
}

impl BillingAppState {
    /// Create handlers on demand from the shared state.
    pub fn checkout_handler(&self) -> CreateCheckoutSessionHandler {
        CreateCheckoutSessionHandler::new(
            self.payment_provider.clone(),
            self.checkout_settings.clone(),
        )
    }

    pub fn portal_handler(&self) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(
            self.payment_provider.clone(),
            self.checkout_settings.domain.clone(),
        )
    }

    pub fn webhook_handler(&self) -> HandleStripeWebhookHandler {
        HandleStripeWebhookHandler::new(
            self.webhook_verifier.clone(),
            self.payment_provider.clone(),
            self.subscription_repository.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET / - Liveness check
pub async fn liveness() -> &'static str {
    LIVENESS_MESSAGE
}

/// POST /api/create-checkout-session - Start a subscription checkout
pub async fn create_checkout_session(
    State(state): State<BillingAppState>,
    body: Result<Json<CreateCheckoutSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BillingApiError> {
    let Json(request) = body?;

    let result = state
        .checkout_handler()
        .handle(CreateCheckoutSessionCommand {
            email: request.email,
            user_id: request.user_id,
        })
        .await?;

    Ok(Json(SessionUrlResponse { url: result.url }))
}

/// POST /api/create-portal-session - Open the billing portal
pub async fn create_portal_session(
    State(state): State<BillingAppState>,
    body: Result<Json<CreatePortalSessionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, BillingApiError> {
    let Json(request) = body?;

    let result = state
        .portal_handler()
        .handle(CreatePortalSessionCommand {
            customer_id: request.customer_id,
        })
        .await?;

    Ok(Json(SessionUrlResponse { url: result.url }))
}

/// POST /webhook - Handle Stripe webhooks
///
/// The body is taken as raw bytes; it must reach the verifier unmodified.
pub async fn handle_stripe_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: axum::body::Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get(STRIPE_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let cmd = HandleStripeWebhookCommand {
        payload: body.to_vec(),
        signature,
    };

    state.webhook_handler().handle(cmd).await?;

    Ok(Json(WebhookAckResponse::received()))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts session errors to HTTP responses.
#[derive(Debug)]
pub struct BillingApiError(BillingError);

impl From<BillingError> for BillingApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for BillingApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(BillingError::validation("body", rejection.body_text()))
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            BillingError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
            BillingError::Provider { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

/// Rejected webhook delivery, answered with a plain-text body.
#[derive(Debug)]
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> Response {
        (self.0.status_code(), format!("Webhook error: {}", self.0)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn validation_error_maps_to_400_json() {
        let response =
            BillingApiError::from(BillingError::validation("email", "email and user_id are required"))
                .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"email and user_id are required"}"#
        );
    }

    #[tokio::test]
    async fn provider_error_maps_to_500_json() {
        let response =
            BillingApiError::from(BillingError::provider("No such customer", false)).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, r#"{"error":"No such customer"}"#);
    }

    #[tokio::test]
    async fn webhook_error_maps_to_400_text() {
        let response = WebhookApiError::from(WebhookError::InvalidSignature).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, "Webhook error: Invalid signature");
    }
}
