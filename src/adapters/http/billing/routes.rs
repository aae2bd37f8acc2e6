//! Axum router configuration for billing endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_checkout_session, create_portal_session, handle_stripe_webhook, liveness,
    BillingAppState,
};

/// Create the billing API router.
///
/// # Routes
/// - `GET /` - Liveness text
/// - `POST /api/create-checkout-session` - Start a subscription checkout
/// - `POST /api/create-portal-session` - Open the billing portal
/// - `POST /webhook` - Handle Stripe webhooks (signature verified, raw body)
///
/// # Example
///
/// ```ignore
/// let app = billing_router().with_state(state);
/// ```
pub fn billing_router() -> Router<BillingAppState> {
    Router::new()
        .route("/", get(liveness))
        .route("/api/create-checkout-session", post(create_checkout_session))
        .route("/api/create-portal-session", post(create_portal_session))
        .route("/webhook", post(handle_stripe_webhook))
}
