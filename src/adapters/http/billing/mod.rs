//! HTTP adapter for billing endpoints.
//!
//! - `GET /` - Liveness text
//! - `POST /api/create-checkout-session` - Start subscription checkout
//! - `POST /api/create-portal-session` - Get Stripe customer portal URL
//! - `POST /webhook` - Handle Stripe webhooks

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{
    BillingApiError, BillingAppState, WebhookApiError, LIVENESS_MESSAGE, STRIPE_SIGNATURE_HEADER,
};
pub use routes::billing_router;
