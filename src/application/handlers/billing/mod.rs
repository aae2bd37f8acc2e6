//! Billing handlers.
//!
//! ## Commands
//! - Creating checkout sessions for the subscription plan
//! - Creating billing portal sessions
//! - Mirroring Stripe webhook events into the subscription store

mod create_checkout_session;
mod create_portal_session;
mod handle_stripe_webhook;

pub use create_checkout_session::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult,
};
pub use create_portal_session::{
    CreatePortalSessionCommand, CreatePortalSessionHandler, CreatePortalSessionResult,
};
pub use handle_stripe_webhook::{
    HandleStripeWebhookCommand, HandleStripeWebhookHandler, WebhookOutcome,
};
