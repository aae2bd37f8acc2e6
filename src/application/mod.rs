//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::billing::{
    CheckoutSettings, CreateCheckoutSessionCommand, CreateCheckoutSessionHandler,
    CreateCheckoutSessionResult, CreatePortalSessionCommand, CreatePortalSessionHandler,
    CreatePortalSessionResult, HandleStripeWebhookCommand, HandleStripeWebhookHandler,
    WebhookOutcome,
};
