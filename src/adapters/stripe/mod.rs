//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe:
//! - Checkout sessions (subscription mode, trial, promotion codes)
//! - Billing portal sessions
//! - Subscription retrieval for checkout completion events
//!
//! Webhook signature verification lives in `domain::billing` since it is
//! pure computation over the request bytes.

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use stripe_adapter::{
    StripeConfig, StripePaymentAdapter, DEFAULT_API_BASE_URL, DEFAULT_API_VERSION,
};
