//! Billing domain module.
//!
//! Stripe webhook verification, typed events and the mapping from Stripe
//! subscriptions to the stored subscription record.
//!
//! # Module Structure
//!
//! - `status` - Provider subscription status
//! - `stripe_objects` - Subscription and checkout session payloads
//! - `stripe_event` - Event envelope and typed `BillingEvent`
//! - `webhook_verifier` - HMAC-SHA256 signature verification
//! - `field_mapper` - Subscription to `SubscriptionRecord` mapping
//! - `record` - The persisted row
//! - `errors` - Session issuing errors

mod errors;
mod field_mapper;
mod record;
mod status;
mod stripe_event;
mod stripe_objects;
mod webhook_errors;
mod webhook_verifier;

pub use errors::BillingError;
pub use field_mapper::{map_subscription, resolve_user_id, safe_date, USER_ID_METADATA_KEY};
pub use record::SubscriptionRecord;
pub use status::SubscriptionStatus;
pub use stripe_event::{BillingEvent, StripeEvent, StripeEventData, StripeEventType, VerifiedEvent};
pub use stripe_objects::{
    StripeCheckoutSession, StripePrice, StripeSubscription, StripeSubscriptionItem,
    StripeSubscriptionItems,
};
pub use webhook_errors::WebhookError;
pub use webhook_verifier::{sign_payload, SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub(crate) use stripe_event::StripeEventBuilder;
