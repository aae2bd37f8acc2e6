//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Hosted checkout/portal sessions and subscription lookup
//! - `SubscriptionRepository` - Upsert of the mirrored subscription row

mod payment_provider;
mod subscription_repository;

pub use payment_provider::{
    CheckoutSession, CreateCheckoutRequest, CreatePortalRequest, PaymentError, PaymentErrorCode,
    PaymentProvider, PortalSession,
};
pub use subscription_repository::SubscriptionRepository;
