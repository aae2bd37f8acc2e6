//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors)
//! - `billing` - Stripe events, signature verification and record mapping

pub mod billing;
pub mod foundation;
