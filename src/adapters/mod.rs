//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `stripe` - Stripe REST API payment provider (plus a mock)
//! - `supabase` - Subscription store over PostgREST
//! - `postgres` - Subscription store over a direct database connection
//! - `memory` - In-memory subscription store
//! - `http` - Axum routes and handlers

pub mod http;
pub mod memory;
pub mod postgres;
pub mod stripe;
pub mod supabase;
