//! Billing Relay - Stripe checkout issuer and subscription mirror
//!
//! Issues hosted checkout and billing-portal sessions, and keeps one
//! subscription row per user in sync with the signed webhook events Stripe
//! delivers.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
