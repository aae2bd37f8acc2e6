//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid store URL: expected https:// (Supabase) or postgres://")]
    InvalidStoreUrl,

    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Embedded migrations create table 'subscriptions', not '{0}'")]
    MigrationTableMismatch(String),

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid Stripe secret key format")]
    InvalidStripeKey,

    #[error("Invalid Stripe webhook secret format")]
    InvalidStripeWebhookSecret,

    #[error("Invalid Stripe price ID format")]
    InvalidStripePriceId,

    #[error("Trial period must be between 1 and 730 days")]
    InvalidTrialPeriod,

    #[error("Invalid Stripe API base URL")]
    InvalidApiBaseUrl,

    #[error("Invalid public domain: {0}")]
    InvalidDomain(String),
}
