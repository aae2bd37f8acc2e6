//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables with the
//! `config` and `dotenvy` crates. Variables use the `BILLING_RELAY` prefix
//! and `__` between nested keys.
//!
//! # Example
//!
//! ```no_run
//! use billing_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod app;
mod error;
mod payment;
mod server;
mod store;

pub use app::AppSection;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};
pub use store::{StoreBackend, StoreConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,

    /// Subscription store (Supabase or PostgreSQL)
    pub store: StoreConfig,

    /// Public front-end settings
    pub app: AppSection,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Loads `.env` if present, then reads variables with the
    /// `BILLING_RELAY` prefix:
    ///
    /// - `BILLING_RELAY__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `BILLING_RELAY__PAYMENT__STRIPE_SECRET_KEY=...` -> `payment.stripe_secret_key`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("BILLING_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for the first invalid value found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.payment.validate()?;
        self.store.validate()?;
        self.app.validate()?;
        Ok(())
    }
}
