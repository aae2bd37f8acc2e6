//! Payment configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Stripe caps free trials at two years.
const MAX_TRIAL_PERIOD_DAYS: u32 = 730;

/// Payment configuration (Stripe)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (`sk_...` or restricted `rk_...`)
    pub stripe_secret_key: SecretString,

    /// Stripe webhook signing secret
    pub stripe_webhook_secret: SecretString,

    /// Price of the subscription plan sold at checkout
    pub stripe_price_id: String,

    /// Free trial attached to every new subscription
    #[serde(default = "default_trial_period_days")]
    pub trial_period_days: u32,

    /// Pinned `Stripe-Version` header
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Stripe API origin; overridden in tests
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Reject test-mode events
    #[serde(default)]
    pub require_livemode: bool,
}

impl PaymentConfig {
    /// Check if using a live-mode Stripe key
    pub fn is_live_mode(&self) -> bool {
        let key = self.stripe_secret_key.expose_secret();
        key.starts_with("sk_live_") || key.starts_with("rk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let key = self.stripe_secret_key.expose_secret();
        let webhook_secret = self.stripe_webhook_secret.expose_secret();

        if key.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_SECRET_KEY"));
        }
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_WEBHOOK_SECRET"));
        }
        if self.stripe_price_id.is_empty() {
            return Err(ValidationError::MissingRequired("STRIPE_PRICE_ID"));
        }

        if !key.starts_with("sk_") && !key.starts_with("rk_") {
            return Err(ValidationError::InvalidStripeKey);
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }
        if !self.stripe_price_id.starts_with("price_") {
            return Err(ValidationError::InvalidStripePriceId);
        }
        if self.trial_period_days == 0 || self.trial_period_days > MAX_TRIAL_PERIOD_DAYS {
            return Err(ValidationError::InvalidTrialPeriod);
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://") {
            return Err(ValidationError::InvalidApiBaseUrl);
        }

        Ok(())
    }
}

fn default_trial_period_days() -> u32 {
    14
}

fn default_api_version() -> String {
    "2023-10-16".to_string()
}

fn default_api_base_url() -> String {
    "https://api.stripe.com".to_string()
}
