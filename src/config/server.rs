//! Listener settings and per-request budgets

use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use super::error::ValidationError;

/// Longest request budget accepted, in seconds.
const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Outbound calls a single request may chain (Stripe fetch, then store write).
const UPSTREAM_CALLS_PER_REQUEST: u32 = 2;

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address; must be an IP literal
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Selects JSON logs in production
    #[serde(default)]
    pub environment: Environment,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Whole-request budget enforced by the timeout layer
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Browser origins allowed to call the session endpoints (comma-separated)
    pub cors_origins: Option<String>,
}

/// Deployment environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl ServerConfig {
    /// Address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ValidationError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ValidationError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Budget for the whole inbound request.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Budget for one outbound HTTP call.
    ///
    /// Every chained call must finish inside the request budget, so a slow
    /// upstream surfaces as a handled error (and an acknowledged webhook)
    /// rather than a 408 from the timeout layer.
    pub fn upstream_timeout(&self) -> Duration {
        self.request_timeout() / (UPSTREAM_CALLS_PER_REQUEST + 1)
    }

    /// Parsed CORS origins; blank entries are skipped.
    pub fn cors_origins_list(&self) -> Vec<String> {
        self.cors_origins
            .as_deref()
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.port == 0 {
            return Err(ValidationError::InvalidPort);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > MAX_REQUEST_TIMEOUT_SECS {
            return Err(ValidationError::InvalidTimeout);
        }
        self.socket_addr()?;
        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            environment: Environment::default(),
            log_level: default_log_level(),
            request_timeout_secs: default_request_timeout(),
            cors_origins: None,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info,billing_relay=debug,sqlx=warn".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
