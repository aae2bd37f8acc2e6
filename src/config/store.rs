//! Subscription store configuration
//!
//! The store URL selects the adapter: an `https://` URL is a Supabase
//! project reached over PostgREST, a `postgres://` URL is a direct
//! PostgreSQL connection.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Table created by the embedded migrations.
const MIGRATED_TABLE: &str = "subscriptions";

/// Which adapter the store URL selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Supabase,
    Postgres,
}

/// Subscription store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Supabase project URL or PostgreSQL connection URL
    pub url: String,

    /// Supabase service-role key; unused for PostgreSQL
    pub service_key: Option<SecretString>,

    /// Table holding one row per user
    #[serde(default = "default_table")]
    pub table: String,

    /// Minimum connections to maintain (PostgreSQL)
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Maximum connections allowed (PostgreSQL)
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,

    /// Idle connection timeout in seconds
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,

    /// Run migrations on startup (PostgreSQL). Only valid for the default table.
    #[serde(default)]
    pub run_migrations: bool,
}

impl StoreConfig {
    /// Adapter selected by the URL scheme
    pub fn backend(&self) -> Option<StoreBackend> {
        if self.url.starts_with("https://") || self.url.starts_with("http://") {
            Some(StoreBackend::Supabase)
        } else if self.url.starts_with("postgres://") || self.url.starts_with("postgresql://") {
            Some(StoreBackend::Postgres)
        } else {
            None
        }
    }

    /// Get acquire timeout as Duration
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// Get idle timeout as Duration
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// Validate store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.url.is_empty() {
            return Err(ValidationError::MissingRequired("STORE__URL"));
        }
        let backend = self.backend().ok_or(ValidationError::InvalidStoreUrl)?;

        if backend == StoreBackend::Supabase
            && self
                .service_key
                .as_ref()
                .map_or(true, |k| k.expose_secret().is_empty())
        {
            return Err(ValidationError::MissingRequired("STORE__SERVICE_KEY"));
        }

        if !is_identifier(&self.table) {
            return Err(ValidationError::InvalidTableName(self.table.clone()));
        }
        if backend == StoreBackend::Postgres && self.run_migrations && self.table != MIGRATED_TABLE {
            return Err(ValidationError::MigrationTableMismatch(self.table.clone()));
        }
        if self.min_connections > self.max_connections {
            return Err(ValidationError::InvalidPoolSize);
        }
        if self.max_connections > 100 {
            return Err(ValidationError::PoolSizeTooLarge);
        }
        Ok(())
    }
}

/// The table name is interpolated into SQL and URLs.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        && name.len() <= 63
}

fn default_table() -> String {
    MIGRATED_TABLE.to_string()
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, service_key: Option<&str>) -> StoreConfig {
        StoreConfig {
            url: url.to_string(),
            service_key: service_key.map(|k| SecretString::new(k.to_string())),
            table: default_table(),
            min_connections: default_min_connections(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            run_migrations: false,
        }
    }

    #[test]
    fn test_backend_from_scheme() {
        assert_eq!(
            config("https://abc.supabase.co", Some("k")).backend(),
            Some(StoreBackend::Supabase)
        );
        assert_eq!(
            config("postgres://localhost/billing", None).backend(),
            Some(StoreBackend::Postgres)
        );
        assert_eq!(
            config("postgresql://localhost/billing", None).backend(),
            Some(StoreBackend::Postgres)
        );
        assert_eq!(config("mysql://localhost", None).backend(), None);
    }

    #[test]
    fn test_supabase_requires_service_key() {
        assert_eq!(
            config("https://abc.supabase.co", None).validate(),
            Err(ValidationError::MissingRequired("STORE__SERVICE_KEY"))
        );
        assert!(config("https://abc.supabase.co", Some("k")).validate().is_ok());
    }

    #[test]
    fn test_postgres_needs_no_service_key() {
        assert!(config("postgres://localhost/billing", None).validate().is_ok());
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        assert_eq!(
            config("ftp://example.com", None).validate(),
            Err(ValidationError::InvalidStoreUrl)
        );
    }

    #[test]
    fn test_table_name_must_be_identifier() {
        let mut c = config("postgres://localhost/billing", None);
        c.table = "subscriptions; DROP TABLE users".to_string();
        assert!(matches!(c.validate(), Err(ValidationError::InvalidTableName(_))));

        c.table = "billing_subscriptions_v2".to_string();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_migrations_require_migrated_table() {
        let mut c = config("postgres://localhost/billing", None);
        c.table = "billing_subs".to_string();
        assert!(c.validate().is_ok());

        c.run_migrations = true;
        assert_eq!(
            c.validate(),
            Err(ValidationError::MigrationTableMismatch("billing_subs".to_string()))
        );

        c.table = MIGRATED_TABLE.to_string();
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_pool_size_validation() {
        let mut c = config("postgres://localhost/billing", None);
        c.min_connections = 10;
        c.max_connections = 5;
        assert_eq!(c.validate(), Err(ValidationError::InvalidPoolSize));

        c.min_connections = 1;
        c.max_connections = 150;
        assert_eq!(c.validate(), Err(ValidationError::PoolSizeTooLarge));
    }
}
