//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSubscriptionRepository` - Upsert of the mirrored subscription row

mod subscription_repository;

pub use subscription_repository::PostgresSubscriptionRepository;
