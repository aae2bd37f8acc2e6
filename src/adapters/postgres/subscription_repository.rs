//! PostgreSQL implementation of SubscriptionRepository.
//!
//! Writes the mirrored subscription row with a single
//! `INSERT ... ON CONFLICT (user_id) DO UPDATE` statement.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::billing::SubscriptionRecord;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::SubscriptionRepository;

/// PostgreSQL implementation of the SubscriptionRepository port.
pub struct PostgresSubscriptionRepository {
    pool: PgPool,
    upsert_sql: String,
}

impl PostgresSubscriptionRepository {
    /// Creates a repository writing to `table`.
    ///
    /// The table name is interpolated into SQL; callers pass the validated
    /// configuration value, never request input.
    pub fn new(pool: PgPool, table: &str) -> Self {
        Self {
            pool,
            upsert_sql: upsert_sql(table),
        }
    }

    /// Runs the embedded migrations.
    pub async fn run_migrations(&self) -> Result<(), DomainError> {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Migration failed: {}", e)))?;
        tracing::info!("Database migrations completed");
        Ok(())
    }
}

fn upsert_sql(table: &str) -> String {
    format!(
        r#"
        INSERT INTO {table} (
            user_id, stripe_customer_id, stripe_subscription_id, stripe_price_id, status,
            current_period_start, current_period_end, trial_start, trial_end,
            cancel_at, canceled_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        ON CONFLICT (user_id) DO UPDATE SET
            stripe_customer_id = EXCLUDED.stripe_customer_id,
            stripe_subscription_id = EXCLUDED.stripe_subscription_id,
            stripe_price_id = EXCLUDED.stripe_price_id,
            status = EXCLUDED.status,
            current_period_start = EXCLUDED.current_period_start,
            current_period_end = EXCLUDED.current_period_end,
            trial_start = EXCLUDED.trial_start,
            trial_end = EXCLUDED.trial_end,
            cancel_at = EXCLUDED.cancel_at,
            canceled_at = EXCLUDED.canceled_at,
            updated_at = EXCLUDED.updated_at
        "#,
        table = table
    )
}

fn to_datetime(ts: &Option<Timestamp>) -> Option<chrono::DateTime<chrono::Utc>> {
    ts.map(|t| *t.as_datetime())
}

#[async_trait]
impl SubscriptionRepository for PostgresSubscriptionRepository {
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), DomainError> {
        sqlx::query(&self.upsert_sql)
            .bind(record.user_id.as_str())
            .bind(&record.stripe_customer_id)
            .bind(&record.stripe_subscription_id)
            .bind(&record.stripe_price_id)
            .bind(record.status.as_str())
            .bind(to_datetime(&record.current_period_start))
            .bind(to_datetime(&record.current_period_end))
            .bind(to_datetime(&record.trial_start))
            .bind(to_datetime(&record.trial_end))
            .bind(to_datetime(&record.cancel_at))
            .bind(to_datetime(&record.canceled_at))
            .bind(record.updated_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to upsert subscription: {}", e),
                )
                .with_detail("user_id", record.user_id.as_str())
            })?;

        Ok(())
    }
}
