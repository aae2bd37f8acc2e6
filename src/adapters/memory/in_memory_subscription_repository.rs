//! In-Memory Subscription Repository
//!
//! Keeps subscription rows in a map keyed by user id, which gives the same
//! one-row-per-user upsert semantics as the SQL adapters.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::billing::SubscriptionRecord;
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::SubscriptionRepository;

/// In-memory subscription store
#[derive(Debug, Clone)]
pub struct InMemorySubscriptionRepository {
    rows: Arc<RwLock<HashMap<UserId, SubscriptionRecord>>>,
    failure: Arc<RwLock<Option<String>>>,
    upserts: Arc<AtomicUsize>,
}

impl InMemorySubscriptionRepository {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            failure: Arc::new(RwLock::new(None)),
            upserts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make every subsequent upsert fail with the given message
    pub async fn fail_with(&self, message: impl Into<String>) {
        *self.failure.write().await = Some(message.into());
    }

    /// Get the row for a user
    pub async fn get(&self, user_id: &str) -> Option<SubscriptionRecord> {
        let user_id = UserId::new(user_id).ok()?;
        self.rows.read().await.get(&user_id).cloned()
    }

    /// Number of successful upserts, including overwrites
    pub fn upsert_count(&self) -> usize {
        self.upserts.load(Ordering::SeqCst)
    }

    /// Number of stored rows
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    /// True when nothing has been written
    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl Default for InMemorySubscriptionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), DomainError> {
        if let Some(message) = self.failure.read().await.as_ref() {
            return Err(DomainError::database(message.clone()));
        }

        self.rows
            .write()
            .await
            .insert(record.user_id.clone(), record.clone());
        self.upserts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::SubscriptionStatus;
    use crate::domain::foundation::Timestamp;

    fn record(status: SubscriptionStatus, updated_at: i64) -> SubscriptionRecord {
        SubscriptionRecord {
            user_id: UserId::new("u1").unwrap(),
            stripe_customer_id: "cus_1".to_string(),
            stripe_subscription_id: "sub_1".to_string(),
            stripe_price_id: "price_1".to_string(),
            status,
            current_period_start: None,
            current_period_end: None,
            trial_start: None,
            trial_end: None,
            cancel_at: None,
            canceled_at: None,
            updated_at: Timestamp::from_unix_secs(updated_at).unwrap(),
        }
    }

    #[tokio::test]
    async fn upsert_inserts_new_row() {
        let repo = InMemorySubscriptionRepository::new();

        repo.upsert(&record(SubscriptionStatus::Trialing, 1)).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert_eq!(
            repo.get("u1").await.unwrap().status,
            SubscriptionStatus::Trialing
        );
    }

    #[tokio::test]
    async fn upsert_twice_keeps_one_row_equal_to_second_write() {
        let repo = InMemorySubscriptionRepository::new();
        let second = record(SubscriptionStatus::Active, 2);

        repo.upsert(&record(SubscriptionStatus::Trialing, 1)).await.unwrap();
        repo.upsert(&second).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.upsert_count(), 2);
        assert_eq!(repo.get("u1").await.unwrap(), second);
    }

    #[tokio::test]
    async fn same_record_twice_is_idempotent() {
        let repo = InMemorySubscriptionRepository::new();
        let row = record(SubscriptionStatus::Active, 5);

        repo.upsert(&row).await.unwrap();
        repo.upsert(&row).await.unwrap();

        assert_eq!(repo.len().await, 1);
        assert_eq!(repo.get("u1").await.unwrap(), row);
    }

    #[tokio::test]
    async fn injected_failure_writes_nothing() {
        let repo = InMemorySubscriptionRepository::new();
        repo.fail_with("connection reset").await;

        let err = repo
            .upsert(&record(SubscriptionStatus::Active, 1))
            .await
            .unwrap_err();

        assert!(err.message.contains("connection reset"));
        assert!(repo.is_empty().await);
        assert_eq!(repo.upsert_count(), 0);
    }
}
