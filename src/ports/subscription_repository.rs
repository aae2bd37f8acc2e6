//! SubscriptionRepository port - Interface for the mirrored subscription table.
//!
//! The store holds exactly one row per user. Every write is an upsert with
//! `user_id` as the conflict target, so Stripe redelivering an event (or
//! delivering events out of order) never creates duplicates.

use async_trait::async_trait;

use crate::domain::billing::SubscriptionRecord;
use crate::domain::foundation::DomainError;

/// Repository port for subscription rows.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Inserts the record, or overwrites every column of the existing row
    /// for the same `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the store rejects or cannot receive the write.
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn subscription_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SubscriptionRepository) {}
    }
}
