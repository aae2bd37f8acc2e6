//! Maps Stripe subscription objects onto the stored record shape.

use crate::domain::foundation::{Timestamp, UserId};

use super::record::SubscriptionRecord;
use super::stripe_objects::StripeSubscription;
use super::webhook_errors::WebhookError;

/// Metadata key carrying the external user id.
pub const USER_ID_METADATA_KEY: &str = "user_id";

/// Converts a provider epoch-seconds value into a timestamp.
///
/// Absent and zero both mean "not set".
pub fn safe_date(unix_secs: Option<i64>) -> Option<Timestamp> {
    unix_secs
        .filter(|secs| *secs != 0)
        .and_then(Timestamp::from_unix_secs)
}

/// Resolves the owning user id.
///
/// Event-level metadata (the checkout session's) wins over the
/// subscription's own metadata. Blank strings count as absent.
pub fn resolve_user_id(
    event_user_id: Option<&str>,
    subscription: &StripeSubscription,
) -> Result<UserId, WebhookError> {
    event_user_id
        .and_then(|id| UserId::new(id).ok())
        .or_else(|| {
            subscription
                .metadata_value(USER_ID_METADATA_KEY)
                .and_then(|id| UserId::new(id).ok())
        })
        .ok_or(WebhookError::MissingMetadata(USER_ID_METADATA_KEY))
}

/// Builds the full record for a subscription.
///
/// # Errors
///
/// - `MissingMetadata("user_id")` - no user id could be resolved
/// - `MissingField` - the subscription has no line items
pub fn map_subscription(
    subscription: &StripeSubscription,
    event_user_id: Option<&str>,
    processed_at: Timestamp,
) -> Result<SubscriptionRecord, WebhookError> {
    let user_id = resolve_user_id(event_user_id, subscription)?;
    let price_id = subscription
        .first_price_id()
        .ok_or(WebhookError::MissingField("items.data[0].price.id"))?;

    Ok(SubscriptionRecord {
        user_id,
        stripe_customer_id: subscription.customer.clone(),
        stripe_subscription_id: subscription.id.clone(),
        stripe_price_id: price_id.to_string(),
        status: subscription.status.clone(),
        current_period_start: safe_date(subscription.current_period_start),
        current_period_end: safe_date(subscription.current_period_end),
        trial_start: safe_date(subscription.trial_start),
        trial_end: safe_date(subscription.trial_end),
        cancel_at: safe_date(subscription.cancel_at),
        canceled_at: safe_date(subscription.canceled_at),
        updated_at: processed_at,
    })
}
