//! Stripe API objects as they arrive in webhook payloads and API responses.
//!
//! Only fields the relay reads are captured; everything else Stripe sends
//! is ignored during deserialization.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use super::status::SubscriptionStatus;

// ════════════════════════════════════════════════════════════════════════════════
// Expandable references
// ════════════════════════════════════════════════════════════════════════════════

/// A reference Stripe renders either as a bare id or as the expanded object.
#[derive(Deserialize)]
#[serde(untagged)]
enum Expandable {
    Id(String),
    Object { id: String },
}

impl Expandable {
    fn into_id(self) -> String {
        match self {
            Expandable::Id(id) | Expandable::Object { id } => id,
        }
    }
}

fn expandable_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Expandable::deserialize(deserializer).map(Expandable::into_id)
}

fn optional_expandable_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Expandable>::deserialize(deserializer).map(|e| e.map(Expandable::into_id))
}

// ════════════════════════════════════════════════════════════════════════════════
// Subscription
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Subscription object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscription {
    /// Unique subscription identifier (sub_...).
    pub id: String,

    /// Customer owning this subscription (cus_...).
    #[serde(deserialize_with = "expandable_id")]
    pub customer: String,

    /// Subscription status.
    pub status: SubscriptionStatus,

    /// Current period start (Unix timestamp).
    pub current_period_start: Option<i64>,

    /// Current period end (Unix timestamp).
    pub current_period_end: Option<i64>,

    /// Trial start (Unix timestamp).
    pub trial_start: Option<i64>,

    /// Trial end (Unix timestamp).
    pub trial_end: Option<i64>,

    /// Scheduled cancellation (Unix timestamp).
    pub cancel_at: Option<i64>,

    /// When cancellation was requested (Unix timestamp).
    pub canceled_at: Option<i64>,

    /// Whether subscription cancels at period end.
    #[serde(default)]
    pub cancel_at_period_end: bool,

    /// Custom metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Subscription items (price/quantity pairs).
    #[serde(default)]
    pub items: StripeSubscriptionItems,
}

impl StripeSubscription {
    /// Returns the price id of the first line item, if any.
    pub fn first_price_id(&self) -> Option<&str> {
        self.items.data.first().map(|item| item.price.id.as_str())
    }

    /// Returns a non-empty metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        non_empty(&self.metadata, key)
    }
}

/// Subscription items container.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StripeSubscriptionItems {
    /// List of subscription items.
    #[serde(default)]
    pub data: Vec<StripeSubscriptionItem>,
}

/// Single subscription item.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeSubscriptionItem {
    /// Item ID (si_...).
    pub id: String,

    /// Price object.
    pub price: StripePrice,

    /// Item quantity.
    #[serde(default = "default_quantity")]
    pub quantity: i64,
}

fn default_quantity() -> i64 {
    1
}

/// Stripe Price object (embedded in subscription items).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripePrice {
    /// Price ID (price_...).
    pub id: String,

    /// Unit amount in cents.
    pub unit_amount: Option<i64>,

    /// Currency (lowercase).
    pub currency: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Checkout Session
// ════════════════════════════════════════════════════════════════════════════════

/// Stripe Checkout Session object.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeCheckoutSession {
    /// Unique session identifier (cs_...).
    pub id: String,

    /// Customer ID if a customer was created/attached.
    #[serde(default, deserialize_with = "optional_expandable_id")]
    pub customer: Option<String>,

    /// Customer email used during checkout.
    pub customer_email: Option<String>,

    /// Subscription created by the checkout, in subscription mode.
    #[serde(default, deserialize_with = "optional_expandable_id")]
    pub subscription: Option<String>,

    /// Payment mode (payment, setup, subscription).
    pub mode: String,

    /// Custom metadata attached to the session.
    #[serde(default)]
    pub metadata: HashMap<String, String>,

    /// Hosted checkout page URL (present while the session is open).
    pub url: Option<String>,
}

impl StripeCheckoutSession {
    /// Returns true when this checkout created a subscription.
    pub fn is_subscription_mode(&self) -> bool {
        self.mode == "subscription"
    }

    /// Returns a non-empty metadata value.
    pub fn metadata_value(&self, key: &str) -> Option<&str> {
        non_empty(&self.metadata, key)
    }
}

fn non_empty<'a>(metadata: &'a HashMap<String, String>, key: &str) -> Option<&'a str> {
    metadata
        .get(key)
        .map(String::as_str)
        .filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn subscription_json() -> serde_json::Value {
        json!({
            "id": "sub_123",
            "object": "subscription",
            "customer": "cus_456",
            "status": "trialing",
            "current_period_start": 1699395200,
            "current_period_end": 1700000000,
            "trial_start": 1699395200,
            "trial_end": 1700000000,
            "cancel_at": null,
            "canceled_at": null,
            "cancel_at_period_end": false,
            "metadata": {"user_id": "u1"},
            "items": {
                "object": "list",
                "data": [
                    {
                        "id": "si_1",
                        "price": {"id": "price_monthly", "unit_amount": 999, "currency": "eur"},
                        "quantity": 1
                    }
                ]
            }
        })
    }

    #[test]
    fn deserialize_subscription() {
        let sub: StripeSubscription = serde_json::from_value(subscription_json()).unwrap();

        assert_eq!(sub.id, "sub_123");
        assert_eq!(sub.customer, "cus_456");
        assert_eq!(sub.status, SubscriptionStatus::Trialing);
        assert_eq!(sub.trial_end, Some(1700000000));
        assert_eq!(sub.cancel_at, None);
        assert_eq!(sub.first_price_id(), Some("price_monthly"));
        assert_eq!(sub.metadata_value("user_id"), Some("u1"));
    }

    #[test]
    fn deserialize_subscription_with_expanded_customer() {
        let mut value = subscription_json();
        value["customer"] = json!({"id": "cus_expanded", "object": "customer"});

        let sub: StripeSubscription = serde_json::from_value(value).unwrap();

        assert_eq!(sub.customer, "cus_expanded");
    }

    #[test]
    fn deserialize_subscription_without_period_fields() {
        let sub: StripeSubscription = serde_json::from_value(json!({
            "id": "sub_min",
            "customer": "cus_min",
            "status": "active"
        }))
        .unwrap();

        assert!(sub.current_period_start.is_none());
        assert!(sub.current_period_end.is_none());
        assert!(sub.first_price_id().is_none());
        assert!(sub.metadata.is_empty());
    }

    #[test]
    fn empty_metadata_value_is_treated_as_absent() {
        let mut value = subscription_json();
        value["metadata"] = json!({"user_id": ""});

        let sub: StripeSubscription = serde_json::from_value(value).unwrap();

        assert_eq!(sub.metadata_value("user_id"), None);
    }

    #[test]
    fn deserialize_checkout_session() {
        let session: StripeCheckoutSession = serde_json::from_value(json!({
            "id": "cs_test",
            "object": "checkout.session",
            "customer": "cus_test",
            "customer_email": "user@example.com",
            "subscription": "sub_test",
            "mode": "subscription",
            "metadata": {"user_id": "u1"},
            "url": null
        }))
        .unwrap();

        assert!(session.is_subscription_mode());
        assert_eq!(session.subscription.as_deref(), Some("sub_test"));
        assert_eq!(session.metadata_value("user_id"), Some("u1"));
    }

    #[test]
    fn deserialize_payment_mode_checkout_session() {
        let session: StripeCheckoutSession = serde_json::from_value(json!({
            "id": "cs_pay",
            "mode": "payment",
            "subscription": null
        }))
        .unwrap();

        assert!(!session.is_subscription_mode());
        assert!(session.subscription.is_none());
        assert!(session.customer.is_none());
    }
}
