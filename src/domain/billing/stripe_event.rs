//! Stripe webhook event types.
//!
//! Defines the envelope for parsing Stripe webhook payloads and the typed
//! `BillingEvent` the reconciler dispatches on.

use serde::{Deserialize, Serialize};

use super::stripe_objects::{StripeCheckoutSession, StripeSubscription};
use super::webhook_errors::WebhookError;

/// Stripe webhook event envelope (simplified).
///
/// Contains the essential fields needed for webhook processing.
/// Additional fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    #[serde(default)]
    pub livemode: bool,

    /// API version used to render this event.
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        T::deserialize(&self.data.object)
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> StripeEventType {
        StripeEventType::from_type_str(&self.event_type)
    }

    /// Decodes the polymorphic data object into a typed billing event.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedPayload` when the object does not
    /// match the shape its declared event type requires.
    pub fn to_billing_event(&self) -> Result<BillingEvent, WebhookError> {
        let malformed = |e: serde_json::Error| {
            WebhookError::MalformedPayload(format!("{} object: {}", self.event_type, e))
        };

        Ok(match self.parsed_type() {
            StripeEventType::CheckoutSessionCompleted => {
                BillingEvent::CheckoutSessionCompleted(self.deserialize_object().map_err(malformed)?)
            }
            StripeEventType::CustomerSubscriptionCreated => {
                BillingEvent::SubscriptionCreated(self.deserialize_object().map_err(malformed)?)
            }
            StripeEventType::CustomerSubscriptionUpdated => {
                BillingEvent::SubscriptionUpdated(self.deserialize_object().map_err(malformed)?)
            }
            StripeEventType::CustomerSubscriptionDeleted => {
                BillingEvent::SubscriptionDeleted(self.deserialize_object().map_err(malformed)?)
            }
            StripeEventType::Unknown => BillingEvent::Ignored,
        })
    }
}

/// Known Stripe event types that we handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StripeEventType {
    /// Checkout session completed successfully.
    CheckoutSessionCompleted,
    /// Customer subscription was created.
    CustomerSubscriptionCreated,
    /// Customer subscription was updated.
    CustomerSubscriptionUpdated,
    /// Customer subscription was deleted.
    CustomerSubscriptionDeleted,
    /// Unknown or unhandled event type.
    Unknown,
}

impl StripeEventType {
    /// Parse event type from string.
    pub fn from_type_str(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "customer.subscription.created" => Self::CustomerSubscriptionCreated,
            "customer.subscription.updated" => Self::CustomerSubscriptionUpdated,
            "customer.subscription.deleted" => Self::CustomerSubscriptionDeleted,
            _ => Self::Unknown,
        }
    }
}

/// A verified webhook event decoded into one variant per handled type.
#[derive(Debug, Clone)]
pub enum BillingEvent {
    /// A hosted checkout finished; may or may not have created a subscription.
    CheckoutSessionCompleted(StripeCheckoutSession),
    /// A subscription was created.
    SubscriptionCreated(StripeSubscription),
    /// A subscription changed (status, period, cancellation schedule...).
    SubscriptionUpdated(StripeSubscription),
    /// A subscription ended. Still mirrored as a status update.
    SubscriptionDeleted(StripeSubscription),
    /// Any event type the relay does not act on.
    Ignored,
}

/// A webhook event whose signature has been verified.
#[derive(Debug, Clone)]
pub struct VerifiedEvent {
    /// Event id (evt_...).
    pub id: String,
    /// Raw event type string, kept for logging.
    pub event_type: String,
    /// Whether the event came from live mode.
    pub livemode: bool,
    /// The decoded event.
    pub event: BillingEvent,
}

impl TryFrom<StripeEvent> for VerifiedEvent {
    type Error = WebhookError;

    fn try_from(envelope: StripeEvent) -> Result<Self, Self::Error> {
        let event = envelope.to_billing_event()?;
        Ok(Self {
            id: envelope.id,
            event_type: envelope.event_type,
            livemode: envelope.livemode,
            event,
        })
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "checkout.session.completed".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: None,
            },
            livemode: self.livemode,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}
