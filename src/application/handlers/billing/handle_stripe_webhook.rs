//! HandleStripeWebhookHandler - Mirrors Stripe subscription events into the store.
//!
//! Only a failed verification rejects the delivery. Once an event is
//! authentic every outcome is acknowledged, and failures are logged with
//! enough context (including the full record) to replay them by hand.

use std::sync::Arc;

use crate::domain::billing::{
    map_subscription, BillingEvent, StripeSubscription, StripeWebhookVerifier, SubscriptionStatus,
    VerifiedEvent, WebhookError, USER_ID_METADATA_KEY,
};
use crate::domain::foundation::{Timestamp, UserId};
use crate::ports::{PaymentProvider, SubscriptionRepository};

/// Command to handle a Stripe webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleStripeWebhookCommand {
    /// Raw request body, exactly as received.
    pub payload: Vec<u8>,
    /// Value of the `stripe-signature` header, if sent.
    pub signature: Option<String>,
}

/// What happened to an authentic event.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// The subscription row for `user_id` was written.
    Upserted {
        user_id: UserId,
        subscription_id: String,
        status: SubscriptionStatus,
    },
    /// Nothing to do for this event.
    Ignored { reason: String },
    /// Processing failed; the event was acknowledged anyway.
    Dropped { error: WebhookError },
}

/// Handler for Stripe webhook deliveries.
pub struct HandleStripeWebhookHandler {
    verifier: Arc<StripeWebhookVerifier>,
    payment_provider: Arc<dyn PaymentProvider>,
    repository: Arc<dyn SubscriptionRepository>,
}

impl HandleStripeWebhookHandler {
    pub fn new(
        verifier: Arc<StripeWebhookVerifier>,
        payment_provider: Arc<dyn PaymentProvider>,
        repository: Arc<dyn SubscriptionRepository>,
    ) -> Self {
        Self {
            verifier,
            payment_provider,
            repository,
        }
    }

    /// Verifies the delivery and applies it.
    ///
    /// # Errors
    ///
    /// Only verification failures are returned; processing failures come
    /// back as `WebhookOutcome::Dropped`.
    pub async fn handle(
        &self,
        cmd: HandleStripeWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        let signature = cmd
            .signature
            .as_deref()
            .ok_or(WebhookError::MissingSignature)?;

        let verified = self
            .verifier
            .verify_and_parse(&cmd.payload, signature)
            .map_err(|error| {
                tracing::warn!(error = %error, "Rejected webhook delivery");
                error
            })?;

        let outcome = match self.process(&verified).await {
            Ok(outcome) => outcome,
            Err(error) => {
                tracing::error!(
                    event_id = %verified.id,
                    event_type = %verified.event_type,
                    retryable = error.is_retryable(),
                    error = %error,
                    "Webhook processing failed, acknowledging"
                );
                WebhookOutcome::Dropped { error }
            }
        };

        Ok(outcome)
    }

    async fn process(&self, verified: &VerifiedEvent) -> Result<WebhookOutcome, WebhookError> {
        match &verified.event {
            BillingEvent::CheckoutSessionCompleted(session) => {
                if !session.is_subscription_mode() {
                    return Ok(WebhookOutcome::Ignored {
                        reason: format!("checkout session in {} mode", session.mode),
                    });
                }

                let subscription_id = session
                    .subscription
                    .as_deref()
                    .ok_or(WebhookError::MissingField("subscription"))?;

                let subscription = self
                    .payment_provider
                    .retrieve_subscription(subscription_id)
                    .await
                    .map_err(|e| WebhookError::Provider {
                        message: e.to_string(),
                        retryable: e.retryable,
                    })?;

                self.upsert(
                    verified,
                    &subscription,
                    session.metadata_value(USER_ID_METADATA_KEY),
                )
                .await
            }
            BillingEvent::SubscriptionCreated(subscription)
            | BillingEvent::SubscriptionUpdated(subscription)
            | BillingEvent::SubscriptionDeleted(subscription) => {
                self.upsert(verified, subscription, None).await
            }
            BillingEvent::Ignored => {
                tracing::debug!(
                    event_id = %verified.id,
                    event_type = %verified.event_type,
                    "Ignoring unhandled event type"
                );
                Ok(WebhookOutcome::Ignored {
                    reason: format!("unhandled event type {}", verified.event_type),
                })
            }
        }
    }

    async fn upsert(
        &self,
        verified: &VerifiedEvent,
        subscription: &StripeSubscription,
        event_user_id: Option<&str>,
    ) -> Result<WebhookOutcome, WebhookError> {
        let record = map_subscription(subscription, event_user_id, Timestamp::now())?;

        if let Err(error) = self.repository.upsert(&record).await {
            tracing::error!(
                event_id = %verified.id,
                user_id = %record.user_id,
                subscription_id = %record.stripe_subscription_id,
                record = %serde_json::to_string(&record).unwrap_or_default(),
                error = %error,
                "Failed to store subscription"
            );
            return Err(WebhookError::Database(error.to_string()));
        }

        tracing::info!(
            event_id = %verified.id,
            event_type = %verified.event_type,
            user_id = %record.user_id,
            subscription_id = %record.stripe_subscription_id,
            status = %record.status,
            "Subscription stored"
        );

        Ok(WebhookOutcome::Upserted {
            user_id: record.user_id,
            subscription_id: record.stripe_subscription_id,
            status: record.status,
        })
    }
}
