//! Stripe webhook signature verification.
//!
//! Implements verification of Stripe `v1` webhook signatures using HMAC-SHA256
//! over the exact request bytes, with a replay window on the signed timestamp.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::{StripeEvent, VerifiedEvent};
use super::webhook_errors::WebhookError;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signatures (HMAC-SHA256). Several are sent while a secret is rolled.
    pub v1_signatures: Vec<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...]`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedPayload` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures = Vec::new();

        for part in header.split(',') {
            let (key, value) = part.trim().split_once('=').ok_or_else(|| {
                WebhookError::MalformedPayload("invalid signature header format".to_string())
            })?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::MalformedPayload("invalid signature timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::MalformedPayload("invalid v1 signature hex".to_string())
                    })?);
                }
                // v0 and future schemes are not verified
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            WebhookError::MalformedPayload("missing signature timestamp".to_string())
        })?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::MalformedPayload(
                "missing v1 signature".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    /// The webhook signing secret (whsec_...).
    secret: SecretString,
    /// Reject events not sent in live mode.
    require_livemode: bool,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: SecretString) -> Self {
        Self {
            secret,
            require_livemode: false,
        }
    }

    /// Rejects test-mode events when enabled.
    pub fn with_require_livemode(mut self, require_livemode: bool) -> Self {
        self.require_livemode = require_livemode;
        self
    }

    /// Verifies the webhook signature against the current time and decodes the event.
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` - No v1 signature matches the payload
    /// - `TimestampOutOfRange` - Event is older than 5 minutes
    /// - `InvalidTimestamp` - Event timestamp is in the future
    /// - `MalformedPayload` - Failed to parse header or JSON payload
    /// - `LivemodeRequired` - Test event while live mode is required
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<VerifiedEvent, WebhookError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify_and_parse`](Self::verify_and_parse) with an explicit clock.
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature_header: &str,
        now: i64,
    ) -> Result<VerifiedEvent, WebhookError> {
        let header = SignatureHeader::parse(signature_header)?;

        validate_timestamp(header.timestamp, now)?;

        let expected = compute_signature(
            self.secret.expose_secret().as_bytes(),
            header.timestamp,
            payload,
        )?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        let envelope: StripeEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

        if self.require_livemode && !envelope.is_live() {
            return Err(WebhookError::LivemodeRequired);
        }

        VerifiedEvent::try_from(envelope)
    }
}

/// Computes HMAC-SHA256 over `{timestamp}.{payload}` without re-encoding the body.
fn compute_signature(
    secret: &[u8],
    timestamp: i64,
    payload: &[u8],
) -> Result<Vec<u8>, WebhookError> {
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret).map_err(|_| WebhookError::InvalidSignature)?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// Validates that the timestamp is within acceptable bounds.
fn validate_timestamp(timestamp: i64, now: i64) -> Result<(), WebhookError> {
    let age = now - timestamp;

    if age > MAX_EVENT_AGE_SECS {
        return Err(WebhookError::TimestampOutOfRange);
    }

    if age < -MAX_CLOCK_SKEW_SECS {
        return Err(WebhookError::InvalidTimestamp);
    }

    Ok(())
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Builds a `stripe-signature` header value the way Stripe signs deliveries.
///
/// Used by test fixtures and local tooling that replays events.
pub fn sign_payload(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
    let signature = compute_signature(secret.as_bytes(), timestamp, payload)?;
    Ok(format!("t={},v1={}", timestamp, hex::encode(signature)))
}
