//! Subscription status as reported by the payment provider.
//!
//! The relay mirrors the provider's lifecycle; it never validates
//! transitions, so unknown values are carried through verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Provider-defined subscription lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SubscriptionStatus {
    /// Initial payment attempt has not succeeded yet.
    Incomplete,

    /// Initial payment window lapsed without success.
    IncompleteExpired,

    /// In the free trial window.
    Trialing,

    /// Paid and current.
    Active,

    /// Latest invoice failed, provider is retrying.
    PastDue,

    /// Subscription was canceled.
    Canceled,

    /// Retries exhausted, invoice left open.
    Unpaid,

    /// Trial ended without a payment method.
    Paused,

    /// Any status this build does not know about.
    Other(String),
}

impl SubscriptionStatus {
    /// Returns the provider's wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Incomplete => "incomplete",
            Self::IncompleteExpired => "incomplete_expired",
            Self::Trialing => "trialing",
            Self::Active => "active",
            Self::PastDue => "past_due",
            Self::Canceled => "canceled",
            Self::Unpaid => "unpaid",
            Self::Paused => "paused",
            Self::Other(value) => value,
        }
    }

    /// Returns true for statuses after which the provider will not bill again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Canceled | Self::IncompleteExpired)
    }
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "incomplete" => Self::Incomplete,
            "incomplete_expired" => Self::IncompleteExpired,
            "trialing" => Self::Trialing,
            "active" => Self::Active,
            "past_due" => Self::PastDue,
            "canceled" => Self::Canceled,
            "unpaid" => Self::Unpaid,
            "paused" => Self::Paused,
            _ => Self::Other(value),
        }
    }
}

impl From<&str> for SubscriptionStatus {
    fn from(value: &str) -> Self {
        Self::from(value.to_string())
    }
}

impl From<SubscriptionStatus> for String {
    fn from(status: SubscriptionStatus) -> Self {
        match status {
            SubscriptionStatus::Other(value) => value,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
