//! Supabase (PostgREST) implementation of SubscriptionRepository.
//!
//! Upserts go through the REST endpoint with the service-role key:
//! `POST {url}/rest/v1/{table}?on_conflict=user_id` and
//! `Prefer: resolution=merge-duplicates` so PostgREST turns the insert into
//! `INSERT ... ON CONFLICT (user_id) DO UPDATE`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::domain::billing::SubscriptionRecord;
use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::SubscriptionRepository;

/// Connection settings for a Supabase project.
#[derive(Clone)]
pub struct SupabaseConfig {
    /// Project URL (https://<ref>.supabase.co).
    url: String,

    /// Service-role key; bypasses row level security.
    service_key: SecretString,

    /// Target table.
    table: String,
}

impl SupabaseConfig {
    /// Create a new Supabase configuration.
    pub fn new(url: impl Into<String>, service_key: SecretString, table: impl Into<String>) -> Self {
        Self {
            url: url.into().trim_end_matches('/').to_string(),
            service_key,
            table: table.into(),
        }
    }

    fn upsert_url(&self) -> String {
        format!("{}/rest/v1/{}?on_conflict=user_id", self.url, self.table)
    }
}

/// Supabase implementation of the SubscriptionRepository port.
pub struct SupabaseSubscriptionRepository {
    config: SupabaseConfig,
    http_client: reqwest::Client,
}

impl SupabaseSubscriptionRepository {
    /// Creates a repository with its own HTTP client.
    pub fn new(config: SupabaseConfig) -> Self {
        Self::with_client(config, reqwest::Client::new())
    }

    /// Creates a repository sharing an existing HTTP client.
    pub fn with_client(config: SupabaseConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }
}

#[async_trait]
impl SubscriptionRepository for SupabaseSubscriptionRepository {
    async fn upsert(&self, record: &SubscriptionRecord) -> Result<(), DomainError> {
        let key = self.config.service_key.expose_secret();

        let response = self
            .http_client
            .post(self.config.upsert_url())
            .header("apikey", key.as_str())
            .bearer_auth(key)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(record)
            .send()
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to reach Supabase: {}", e),
                )
                .with_detail("user_id", record.user_id.as_str())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to upsert subscription: {}", body),
            )
            .with_detail("status", status.as_u16().to_string())
            .with_detail("user_id", record.user_id.as_str()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::SubscriptionStatus;
    use crate::domain::foundation::{Timestamp, UserId};
    use mockito::Matcher;

    fn record() -> SubscriptionRecord {
        SubscriptionRecord {
            user_id: UserId::new("u1").unwrap(),
            stripe_customer_id: "cus_1".to_string(),
            stripe_subscription_id: "sub_1".to_string(),
            stripe_price_id: "price_1".to_string(),
            status: SubscriptionStatus::Trialing,
            current_period_start: None,
            current_period_end: None,
            trial_start: None,
            trial_end: Timestamp::from_unix_secs(1_700_000_000),
            cancel_at: None,
            canceled_at: None,
            updated_at: Timestamp::from_unix_secs(1_700_000_100).unwrap(),
        }
    }

    fn repository(server: &mockito::Server) -> SupabaseSubscriptionRepository {
        SupabaseSubscriptionRepository::new(SupabaseConfig::new(
            format!("{}/", server.url()),
            SecretString::new("service-role-key".to_string()),
            "subscriptions",
        ))
    }

    #[tokio::test]
    async fn upsert_posts_record_with_merge_duplicates() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/subscriptions")
            .match_query(Matcher::UrlEncoded("on_conflict".into(), "user_id".into()))
            .match_header("apikey", "service-role-key")
            .match_header("authorization", "Bearer service-role-key")
            .match_header("prefer", "resolution=merge-duplicates,return=minimal")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "user_id": "u1",
                "status": "trialing",
                "trial_end": "2023-11-14T22:13:20.000Z",
                "cancel_at": null
            })))
            .with_status(201)
            .create_async()
            .await;

        repository(&server).upsert(&record()).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn upsert_failure_maps_to_database_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/subscriptions")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let err = repository(&server).upsert(&record()).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains("Invalid API key"));
        assert_eq!(err.details.get("status"), Some(&"401".to_string()));
        assert_eq!(err.details.get("user_id"), Some(&"u1".to_string()));
    }

    #[test]
    fn upsert_url_includes_conflict_target() {
        let config = SupabaseConfig::new(
            "https://abc.supabase.co/",
            SecretString::new("k".to_string()),
            "subscriptions",
        );
        assert_eq!(
            config.upsert_url(),
            "https://abc.supabase.co/rest/v1/subscriptions?on_conflict=user_id"
        );
    }
}
