//! Billing Relay server
//!
//! Wires configuration, the Stripe client, the subscription store and the
//! HTTP router, then serves until SIGINT or SIGTERM.

use std::sync::Arc;

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tokio::signal;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use billing_relay::adapters::http::{billing_router, BillingAppState};
use billing_relay::adapters::postgres::PostgresSubscriptionRepository;
use billing_relay::adapters::stripe::{StripeConfig, StripePaymentAdapter};
use billing_relay::adapters::supabase::{SupabaseConfig, SupabaseSubscriptionRepository};
use billing_relay::application::handlers::billing::CheckoutSettings;
use billing_relay::config::{AppConfig, ServerConfig, StoreBackend, StoreConfig};
use billing_relay::domain::billing::StripeWebhookVerifier;
use billing_relay::ports::SubscriptionRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(&config.server);

    info!("Starting Billing Relay v{}", env!("CARGO_PKG_VERSION"));
    config.validate().context("Invalid configuration")?;

    let http_client = reqwest::Client::builder()
        .timeout(config.server.upstream_timeout())
        .build()
        .context("Failed to build HTTP client")?;

    let stripe_config = StripeConfig::new(config.payment.stripe_secret_key.clone())
        .with_base_url(&config.payment.api_base_url)
        .with_api_version(&config.payment.api_version);
    let payment_provider = Arc::new(StripePaymentAdapter::with_client(
        stripe_config,
        http_client.clone(),
    ));
    if config.payment.is_live_mode() {
        info!("Stripe client configured in live mode");
    } else {
        info!("Stripe client configured in test mode");
    }

    let subscription_repository = build_repository(&config.store, http_client).await?;

    let webhook_verifier = Arc::new(
        StripeWebhookVerifier::new(config.payment.stripe_webhook_secret.clone())
            .with_require_livemode(config.payment.require_livemode),
    );

    let state = BillingAppState {
        payment_provider,
        subscription_repository,
        webhook_verifier,
        checkout_settings: CheckoutSettings {
            price_id: config.payment.stripe_price_id.clone(),
            trial_period_days: config.payment.trial_period_days,
            domain: config.app.domain().to_string(),
        },
    };

    let app = billing_router()
        .with_state(state)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http());
    let app = match cors_layer(&config.server) {
        Some(cors) => app.layer(cors),
        None => app,
    };

    let addr = config.server.socket_addr()?;
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_repository(
    store: &StoreConfig,
    http_client: reqwest::Client,
) -> anyhow::Result<Arc<dyn SubscriptionRepository>> {
    match store.backend() {
        Some(StoreBackend::Supabase) => {
            let service_key = store
                .service_key
                .clone()
                .context("Supabase store requires a service key")?;
            info!(table = %store.table, "Using Supabase subscription store");
            Ok(Arc::new(SupabaseSubscriptionRepository::with_client(
                SupabaseConfig::new(&store.url, service_key, &store.table),
                http_client,
            )))
        }
        Some(StoreBackend::Postgres) => {
            info!(
                "Connecting to database with pool size: {}-{}",
                store.min_connections, store.max_connections
            );
            let pool = PgPoolOptions::new()
                .min_connections(store.min_connections)
                .max_connections(store.max_connections)
                .acquire_timeout(store.acquire_timeout())
                .idle_timeout(store.idle_timeout())
                .connect(&store.url)
                .await
                .context("Failed to connect to database")?;
            info!("Database connection established");

            let repository = PostgresSubscriptionRepository::new(pool, &store.table);
            if store.run_migrations {
                repository.run_migrations().await?;
            }
            Ok(Arc::new(repository))
        }
        None => anyhow::bail!("Unsupported store URL scheme"),
    }
}

fn cors_layer(server: &ServerConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .into_iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods([Method::GET, Method::POST])
            .allow_headers([axum::http::header::CONTENT_TYPE]),
    )
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal"),
            Err(e) => error!(error = %e, "Failed to listen for Ctrl+C signal"),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received SIGTERM signal");
            }
            Err(e) => error!(error = %e, "Failed to listen for SIGTERM signal"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
