//! LearnHub access service entry point.
//!
//! Loads configuration, connects to PostgreSQL, wires the Policy Gate and
//! serves the entitlement API.

use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use sqlx::PgPool;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use learnhub_access::adapters::auth::{JwtConfig, JwtSessionValidator};
use learnhub_access::adapters::http::{api_router, AuthState, EntitlementsAppState};
use learnhub_access::adapters::postgres::PostgresEntitlementStore;
use learnhub_access::application::access::{
    PolicyGate, ResourceAccessEvaluator, SubscriptionResolver, UsageCounter,
};
use learnhub_access::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server);
    info!(
        environment = ?config.server.environment,
        enforce_ownership = config.features.enforce_ownership,
        "Starting learnhub-access"
    );

    let pool: PgPool = config
        .database
        .pool_options()
        .connect(&config.database.url)
        .await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database migrations applied");
    }

    let store = Arc::new(PostgresEntitlementStore::new(pool));
    let resolver = SubscriptionResolver::new(store.clone());
    let usage = UsageCounter::new(store.clone());
    let evaluator = ResourceAccessEvaluator::new(store.clone(), usage.clone());

    let mut gate = PolicyGate::new(resolver.clone(), Arc::new(evaluator));
    if config.features.enforce_ownership {
        gate = gate.with_ownership(store);
    }

    let state = EntitlementsAppState {
        gate: Arc::new(gate),
        resolver,
        usage,
        verbose_errors: config.features.verbose_errors,
    };
    let validator: AuthState = Arc::new(JwtSessionValidator::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.issuer.clone(),
        config.auth.audience.clone(),
    )));

    let mut app = api_router(state, validator)
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(cors_layer(&config.server));
    if config.features.enable_tracing {
        app = app.layer(TraceLayer::new_for_http());
    }
    let app = app
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&server.log_level));

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_methods([Method::GET])
        .allow_headers([axum::http::header::AUTHORIZATION, axum::http::header::CONTENT_TYPE])
        .allow_origin(AllowOrigin::list(origins))
}
