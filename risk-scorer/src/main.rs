//! Risk scorer service entry point.

use std::sync::Arc;

use amfa_core::environment::SystemClock;
use amfa_core::event_bus::EventBus;
use amfa_postgres::PoolConfig;
use amfa_redpanda::RedpandaEventBus;
use amfa_web::health::SystemHealthCheck;
use risk_scorer::app_state::AppState;
use risk_scorer::config::Config;
use risk_scorer::environment::RiskScorerEnvironment;
use risk_scorer::handlers::health::PostgresHealthCheck;
use risk_scorer::providers::history_repository::PostgresHistoryRepository;
use risk_scorer::providers::mfa_log_client::HttpMfaLogClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;

    let pool = amfa_postgres::create_pool(&PoolConfig::new(config.database_url.clone())).await?;
    amfa_postgres::run_migrations(&pool, "./migrations").await?;

    let event_bus: Arc<dyn EventBus> = Arc::new(RedpandaEventBus::new(&config.broker_url)?);

    let environment = RiskScorerEnvironment::new(
        PostgresHistoryRepository::new(pool.clone()),
        HttpMfaLogClient::new(config.mfa_arbiter_url.clone()),
        SystemClock,
        event_bus,
    );

    let health = Arc::new(SystemHealthCheck::new(vec![Arc::new(PostgresHealthCheck::new(pool))]));

    let state = Arc::new(AppState::new(environment, health));
    let app = risk_scorer::router::build(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, "risk-scorer listening");
    axum::serve(listener, app).await?;

    Ok(())
}
