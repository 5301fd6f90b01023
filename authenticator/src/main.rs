//! Authenticator service entry point.

use std::sync::Arc;

use amfa_core::environment::SystemClock;
use amfa_core::event_bus::EventBus;
use amfa_postgres::PoolConfig;
use amfa_redpanda::RedpandaEventBus;
use amfa_web::health::SystemHealthCheck;
use authenticator::app_state::AppState;
use authenticator::config::Config;
use authenticator::environment::AuthenticatorEnvironment;
use authenticator::handlers::health::{PostgresHealthCheck, RedisHealthCheck};
use authenticator::providers::cache::RedisCache;
use authenticator::providers::geo_locator::HttpGeoLocator;
use authenticator::providers::mfa_client::HttpMfaArbiterClient;
use authenticator::providers::password_hasher::Argon2PasswordHasher;
use authenticator::providers::risk_client::HttpRiskScorerClient;
use authenticator::providers::token_signer::JwtTokenSigner;
use authenticator::providers::user_repository::PostgresUserRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;

    let pool = amfa_postgres::create_pool(&PoolConfig::new(config.database_url.clone())).await?;
    amfa_postgres::run_migrations(&pool, "./migrations").await?;

    let redis_client = redis::Client::open(config.cache_url.clone())?;
    let redis_manager = redis::aio::ConnectionManager::new(redis_client).await?;

    let event_bus: Arc<dyn EventBus> = Arc::new(RedpandaEventBus::new(&config.broker_url)?);

    let environment = AuthenticatorEnvironment::new(
        PostgresUserRepository::new(pool.clone()),
        Argon2PasswordHasher::new(),
        HttpGeoLocator::new(config.geolocation_url.clone()),
        RedisCache::new(redis_manager.clone()),
        HttpRiskScorerClient::new(config.risk_scorer_url.clone()),
        HttpMfaArbiterClient::new(config.mfa_arbiter_url.clone()),
        JwtTokenSigner::new(config.jwt_secret.clone()),
        SystemClock,
        event_bus,
    );

    let health = Arc::new(SystemHealthCheck::new(vec![
        Arc::new(PostgresHealthCheck::new(pool)),
        Arc::new(RedisHealthCheck::new(redis_manager)),
    ]));

    let state = Arc::new(AppState::new(environment, health));
    let app = authenticator::router::build(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, "authenticator listening");
    axum::serve(listener, app).await?;

    Ok(())
}
