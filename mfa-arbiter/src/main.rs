//! MFA arbiter service entry point.

use std::sync::Arc;

use amfa_core::environment::SystemClock;
use amfa_core::event_bus::EventBus;
use amfa_postgres::PoolConfig;
use amfa_redpanda::RedpandaEventBus;
use amfa_web::health::SystemHealthCheck;
use mfa_arbiter::app_state::AppState;
use mfa_arbiter::config::Config;
use mfa_arbiter::environment::MfaArbiterEnvironment;
use mfa_arbiter::handlers::health::{PostgresHealthCheck, RedisHealthCheck};
use mfa_arbiter::providers::cache::RedisCache;
use mfa_arbiter::providers::email_transport::SmtpEmailTransport;
use mfa_arbiter::providers::otp_log_repository::PostgresOtpLogRepository;
use mfa_arbiter::providers::trusted_device_repository::PostgresTrustedDeviceRepository;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let config = Config::from_env()?;

    let pool = amfa_postgres::create_pool(&PoolConfig::new(config.database_url.clone())).await?;
    amfa_postgres::run_migrations(&pool, "./migrations").await?;

    let redis_client = redis::Client::open(config.cache_url.clone())?;
    let redis_manager = redis::aio::ConnectionManager::new(redis_client).await?;

    let event_bus: Arc<dyn EventBus> = Arc::new(RedpandaEventBus::new(&config.broker_url)?);

    let environment = MfaArbiterEnvironment::new(
        PostgresTrustedDeviceRepository::new(pool.clone()),
        PostgresOtpLogRepository::new(pool.clone()),
        RedisCache::new(redis_manager.clone()),
        SmtpEmailTransport::new(
            config.smtp_server.clone(),
            config.smtp_port,
            config.smtp_username.clone(),
            config.smtp_password.clone(),
            config.from_email.clone(),
            config.from_name.clone(),
        ),
        SystemClock,
        event_bus,
        config.risk_threshold,
    );

    let health = Arc::new(SystemHealthCheck::new(vec![
        Arc::new(PostgresHealthCheck::new(pool)),
        Arc::new(RedisHealthCheck::new(redis_manager)),
    ]));

    let state = Arc::new(AppState::new(environment, health));
    let app = mfa_arbiter::router::build(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!(bind_addr = %config.bind_addr, "mfa-arbiter listening");
    axum::serve(listener, app).await?;

    Ok(())
}
