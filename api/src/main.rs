use std::sync::Arc;

use actix_web::{web, HttpServer};
use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kurator_api::{create_app, AppState, Repositories};
use kurator_core::FieldEncryptor;
use kurator_infra::{DatabasePool, MySqlRepositories};
use kurator_shared::{AppConfig, LogFormat, LoggingConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    info!(
        environment = %config.environment,
        version = env!("CARGO_PKG_VERSION"),
        "Starting Kurator API server"
    );

    if config.auth.jwt.is_using_default_secret() {
        warn!("Using the built-in JWT secret; set KURATOR__AUTH__JWT__SECRET");
    }
    if config.security.is_using_dev_key() {
        warn!("Using the development encryption key; set KURATOR__SECURITY__ENCRYPTION_KEY");
    }

    let pool = DatabasePool::new(config.database.clone())
        .await
        .context("failed to connect to the database")?;
    info!(pool = %pool.get_statistics(), "Database pool ready");
    let encryptor = FieldEncryptor::from_base64(&config.security.encryption_key)
        .context("invalid encryption key")?;
    let repositories = MySqlRepositories::new(&pool, Arc::new(encryptor));

    let bind_address = config.server.bind_address();
    let workers = config.server.workers;
    let keep_alive = config.server.keep_alive;

    let state = web::Data::new(
        AppState::new(Repositories::from(repositories), config).with_database(pool),
    );

    info!(address = %bind_address, "Server listening");

    let mut server = HttpServer::new(move || create_app(state.clone()))
        .keep_alive(std::time::Duration::from_secs(keep_alive));
    if workers > 0 {
        server = server.workers(workers);
    }

    server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {bind_address}"))?
        .run()
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{},actix_web=info,sqlx=warn", logging.level)));

    let layer = fmt::layer()
        .with_file(logging.source_location)
        .with_line_number(logging.source_location);

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format {
        LogFormat::Json => registry.with(layer.json()).init(),
        LogFormat::Pretty => registry.with(layer.pretty()).init(),
        LogFormat::Compact => registry.with(layer.compact()).init(),
    }
}
