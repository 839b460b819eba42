//! TenantKit API server

use std::sync::Arc;

use anyhow::Context;
use tenantkit_api::{config::LogFormat, create_app, AppState, Config};
use tenantkit_shared::{create_pool, run_migrations, seed_test_data, MemoryStore, PgStore, TenantStore};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(config.log_format);

    let store: Arc<dyn TenantStore> = match &config.database_url {
        Some(url) => {
            let pool = create_pool(url, config.database_max_connections)
                .await
                .context("Failed to connect to database")?;
            if config.run_migrations {
                run_migrations(&pool)
                    .await
                    .context("Failed to run migrations")?;
            }
            tracing::info!("Using PostgreSQL store");
            Arc::new(PgStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            Arc::new(MemoryStore::new())
        }
    };

    if config.seed_on_startup {
        let outcome = seed_test_data(store.as_ref())
            .await
            .context("Failed to seed data")?;
        tracing::info!(?outcome, "Startup seed finished");
    }

    let bind_address = config.bind_address.clone();
    let public_url = config.public_url.clone();
    let app = create_app(AppState::new(config, store));

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;
    tracing::info!(address = %bind_address, public_url = %public_url, "HTTP server starting");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tenantkit_api=debug,tenantkit_shared=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Wait for shutdown signal (Ctrl+C)
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
