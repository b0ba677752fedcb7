//! # TaskTrail API Server
//!
//! Multi-tenant task tracking API: JWT login, role-gated task CRUD scoped to
//! the caller's organization, a user directory and an append-only audit log.
//!
//! ## Usage
//!
//! ```bash
//! JWT_SECRET=$(openssl rand -hex 32) cargo run -p tasktrail-api
//! ```

use anyhow::Context;
use tasktrail_api::{
    app::{build_router, AppState},
    config::Config,
    telemetry::{self, LogFormat},
};
use tasktrail_shared::auth::password::prime_dummy_hash;
use tasktrail_shared::db::{
    migrations::run_migrations,
    pool::{close_pool, create_pool, DatabaseConfig},
    seed::seed_demo_data,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init(LogFormat::from_env());

    tracing::info!(
        "TaskTrail API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await
    .context("Failed to connect to database")?;

    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    if config.seed_demo_data {
        seed_demo_data(&pool)
            .await
            .context("Failed to seed demo data")?;
    }

    if !prime_dummy_hash() {
        tracing::warn!("Could not precompute the login timing hash");
    }

    let bind_address = config.bind_address();
    let state = AppState::new(pool.clone(), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown signal received, closing database pool...");
    close_pool(pool).await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
