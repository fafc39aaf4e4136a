//! # Forum API Binary
//!
//! The entry point that assembles the application: settings, tracing, the
//! PostgreSQL pool, services and the HTTP router.

#[cfg(not(all(feature = "web-axum", feature = "db-postgres")))]
compile_error!("forum-api needs the `web-axum` and `db-postgres` features");

use std::sync::Arc;

use anyhow::{anyhow, Context};
use api_adapters::web::middleware::standard_layers;
use api_adapters::{router, AppState};
use configs::{LogFormat, LogSettings, Settings};
use secrecy::ExposeSecret;
use services::TreeStrategy;
use storage_adapters::PgRepository;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("loading settings")?;
    init_tracing(&settings.log);

    // 1. Storage
    let repo = PgRepository::connect(
        settings.database.url.expose_secret(),
        settings.database.max_connections,
    )
    .await
    .context("connecting to PostgreSQL")?;
    if settings.database.apply_schema {
        repo.apply_schema().await.context("applying schema")?;
    }

    // 2. Services
    let strategy: TreeStrategy = settings
        .posts
        .tree_strategy
        .parse()
        .map_err(|err: String| anyhow!(err))?;
    let state = AppState::from_repository(Arc::new(repo), strategy)
        .with_default_limit(settings.posts.default_limit);

    // 3. HTTP
    let app = standard_layers(router(state), settings.server.request_timeout());
    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port))
        .await
        .with_context(|| {
            format!(
                "binding {}:{}",
                settings.server.host, settings.server.port
            )
        })?;

    tracing::info!(
        addr = %listener.local_addr()?,
        %strategy,
        "forum api listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving http")?;

    tracing::info!("forum api stopped");
    Ok(())
}

fn init_tracing(log: &LogSettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
