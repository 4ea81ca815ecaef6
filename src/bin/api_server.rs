// src/bin/api_server.rs

use std::sync::Arc;
use students_api::infra::logging;
use students_api::transport;
use students_api::{PgGateway, ServerConfig, StudentService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init();
    let config = ServerConfig::from_env()?;

    // --- Gateway Initialization ---
    tracing::info!(max_connections = config.max_connections, "connecting to Postgres");
    let gateway = PgGateway::connect(&config.database_url, config.max_connections).await?;
    if config.ensure_table {
        gateway.ensure_table().await?;
        tracing::info!("students table ready");
    }

    let app_state = transport::http::AppState {
        students: StudentService::new(Arc::new(gateway)),
    };

    // --- API Server Initialization ---
    let app = transport::http::create_router(app_state);
    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("API server listening on http://{}", addr);
    tracing::info!(
        "Swagger UI available at http://{}{}",
        addr,
        transport::http::DOCS_PATH
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("graceful shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C. Without a working signal handler the server runs until killed.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
