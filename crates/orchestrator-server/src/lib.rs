pub mod error;
pub mod routes;
pub mod state;
pub mod upstream;

use axum::routing::{get, post};
use axum::Router;
use orchestrator_core::OrchestratorConfig;
use tower_http::trace::TraceLayer;

/// Build the axum Router with all routes and middleware.
/// Used by `serve()` and available for integration testing.
pub fn build_router(config: OrchestratorConfig) -> Router {
    let app_state = state::AppState::new(config);

    Router::new()
        .route("/health", get(routes::health::health))
        .route("/ready", get(routes::ready::ready))
        .route("/run", post(routes::run::run_pipeline))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Bind `0.0.0.0:{config.port}` and serve until Ctrl-C / SIGTERM.
pub async fn serve(config: OrchestratorConfig) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve_on(config, listener).await
}

/// Serve on a pre-bound listener.
///
/// Unlike `serve`, this accepts a `TcpListener` that was already bound so the
/// caller can read the actual port before starting (useful when `port = 0` and
/// the OS picks a free port).
pub async fn serve_on(
    config: OrchestratorConfig,
    listener: tokio::net::TcpListener,
) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();

    tracing::info!("Orchestrator running on port {actual_port}");
    tracing::info!("Acquire URL: {}", config.acquire_url);
    tracing::info!("Predict URL: {}", config.predict_url);

    let app = build_router(config);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Orchestrator stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
