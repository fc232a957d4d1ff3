//! Registra Server — public registration pages and the admin API.

pub mod config;
pub mod error;
pub mod export;
pub mod routes;
pub mod state;
pub mod tenancy;

use axum::Router;
use registra_db::DbManager;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;

use config::AppConfig;
use error::ServerError;
use state::AppState;

/// The full application router with state applied.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::public_routes(state.clone()))
        .nest("/admin", routes::admin_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Connect, bind and serve until a shutdown signal arrives.
pub async fn start_server(config: AppConfig) -> Result<(), ServerError> {
    info!("Initializing state...");
    let db = DbManager::connect(&config.db).await?;
    let state = AppState::new(db.client().clone(), &config)?;
    if state.admin_token.is_none() {
        info!("REGISTRA_ADMIN_TOKEN not set, admin API is locked");
    }

    let app = build_router(state);

    let address = format!("0.0.0.0:{}", config.server.port);
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install terminate handler");
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
}
