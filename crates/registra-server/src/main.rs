//! Registra Server — application entry point.

use registra_server::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("registra=info".parse().unwrap()),
        )
        .json()
        .init();

    tracing::info!("Starting Registra server...");

    let result = match AppConfig::from_env() {
        Ok(config) => registra_server::start_server(config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "Registra server failed");
        std::process::exit(1);
    }

    tracing::info!("Registra server stopped.");
}
