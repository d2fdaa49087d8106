use crate::app_config::AppConfig;
use tokio::net::TcpListener;
use tracing::info;

mod app_config;
mod domain;
mod extensions;
mod firmware_repository;
mod request_validator;
mod server;
mod update_decision;
mod update_response;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

    info!("🪵 Starting {} v{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load();
    info!("✅  Loaded configuration");
    info!("📦 Serving firmwares from '{}'", config.ota().firmware_directory());

    let app = server::router(&config);
    let listener = TcpListener::bind(config.server().address()).await?;
    info!("📡 Listening on {}", listener.local_addr()?);
    info!("🔥 {} is up and running", env!("CARGO_PKG_NAME"));

    axum::serve(listener, app).await?;

    Ok(())
}
