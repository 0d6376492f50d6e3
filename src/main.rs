//! HTTP server for the payroll engine.
//!
//! Reads the configuration directory from `PAYROLL_CONFIG_DIR` (default
//! `./config/default`) and listens on `PORT` (default 8080).

use std::env;
use std::net::SocketAddr;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;

const DEFAULT_CONFIG_DIR: &str = "./config/default";
const DEFAULT_PORT: u16 = 8080;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_dir = env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    let loader = match ConfigLoader::load(&config_dir) {
        Ok(loader) => loader,
        Err(e) => {
            error!(config_dir = %config_dir, error = %e, "Failed to load configuration");
            std::process::exit(1);
        }
    };

    info!(
        config_dir = %config_dir,
        organization = %loader.config().organization().name,
        rate_tables = loader.config().rates().len(),
        "Configuration loaded"
    );

    let app = create_router(AppState::new(loader.into_config()));
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(%addr, error = %e, "Failed to bind listener");
            std::process::exit(1);
        }
    };

    info!(%addr, "Payroll engine listening");

    if let Err(e) = axum::serve(listener, app).await {
        error!(error = %e, "Server error");
        std::process::exit(1);
    }
}
