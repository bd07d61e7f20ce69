use std::path::Path;
use std::sync::Arc;

use dotenvy::dotenv;
use tracing::{info, warn};

use site_payroll_engine::api::{AppState, create_router};
use site_payroll_engine::clock::SystemClock;
use site_payroll_engine::config::ConfigLoader;
use site_payroll_engine::engine::SiteEngine;
use site_payroll_engine::storage::FileStore;

const DEFAULT_CONFIG_PATH: &str = "./config/engine.yaml";
const DEFAULT_DATA_FILE: &str = "./data/site-payroll.json";
const DEFAULT_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .init();

    let config_path =
        std::env::var("ENGINE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let data_file =
        std::env::var("ENGINE_DATA_FILE").unwrap_or_else(|_| DEFAULT_DATA_FILE.to_string());
    let addr = std::env::var("ENGINE_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let loader = if Path::new(&config_path).exists() {
        ConfigLoader::load(&config_path)?
    } else {
        warn!(path = %config_path, "Configuration file missing, using defaults");
        ConfigLoader::default()
    };
    let config = loader.into_config();
    config.validate()?;

    if let Some(parent) = Path::new(&data_file).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let store = Arc::new(FileStore::open(&data_file).await?);

    info!(
        geofence_radius_m = config.geofence_radius_m,
        location_timeout_ms = config.location_timeout_ms,
        reference_shift_hours = %config.reference_shift_hours,
        data_file = %data_file,
        "Engine configured"
    );

    let engine = SiteEngine::new(store, Arc::new(SystemClock), config);
    let router = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Server starting...");
    axum::serve(listener, router).await?;

    Ok(())
}
