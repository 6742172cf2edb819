//! Conversion Relay
//!
//! Server-side event relay handling:
//! - Inbound marketing event validation and normalization
//! - Geo and identity enrichment with graceful degradation
//! - Per-tenant credential resolution for Conversions API dispatch
//! - First-party user tracking on page views

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{info, warn};

use api::{router, AppState};
use capi_client::GraphApiClient;
use geo_enrich::GeoEnricher;
use relay_core::{TenantConfig, TenantMap};
use telemetry::init_tracing_from_env;
use user_store::{PgUserStore, UserStore};

/// Application configuration.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,

    /// Graph API base URL for Conversions API dispatch
    #[serde(default = "default_graph_url")]
    graph_url: String,

    /// GeoLite2 City database path
    #[serde(default = "default_geoip_path")]
    geoip_path: String,

    /// Per-tenant credential file (TOML)
    #[serde(default = "default_tenants_path")]
    tenants_path: String,

    /// Postgres connection string for the user store
    #[serde(default)]
    database_url: String,

    /// Ambient credentials used when a content id has no tenant entry
    #[serde(default)]
    pixel_id: String,
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    test_code: Option<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_graph_url() -> String {
    "https://graph.facebook.com/v18.0".to_string()
}

fn default_geoip_path() -> String {
    "storage/geoip/GeoLite2-City.mmdb".to_string()
}

fn default_tenants_path() -> String {
    "config/tenants.toml".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            graph_url: default_graph_url(),
            geoip_path: default_geoip_path(),
            tenants_path: default_tenants_path(),
            database_url: String::new(),
            pixel_id: String::new(),
            access_token: String::new(),
            test_code: None,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    init_tracing_from_env();

    info!("Starting Conversion Relay v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = load_config()?;

    if config.database_url.is_empty() {
        anyhow::bail!("database_url must be set (RELAY_DATABASE_URL or DATABASE_URL)");
    }

    // Per-tenant credentials, loaded once and read-only afterwards
    let tenants = load_tenants(&config.tenants_path)?;
    info!(tenants = tenants.len(), "tenant credentials loaded");

    // Geo enricher degrades to the empty location when the database is
    // missing; startup continues either way
    let geo = Arc::new(GeoEnricher::open(&config.geoip_path));
    if !geo.is_available() {
        warn!(path = %config.geoip_path, "geo database unavailable, events relay without location data");
    }

    // User store
    let store = PgUserStore::connect(&config.database_url)
        .await
        .context("Failed to connect to user store")?;
    store
        .init_schema()
        .await
        .context("Failed to initialize user store schema")?;
    let users: Arc<dyn UserStore> = Arc::new(store);

    // Conversions API client
    let dispatcher = Arc::new(GraphApiClient::new(&config.graph_url));

    let default_tenant = TenantConfig {
        pixel_id: config.pixel_id.clone(),
        access_token: config.access_token.clone(),
        test_code: config.test_code.clone(),
    };

    // Create application state
    let state = AppState::new(
        dispatcher,
        users,
        geo,
        Arc::new(tenants),
        default_tenant,
    );

    // Create router
    let app = router(state);

    // Start HTTP server
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("Invalid server address")?;

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    // ConnectInfo feeds the peer-address fallback of client IP resolution
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let settings = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("RELAY")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = settings
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Conventional fallback used by most deployments
    if config.database_url.is_empty() {
        if let Ok(url) = std::env::var("DATABASE_URL") {
            config.database_url = url;
        }
    }

    Ok(config)
}

/// Load per-tenant credentials from a TOML file. A missing file is not
/// fatal: every request then relays under the ambient credentials.
fn load_tenants(path: &str) -> Result<TenantMap> {
    if !Path::new(path).exists() {
        warn!(path, "tenant credential file not found, using ambient credentials for all tenants");
        return Ok(TenantMap::default());
    }

    let settings = config::Config::builder()
        .add_source(config::File::from(Path::new(path)).format(config::FileFormat::Toml))
        .build()
        .with_context(|| format!("Failed to read tenant credentials from {path}"))?;

    let domains: HashMap<String, TenantConfig> = settings
        .try_deserialize()
        .with_context(|| format!("Failed to parse tenant credentials from {path}"))?;

    Ok(TenantMap::new(domains))
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            info!("Received terminate signal");
        }
    }
}
