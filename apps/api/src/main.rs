mod analysis;
mod chat;
mod config;
mod errors;
mod payload;
mod reports;
mod routes;
mod state;
mod transcribe;
mod workflow;

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::reports::store::ReportStore;
use crate::routes::build_router;
use crate::state::AppState;
use crate::workflow::CozeClient;

/// Outbound timeout; workflow runs routinely take tens of seconds.
const HTTP_TIMEOUT_SECS: u64 = 120;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (env vars with static fallbacks)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            let crate_name = env!("CARGO_PKG_NAME").replace('-', "_");
            EnvFilter::new(format!("{crate_name}={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Hireview API v{}", env!("CARGO_PKG_VERSION"));

    // One shared HTTP client; every outbound call goes through it.
    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .build()?;

    let coze = CozeClient::new(
        http.clone(),
        config.coze_api_base.clone(),
        config.coze_pat.clone(),
    );
    info!("Coze client initialized ({})", config.coze_api_base);

    let reports = ReportStore::new(
        http.clone(),
        config.supabase_url.clone(),
        config.supabase_api_key.clone(),
    );
    info!("Report store initialized ({})", config.supabase_url);

    let state = AppState {
        http,
        coze,
        reports,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // the front end is served from another origin

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
