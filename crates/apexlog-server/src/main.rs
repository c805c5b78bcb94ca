//! Binary entrypoint for the apexlog HTTP server.
//!
//! Reads configuration from environment variables:
//! - `APEXLOG_PORT`: Server listen port (default: "3000")

use apexlog_core::AnalyzeConfig;
use apexlog_server::router::build_router;
use apexlog_server::state::AppState;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let port = std::env::var("APEXLOG_PORT").unwrap_or_else(|_| "3000".to_string());

    let state = AppState::new(AnalyzeConfig::default());
    let app = build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("apexlog server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
