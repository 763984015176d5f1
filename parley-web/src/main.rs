mod error;
mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use parley_core::{Config, Credential, InferenceGateway};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Starting Parley v{}", VERSION);

    let config = Config::from_env()?;
    if config.endpoint.is_empty() {
        tracing::warn!("PARLEY_ENDPOINT not set - completion calls will fail");
    }
    if let Some(client_id) = &config.client_id {
        tracing::info!("Using identity client id {}", client_id);
    }

    // The credential is required up front; a missing key is fatal at startup.
    let credential = Credential::from_env()?;

    let gateway = Arc::new(InferenceGateway::new(config, credential));

    let addr: SocketAddr = std::env::var("PARLEY_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:3000".to_string())
        .parse()
        .context("Invalid PARLEY_ADDR")?;

    let app = Router::new()
        .route("/", get(routes::home).post(routes::set_system_prompt))
        .route("/api/inference", post(routes::inference))
        .route("/api/modelchat", post(routes::model_chat))
        .route("/api/version", get(routes::version))
        .route("/api/config", get(routes::config_view))
        .layer(
            tower::ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE]),
                ),
        )
        .with_state(gateway);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    tracing::info!("Server running at http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
