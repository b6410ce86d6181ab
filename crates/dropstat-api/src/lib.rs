//! Dropstat API: drop-report submission and recall over HTTP
pub mod config;
pub mod error;
pub mod handlers;
pub mod identity;
pub mod metrics;
pub mod middleware;
pub mod request;
pub mod state;

use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;

pub use config::ServiceConfig;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/report", post(handlers::submit_report))
        .route("/report/recall", post(handlers::recall_report))
        .route("/users", post(handlers::login))
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .layer(from_fn(middleware::no_store))
        .layer(middleware::cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: ServiceConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&config)?;
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(&config.listen_addr).await?;

    tracing::info!("Dropstat API listening on {}", config.listen_addr);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
