pub mod request_id;

use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, oauth::OAuthController};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::MeasurementRepository;

pub use request_id::{request_id_middleware, RequestId};

/// Build the application router with all routes configured
pub fn build_router(
    measurements: Arc<dyn MeasurementRepository>,
    oauth_controller: Arc<OAuthController>,
) -> Router {
    // OAuth routes: landing page with the authorize link, and the
    // provider redirect target
    let oauth_routes = Router::new()
        .route("/", get(OAuthController::landing))
        .route("/auth", get(OAuthController::callback))
        .with_state(oauth_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(measurements)
        .merge(oauth_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    measurements: Arc<dyn MeasurementRepository>,
    oauth_controller: Arc<OAuthController>,
) -> anyhow::Result<()> {
    let app = build_router(measurements, oauth_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
