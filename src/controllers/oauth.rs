use axum::{
    extract::{Query, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    domain::metrics::MetricsService,
    error::{AppError, AppResult},
    infrastructure::oauth::FitbitClient,
};

#[derive(Debug, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
}

pub struct OAuthController {
    fitbit: Arc<FitbitClient>,
    metrics: Arc<MetricsService>,
}

impl OAuthController {
    pub fn new(fitbit: Arc<FitbitClient>, metrics: Arc<MetricsService>) -> Self {
        Self { fitbit, metrics }
    }

    /// GET / - Landing page with the Fitbit authorize link
    pub async fn landing(State(controller): State<Arc<OAuthController>>) -> Html<String> {
        let authorize_url = controller.fitbit.authorization_url();
        Html(format!(
            "Visit: <a href=\"{url}\">{url}</a>",
            url = authorize_url
        ))
    }

    /// GET /auth - Handle the Fitbit OAuth callback
    ///
    /// Exchanges the authorization code, ingests both series into the
    /// time-series store, and responds with the raw profile JSON. The
    /// caller is blocked until both batches are written.
    pub async fn callback(
        State(controller): State<Arc<OAuthController>>,
        Query(params): Query<OAuthCallbackParams>,
    ) -> AppResult<Response> {
        let code = params
            .code
            .ok_or_else(|| AppError::BadRequest("missing code query parameter".to_string()))?;

        let tokens = controller.fitbit.exchange_code(&code).await?;
        tracing::info!(user_id = %tokens.user_id, "Fitbit authorization complete");

        let profile = controller.fitbit.get_profile(&tokens.access_token).await?;

        let report = controller.metrics.ingest_all(&tokens.access_token).await?;
        tracing::info!(
            steps_points = report.steps_points,
            heart_rate_points = report.heart_rate_points,
            "Ingestion run complete"
        );

        Ok(([(header::CONTENT_TYPE, "application/json")], profile).into_response())
    }
}
