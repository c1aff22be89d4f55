use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use wiremock::MockServer;

use fitflux::controllers::oauth::OAuthController;
use fitflux::domain::metrics::MetricsService;
use fitflux::infrastructure::http::build_router;
use fitflux::infrastructure::oauth::FitbitClient;
use fitflux::infrastructure::repositories::MeasurementRepository;


use api_client::TestClient;
use measurements::RecordingMeasurementRepository;

pub const TEST_CLIENT_ID: &str = "test_client_id";
pub const TEST_CLIENT_SECRET: &str = "test_client_secret";
pub const TEST_REDIRECT_URI: &str = "http://localhost:4000/auth";

pub struct TestContext {
    pub client: TestClient,
    pub fitbit: MockServer,
    pub measurements: Arc<RecordingMeasurementRepository>,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        // Stand-in for api.fitbit.com
        let fitbit_server = MockServer::start().await;

        let measurements = Arc::new(RecordingMeasurementRepository::new());
        let sink: Arc<dyn MeasurementRepository> = measurements.clone();

        let fitbit_client = Arc::new(
            FitbitClient::new(
                TEST_CLIENT_ID.to_string(),
                TEST_CLIENT_SECRET.to_string(),
                TEST_REDIRECT_URI.to_string(),
            )
            .with_api_base_url(fitbit_server.uri()),
        );

        let metrics_service = Arc::new(MetricsService::new(fitbit_client.clone(), sink.clone()));
        let oauth_controller = Arc::new(OAuthController::new(fitbit_client, metrics_service));

        let app = build_router(sink, oauth_controller);

        // Start server on an ephemeral port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let base_url = format!("http://{}", addr);

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Ok(Self {
            client: TestClient::new(&base_url),
            fitbit: fitbit_server,
            measurements,
        })
    }
}
