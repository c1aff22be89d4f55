use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitflux::controllers::oauth::OAuthController;
use fitflux::domain::metrics::MetricsService;
use fitflux::infrastructure::config::{Config, LogFormat};
use fitflux::infrastructure::http::start_http_server;
use fitflux::infrastructure::oauth::FitbitClient;
use fitflux::infrastructure::repositories::{InfluxMeasurementRepository, MeasurementRepository};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting fitflux bridge on {}:{}", config.host, config.port);

    // Create the time-series sink client
    let measurements: Arc<dyn MeasurementRepository> = Arc::new(InfluxMeasurementRepository::new(
        &config.influx_url,
        &config.influx_database,
        &config.influx_username,
        &config.influx_password,
    ));

    // Verify the sink is reachable before accepting callbacks
    measurements.check_connection().await?;
    tracing::info!(
        database = %config.influx_database,
        "InfluxDB connection verified"
    );

    // Instantiate the Fitbit client
    let fitbit = Arc::new(FitbitClient::new(
        config.fitbit_client_id.clone(),
        config.fitbit_client_secret.clone(),
        config.fitbit_redirect_uri.clone(),
    ));

    // Instantiate services and controllers
    let metrics_service = Arc::new(MetricsService::new(fitbit.clone(), measurements.clone()));
    let oauth_controller = Arc::new(OAuthController::new(fitbit.clone(), metrics_service));

    tracing::info!("Visit: {}", fitbit.authorization_url());

    // Start HTTP server with all routes
    start_http_server(Arc::new(config), measurements, oauth_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "fitflux=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "fitflux=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
