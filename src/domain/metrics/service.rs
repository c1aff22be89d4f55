use std::sync::Arc;

use crate::domain::metrics::model::{heart_rate_points, steps_points};
use crate::error::AppResult;
use crate::infrastructure::oauth::FitbitClient;
use crate::infrastructure::repositories::MeasurementRepository;

/// How many points each batch of an ingestion run submitted
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IngestReport {
    pub steps_points: usize,
    pub heart_rate_points: usize,
}

pub struct MetricsService {
    fitbit: Arc<FitbitClient>,
    measurements: Arc<dyn MeasurementRepository>,
}

impl MetricsService {
    pub fn new(fitbit: Arc<FitbitClient>, measurements: Arc<dyn MeasurementRepository>) -> Self {
        Self {
            fitbit,
            measurements,
        }
    }

    /// Fetch both series and write them to the time-series store as two
    /// batches: steps first, then resting heart rate.
    ///
    /// A failure in the heart-rate half does not roll back an
    /// already-written steps batch; the two writes are independent.
    pub async fn ingest_all(&self, access_token: &str) -> AppResult<IngestReport> {
        tracing::info!("Loading step data into the time-series store");
        let steps = self.fitbit.get_daily_steps(access_token).await?;
        let points = steps_points(&steps)?;
        let steps_written = points.len();
        self.measurements.write_batch(points).await?;
        tracing::info!(points = steps_written, "Step batch written");

        tracing::info!("Loading resting heart rate data");
        let heart = self.fitbit.get_resting_heart_rate(access_token).await?;
        let points = heart_rate_points(&heart)?;
        for (sample, point) in heart.days.iter().zip(&points) {
            tracing::debug!(
                date = %point.timestamp.date_naive(),
                bpm = sample.value.resting_heart_rate,
                "resting heart rate sample"
            );
        }
        let heart_written = points.len();
        self.measurements.write_batch(points).await?;
        tracing::info!(points = heart_written, "Heart rate batch written");

        Ok(IngestReport {
            steps_points: steps_written,
            heart_rate_points: heart_written,
        })
    }
}
