use async_trait::async_trait;

use crate::domain::metrics::MetricPoint;
use crate::error::AppResult;

/// Repository for time-series point submission.
/// Abstracts the underlying store (InfluxDB in production, an in-memory
/// recorder in tests).
///
/// Implementations are responsible for:
/// - Converting pending points into the store's native write format
/// - Submitting each batch as a single call
/// - Surfacing write failures without retrying
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Submit one batch of points.
    ///
    /// The batch is all-or-nothing only to the extent the store itself
    /// guarantees it; callers must not assume a rollback across batches.
    async fn write_batch(&self, points: Vec<MetricPoint>) -> AppResult<()>;

    /// Cheap connectivity probe against the store
    async fn check_connection(&self) -> AppResult<()>;
}
