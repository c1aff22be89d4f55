use async_trait::async_trait;
use influxdb::{Client, InfluxDbWriteable, Timestamp, WriteQuery};

use crate::domain::metrics::{FieldValue, MetricPoint};
use crate::error::{AppError, AppResult};
use crate::infrastructure::repositories::MeasurementRepository;

/// InfluxDB 1.x implementation of [`MeasurementRepository`].
///
/// Writes use second-level timestamp precision against a single database.
pub struct InfluxMeasurementRepository {
    client: Client,
}

impl InfluxMeasurementRepository {
    pub fn new(url: &str, database: &str, username: &str, password: &str) -> Self {
        let mut client = Client::new(url, database);
        if !username.is_empty() {
            client = client.with_auth(username, password);
        }
        Self { client }
    }
}

fn to_write_query(point: MetricPoint) -> AppResult<WriteQuery> {
    let seconds = u64::try_from(point.timestamp.timestamp())
        .map_err(|_| AppError::Internal(format!("timestamp before epoch: {}", point.timestamp)))?;

    let query = Timestamp::Seconds(u128::from(seconds))
        .into_query(point.measurement)
        .add_tag(point.tag.0, point.tag.1.to_string());

    Ok(match point.field.1 {
        FieldValue::Text(value) => query.add_field(point.field.0, value),
        FieldValue::Integer(value) => query.add_field(point.field.0, value),
    })
}

#[async_trait]
impl MeasurementRepository for InfluxMeasurementRepository {
    async fn write_batch(&self, points: Vec<MetricPoint>) -> AppResult<()> {
        if points.is_empty() {
            return Ok(());
        }

        let queries = points
            .into_iter()
            .map(to_write_query)
            .collect::<AppResult<Vec<_>>>()?;

        self.client.query(queries).await?;
        Ok(())
    }

    async fn check_connection(&self) -> AppResult<()> {
        self.client.ping().await?;
        Ok(())
    }
}
