pub mod model;
pub mod service;

pub use model::{FieldValue, MetricPoint};
pub use service::{IngestReport, MetricsService};
