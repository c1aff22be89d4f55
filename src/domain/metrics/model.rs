use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{AppError, AppResult};
use crate::infrastructure::oauth::fitbit::{HeartRateSeries, StepsSeries};

pub const STEPS_MEASUREMENT: &str = "activity_steps";
pub const HEART_MEASUREMENT: &str = "heart";

/// Day-granularity format used by the Fitbit series endpoints
const SAMPLE_DATE_FORMAT: &str = "%Y-%m-%d";

/// A field value as it will be written to the time-series store.
///
/// Step totals keep the provider's string form; resting heart rates are
/// plain integers.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
}

/// One pending time-series point: a measurement with a single descriptive
/// tag, a single field, and a day-granularity timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricPoint {
    pub measurement: &'static str,
    pub tag: (&'static str, &'static str),
    pub field: (&'static str, FieldValue),
    pub timestamp: DateTime<Utc>,
}

fn parse_sample_date(date: &str) -> AppResult<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date, SAMPLE_DATE_FORMAT)
        .map_err(|e| AppError::InvalidSeriesData(format!("bad sample date {:?}: {}", date, e)))?;
    Ok(day.and_time(NaiveTime::MIN).and_utc())
}

/// Map a daily step series into pending points.
///
/// The first malformed date aborts the whole series; no partial batch is
/// produced.
pub fn steps_points(series: &StepsSeries) -> AppResult<Vec<MetricPoint>> {
    series
        .steps
        .iter()
        .map(|sample| {
            Ok(MetricPoint {
                measurement: STEPS_MEASUREMENT,
                tag: ("steps", "steps-total"),
                field: ("steps", FieldValue::Text(sample.value.clone())),
                timestamp: parse_sample_date(&sample.date)?,
            })
        })
        .collect()
}

/// Map a resting-heart-rate series into pending points
pub fn heart_rate_points(series: &HeartRateSeries) -> AppResult<Vec<MetricPoint>> {
    series
        .days
        .iter()
        .map(|sample| {
            Ok(MetricPoint {
                measurement: HEART_MEASUREMENT,
                tag: ("heart", "resting-heart"),
                field: ("resting", FieldValue::Integer(sample.value.resting_heart_rate)),
                timestamp: parse_sample_date(&sample.date)?,
            })
        })
        .collect()
}
