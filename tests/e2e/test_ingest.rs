use crate::e2e::helpers;

use chrono::{TimeZone, Utc};
use fitflux::domain::metrics::FieldValue;
use helpers::fitbit_mocks;
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

async fn mount_happy_path(ctx: &TestContext, steps: serde_json::Value, heart: serde_json::Value) {
    fitbit_mocks::mock_token_exchange(&ctx.fitbit, "abc123").await;
    fitbit_mocks::mock_profile(&ctx.fitbit).await;
    fitbit_mocks::mock_daily_steps(&ctx.fitbit, steps).await;
    fitbit_mocks::mock_resting_heart_rate(&ctx.fitbit, heart).await;
}

#[tokio::test]
async fn it_should_write_one_steps_point_per_daily_sample() {
    let ctx = TestContext::new().await.unwrap();

    mount_happy_path(
        &ctx,
        json!([{"dateTime": "2024-01-01", "value": "1000"}]),
        json!([]),
    )
    .await;

    let response = ctx.client.get("/auth?code=abc123").await.unwrap();
    response.assert_status(StatusCode::OK);

    let batches = ctx.measurements.batches();
    assert_eq!(batches.len(), 2, "steps batch then heart batch");

    let steps_batch = &batches[0];
    assert_eq!(steps_batch.len(), 1);
    let point = &steps_batch[0];
    assert_eq!(point.measurement, "activity_steps");
    assert_eq!(point.tag, ("steps", "steps-total"));
    assert_eq!(point.field, ("steps", FieldValue::Text("1000".to_string())));
    assert_eq!(
        point.timestamp,
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    );

    assert!(batches[1].is_empty(), "no heart samples were served");
}

#[tokio::test]
async fn it_should_write_every_sample_of_both_series() {
    let ctx = TestContext::new().await.unwrap();

    mount_happy_path(
        &ctx,
        json!([
            {"dateTime": "2024-01-01", "value": "1000"},
            {"dateTime": "2024-01-02", "value": "2500"},
            {"dateTime": "2024-01-03", "value": "0"}
        ]),
        json!([
            {"dateTime": "2024-01-01", "value": {"restingHeartRate": 61}},
            {"dateTime": "2024-01-02", "value": {"restingHeartRate": 58}}
        ]),
    )
    .await;

    let response = ctx.client.get("/auth?code=abc123").await.unwrap();
    response.assert_status(StatusCode::OK);

    let batches = ctx.measurements.batches();
    assert_eq!(batches.len(), 2);
    assert_eq!(batches[0].len(), 3);
    assert_eq!(batches[1].len(), 2);

    // Heart points carry the nested integer, not the envelope
    assert_eq!(batches[1][0].measurement, "heart");
    assert_eq!(batches[1][0].tag, ("heart", "resting-heart"));
    assert_eq!(batches[1][0].field, ("resting", FieldValue::Integer(61)));
    assert_eq!(batches[1][1].field, ("resting", FieldValue::Integer(58)));
}

#[tokio::test]
async fn it_should_abort_before_writing_when_a_steps_date_is_malformed() {
    let ctx = TestContext::new().await.unwrap();

    mount_happy_path(
        &ctx,
        json!([
            {"dateTime": "2024-01-01", "value": "1000"},
            {"dateTime": "01/02/2024", "value": "2500"}
        ]),
        json!([]),
    )
    .await;

    let response = ctx.client.get("/auth?code=abc123").await.unwrap();
    response.assert_status(StatusCode::BAD_GATEWAY);

    // The malformed date aborts the steps series before any point is submitted
    assert!(ctx.measurements.batches().is_empty());
}

#[tokio::test]
async fn it_should_keep_the_steps_batch_when_the_heart_series_fails() {
    let ctx = TestContext::new().await.unwrap();

    mount_happy_path(
        &ctx,
        json!([{"dateTime": "2024-01-01", "value": "1000"}]),
        json!([{"dateTime": "bad-date", "value": {"restingHeartRate": 60}}]),
    )
    .await;

    let response = ctx.client.get("/auth?code=abc123").await.unwrap();
    response.assert_status(StatusCode::BAD_GATEWAY);

    // No rollback across batches: the steps write already happened
    let batches = ctx.measurements.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].len(), 1);
    assert_eq!(batches[0][0].measurement, "activity_steps");
}

#[tokio::test]
async fn it_should_default_a_missing_resting_heart_rate_to_zero() {
    let ctx = TestContext::new().await.unwrap();

    mount_happy_path(
        &ctx,
        json!([]),
        json!([{"dateTime": "2024-01-01", "value": {}}]),
    )
    .await;

    let response = ctx.client.get("/auth?code=abc123").await.unwrap();
    response.assert_status(StatusCode::OK);

    let batches = ctx.measurements.batches();
    assert_eq!(batches[1][0].field, ("resting", FieldValue::Integer(0)));
}
