//! Integration tests driving the router end to end against a seeded
//! in-memory store.

use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode},
};
use serde_json::Value;
use steelworks_store_sqlite::{SqliteStore, seed::seed_sample};
use tower::ServiceExt as _;

use crate::api_router;

async fn seeded_router() -> axum::Router {
  let store = SqliteStore::open_in_memory().await.unwrap();
  seed_sample(&store).await.unwrap();
  api_router(Arc::new(store))
}

async fn get(uri: &str) -> (StatusCode, Value) {
  let resp = seeded_router()
    .await
    .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
    .await
    .unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
    .await
    .unwrap();
  let body = serde_json::from_slice(&bytes).unwrap();
  (status, body)
}

// ── Reports ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn defects_by_line_returns_ordered_rows() {
  let (status, body) =
    get("/reports/defects-by-line?start=2024-01-01&end=2024-01-31").await;
  assert_eq!(status, StatusCode::OK);

  let rows = body.as_array().unwrap();
  assert_eq!(rows.len(), 3);
  assert_eq!(rows[0]["line_code"], "LINE-A");
  assert_eq!(rows[0]["total_defects"], 8);
  assert_eq!(rows[1]["line_code"], "LINE-B");
  assert_eq!(rows[2]["line_code"], "LINE-C");
}

#[tokio::test]
async fn defect_trend_defaults_to_daily_buckets() {
  let (status, body) =
    get("/reports/defect-trend?start=2024-01-01&end=2024-01-31").await;
  assert_eq!(status, StatusCode::OK);

  let buckets = body.as_array().unwrap();
  assert_eq!(buckets[0]["bucket_start"], "2024-01-03");
  assert_eq!(buckets[0]["direction"], "baseline");
  assert_eq!(buckets[1]["bucket_start"], "2024-01-04");
  assert_eq!(buckets[1]["direction"], "increasing");
  assert_eq!(buckets[1]["by_type"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn defect_trend_accepts_weekly_buckets() {
  let (status, body) =
    get("/reports/defect-trend?start=2024-01-01&end=2024-01-31&bucket=week")
      .await;
  assert_eq!(status, StatusCode::OK);

  let buckets = body.as_array().unwrap();
  assert_eq!(buckets.len(), 2);
  assert_eq!(buckets[0]["bucket_start"], "2024-01-01");
  assert_eq!(buckets[0]["total_defects"], 12);
  assert_eq!(buckets[1]["bucket_start"], "2024-01-08");
  assert_eq!(buckets[1]["direction"], "decreasing");
}

#[tokio::test]
async fn defects_by_type_carries_percentages() {
  let (status, body) =
    get("/reports/defects-by-type?start=2024-01-01&end=2024-01-31").await;
  assert_eq!(status, StatusCode::OK);

  let rows = body.as_array().unwrap();
  assert_eq!(rows[0]["defect_code"], "DIMENSION-OOT");
  assert_eq!(rows[0]["total_defects"], 9);
  assert_eq!(rows[0]["percentage"], 56.25);
}

#[tokio::test]
async fn production_report_honours_the_range() {
  let (status, body) =
    get("/reports/production?start=2024-01-01&end=2024-01-05").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body.as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn risk_report_needs_no_parameters() {
  let (status, body) = get("/reports/risk").await;
  assert_eq!(status, StatusCode::OK);

  let rows = body.as_array().unwrap();
  assert_eq!(rows.len(), 2);
  assert_eq!(rows[0]["lot_code"], "LOT-2024-01-003");
  assert_eq!(rows[1]["lot_code"], "LOT-2024-01-001");
}

// ── Input validation ────────────────────────────────────────────────────────

#[tokio::test]
async fn inverted_range_is_a_bad_request() {
  let (status, body) =
    get("/reports/defects-by-line?start=2024-02-01&end=2024-01-01").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("invalid date range"));
}

#[tokio::test]
async fn malformed_date_is_a_bad_request() {
  let (status, _) =
    get("/reports/defects-by-type?start=01/15/2024&end=2024-01-31").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_range_parameters_are_rejected() {
  let resp = seeded_router()
    .await
    .oneshot(
      Request::builder()
        .uri("/reports/defects-by-line")
        .body(Body::empty())
        .unwrap(),
    )
    .await
    .unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ── Shipments ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn shipment_overview_filters_by_status() {
  let (status, body) = get("/shipments?status=pending").await;
  assert_eq!(status, StatusCode::OK);

  let rows = body.as_array().unwrap();
  assert_eq!(rows.len(), 3);
  assert!(rows.iter().all(|r| r["is_shipped"] == false));
}

#[tokio::test]
async fn shipment_status_distinguishes_absent_lot_from_absent_row() {
  // Known lot without a shipment row: a 200 with is_shipped false.
  let (status, body) = get("/shipments/LOT-2024-01-005").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["is_shipped"], false);
  assert_eq!(body["ship_date"], Value::Null);

  // Unknown lot: a 404.
  let (status, body) = get("/shipments/LOT-NONEXISTENT").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].as_str().unwrap().contains("not found"));
}

// ── Lot drill-down ──────────────────────────────────────────────────────────

#[tokio::test]
async fn lot_drilldown_returns_the_full_history() {
  let (status, body) = get("/lots/LOT-2024-01-003").await;
  assert_eq!(status, StatusCode::OK);

  assert_eq!(body["lot_code"], "LOT-2024-01-003");
  assert_eq!(body["production"][0]["line_code"], "LINE-C");
  assert_eq!(body["total_defects"], 4);
  assert_eq!(body["shipment"]["ship_date"], "2024-01-10");
  assert_eq!(body["days_to_ship"], 8);
}

#[tokio::test]
async fn lot_drilldown_unknown_lot_is_404() {
  let (status, _) = get("/lots/LOT-NONEXISTENT").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}
