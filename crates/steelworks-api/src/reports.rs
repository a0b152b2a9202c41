//! Handlers for `/reports` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/reports/defects-by-line` | `?start&end` required |
//! | `GET`  | `/reports/defect-trend` | `?start&end`; optional `bucket=day\|week` |
//! | `GET`  | `/reports/defects-by-type` | `?start&end` required |
//! | `GET`  | `/reports/production` | `?start&end` required |
//! | `GET`  | `/reports/risk` | no parameters |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use steelworks_core::{
  range::{Bucket, DateRange},
  report::{
    DefectShare, LineDefects, ProductionEvent, RiskLot, TrendBucket,
  },
  store::OpsStore,
};

use crate::error::ApiError;

/// Date-range query parameters shared by the ranged reports.
#[derive(Debug, Deserialize)]
pub struct RangeParams {
  /// Inclusive start date, `YYYY-MM-DD`.
  pub start: String,
  /// Inclusive end date, `YYYY-MM-DD`.
  pub end:   String,
}

impl RangeParams {
  fn into_range(self) -> Result<DateRange, ApiError> {
    DateRange::parse(&self.start, &self.end)
      .map_err(|e| ApiError::BadRequest(e.to_string()))
  }
}

/// `GET /reports/defects-by-line?start=...&end=...`
pub async fn defects_by_line<S: OpsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<RangeParams>,
) -> Result<Json<Vec<LineDefects>>, ApiError> {
  let range = params.into_range()?;
  let rows = store
    .defects_by_line(range)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

#[derive(Debug, Deserialize)]
pub struct TrendParams {
  pub start:  String,
  pub end:    String,
  /// Bucket granularity; defaults to daily.
  pub bucket: Option<Bucket>,
}

/// `GET /reports/defect-trend?start=...&end=...[&bucket=week]`
///
/// Returns one object per time bucket, each carrying its per-type breakdown
/// and a direction label relative to the previous bucket.
pub async fn defect_trend<S: OpsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<TrendParams>,
) -> Result<Json<Vec<TrendBucket>>, ApiError> {
  let range = DateRange::parse(&params.start, &params.end)
    .map_err(|e| ApiError::BadRequest(e.to_string()))?;
  let bucket = params.bucket.unwrap_or(Bucket::Day);
  let points = store
    .defect_trend(range, bucket)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(TrendBucket::group(points)))
}

/// `GET /reports/defects-by-type?start=...&end=...`
pub async fn defects_by_type<S: OpsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<RangeParams>,
) -> Result<Json<Vec<DefectShare>>, ApiError> {
  let range = params.into_range()?;
  let rows = store
    .defects_by_type(range)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `GET /reports/production?start=...&end=...`
pub async fn production_summary<S: OpsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<RangeParams>,
) -> Result<Json<Vec<ProductionEvent>>, ApiError> {
  let range = params.into_range()?;
  let rows = store
    .production_summary(range)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `GET /reports/risk`
pub async fn risk<S: OpsStore>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<RiskLot>>, ApiError> {
  let rows = store.risk_report().await.map_err(ApiError::store)?;
  Ok(Json(rows))
}
