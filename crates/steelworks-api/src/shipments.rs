//! Handlers for `/shipments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/shipments` | optional `?status=pending\|shipped` |
//! | `GET`  | `/shipments/:lot_code` | 404 when the lot itself is unknown |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use steelworks_core::{
  report::{ShipmentFilter, ShipmentStatus},
  store::OpsStore,
};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct OverviewParams {
  pub status: Option<ShipmentFilter>,
}

/// `GET /shipments[?status=pending|shipped]`
pub async fn overview<S: OpsStore>(
  State(store): State<Arc<S>>,
  Query(params): Query<OverviewParams>,
) -> Result<Json<Vec<ShipmentStatus>>, ApiError> {
  let rows = store
    .shipment_overview(params.status)
    .await
    .map_err(ApiError::store)?;
  Ok(Json(rows))
}

/// `GET /shipments/:lot_code`
///
/// A known lot with no shipment row answers `is_shipped: false`; only an
/// unknown lot is a 404.
pub async fn status<S: OpsStore>(
  State(store): State<Arc<S>>,
  Path(lot_code): Path<String>,
) -> Result<Json<ShipmentStatus>, ApiError> {
  let status = store
    .shipment_status(&lot_code)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("lot {lot_code} not found")))?;
  Ok(Json(status))
}
