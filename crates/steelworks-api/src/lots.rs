//! Handler for the `/lots/:lot_code` drill-down endpoint.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use steelworks_core::{report::LotReport, store::OpsStore};

use crate::error::ApiError;

/// `GET /lots/:lot_code`
///
/// The full production, inspection, and shipment history of one lot. A lot
/// with no fact rows yields an empty report; an unknown lot is a 404.
pub async fn drilldown<S: OpsStore>(
  State(store): State<Arc<S>>,
  Path(lot_code): Path<String>,
) -> Result<Json<LotReport>, ApiError> {
  let report = store
    .lot_drilldown(&lot_code)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound(format!("lot {lot_code} not found")))?;
  Ok(Json(report))
}
