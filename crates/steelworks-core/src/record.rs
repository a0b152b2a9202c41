//! Persisted entity types for the six operations tables.
//!
//! Dimension rows (lot, line, defect type) are created by import or seed and
//! never mutated. Fact rows are append-only, with one exception: a shipment
//! record may transition from pending to shipped exactly once.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A manufacturing batch, the root entity all fact rows key off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lot {
  pub lot_id:   i64,
  pub lot_code: String,
}

/// A factory production line (`LINE-A`, `LINE-B`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionLine {
  pub line_id:   i64,
  pub line_code: String,
}

/// A quality defect category (`SURFACE-SCRATCH`, `DIMENSION-OOT`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefectType {
  pub defect_type_id: i64,
  pub defect_code:    String,
}

/// One production event: a lot run on a line on a date.
/// The (lot, line, date) triple is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionRecord {
  pub record_id:   i64,
  pub lot_id:      i64,
  pub line_id:     i64,
  pub record_date: NaiveDate,
}

/// One inspection finding. `qty_defects` is non-negative; zero records a
/// clean pass and is a valid inspection event, not an absence of data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InspectionRecord {
  pub inspection_id:   i64,
  pub lot_id:          i64,
  pub defect_type_id:  i64,
  pub inspection_date: NaiveDate,
  pub qty_defects:     i64,
}

/// Shipment status for a lot; at most one row per lot.
/// `ship_date` is present exactly when `is_shipped` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentRecord {
  pub shipment_id: i64,
  pub lot_id:      i64,
  pub is_shipped:  bool,
  pub ship_date:   Option<NaiveDate>,
}
