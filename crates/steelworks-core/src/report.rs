//! Report row types returned by the store, and the display-side trend
//! grouping.
//!
//! Rows arrive from the store already aggregated and ordered; nothing here
//! re-aggregates. [`TrendBucket::group`] only folds the store's flat trend
//! rows into per-bucket objects and labels each bucket against its
//! predecessor.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Per-report rows ─────────────────────────────────────────────────────────

/// One row of the defects-by-line report: total defects found in lots
/// produced on a line, within the requested range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDefects {
  pub line_code:     String,
  pub total_defects: i64,
}

/// One row of the defect trend: defects of one type in one time bucket.
/// `bucket_total` is the sum across all types in the same bucket, computed
/// by the store's window aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
  pub bucket_start:  NaiveDate,
  pub defect_code:   String,
  pub total_defects: i64,
  pub bucket_total:  i64,
}

/// One row of the defects-by-type report. `percentage` is the row's share of
/// the grand total over the same range, 0.0 when that total is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefectShare {
  pub defect_code:   String,
  pub total_defects: i64,
  pub percentage:    f64,
}

/// Shipment status for one lot. A lot with no shipment row reports
/// `is_shipped: false, ship_date: None` — that is an answer, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentStatus {
  pub lot_code:   String,
  pub is_shipped: bool,
  pub ship_date:  Option<NaiveDate>,
}

/// Filter for the shipment overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShipmentFilter {
  Pending,
  Shipped,
}

/// One production event of the lot being drilled into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotProduction {
  pub line_code:   String,
  pub record_date: NaiveDate,
}

/// One inspection finding of the lot being drilled into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotInspection {
  pub defect_code:     String,
  pub inspection_date: NaiveDate,
  pub qty_defects:     i64,
}

/// The full cross-department drill-down for one lot: production, inspection,
/// and shipment data side by side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotReport {
  pub lot_code:      String,
  /// Ordered by record date, then line code.
  pub production:    Vec<LotProduction>,
  /// Ordered by inspection date, then defect code.
  pub inspections:   Vec<LotInspection>,
  pub total_defects: i64,
  pub shipment:      ShipmentStatus,
  /// Days between the earliest production date and the ship date, when both
  /// exist.
  pub days_to_ship:  Option<i64>,
}

/// One row of the risk report: a lot that shipped despite recorded defects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLot {
  pub lot_code:      String,
  pub ship_date:     NaiveDate,
  pub total_defects: i64,
}

/// One row of the production summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionEvent {
  pub record_date: NaiveDate,
  pub line_code:   String,
  pub lot_code:    String,
}

// ─── Trend grouping ──────────────────────────────────────────────────────────

/// How a bucket's total compares to the previous bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
  Baseline,
  Increasing,
  Decreasing,
  Stable,
}

/// Per-type share of one trend bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendEntry {
  pub defect_code:   String,
  pub total_defects: i64,
}

/// One time bucket of the defect trend, with its per-type breakdown and a
/// direction label relative to the previous bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendBucket {
  pub bucket_start:  NaiveDate,
  pub total_defects: i64,
  pub direction:     TrendDirection,
  pub by_type:       Vec<TrendEntry>,
}

impl TrendBucket {
  /// Fold flat trend rows into per-bucket objects.
  ///
  /// `points` must already be ordered by bucket start (the store guarantees
  /// this); the per-type order within each bucket is preserved as delivered.
  pub fn group(points: Vec<TrendPoint>) -> Vec<TrendBucket> {
    let mut buckets: Vec<TrendBucket> = Vec::new();
    for point in points {
      let entry = TrendEntry {
        defect_code:   point.defect_code,
        total_defects: point.total_defects,
      };
      match buckets.last_mut() {
        Some(bucket) if bucket.bucket_start == point.bucket_start => {
          bucket.by_type.push(entry);
        }
        _ => {
          let direction = match buckets.last() {
            None => TrendDirection::Baseline,
            Some(prev) if point.bucket_total > prev.total_defects => {
              TrendDirection::Increasing
            }
            Some(prev) if point.bucket_total < prev.total_defects => {
              TrendDirection::Decreasing
            }
            Some(_) => TrendDirection::Stable,
          };
          buckets.push(TrendBucket {
            bucket_start: point.bucket_start,
            total_defects: point.bucket_total,
            direction,
            by_type: vec![entry],
          });
        }
      }
    }
    buckets
  }
}
