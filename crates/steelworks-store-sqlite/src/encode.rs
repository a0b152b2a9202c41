//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Calendar dates are stored as ISO 8601 `YYYY-MM-DD` strings. Booleans are
//! stored as 0/1 integers.

use chrono::NaiveDate;
use steelworks_core::report::{LotReport, ShipmentStatus, TrendPoint};

use crate::{Error, Result};

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(date: NaiveDate) -> String {
  date.format("%Y-%m-%d").to_string()
}

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

pub fn decode_date_opt(s: Option<&str>) -> Result<Option<NaiveDate>> {
  s.map(decode_date).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns of one lot's shipment status (left-join of `lots` against
/// `shipment_records`).
pub struct RawShipmentStatus {
  pub lot_code:   String,
  pub is_shipped: i64,
  pub ship_date:  Option<String>,
}

impl RawShipmentStatus {
  pub fn into_status(self) -> Result<ShipmentStatus> {
    Ok(ShipmentStatus {
      lot_code:   self.lot_code,
      is_shipped: self.is_shipped != 0,
      ship_date:  decode_date_opt(self.ship_date.as_deref())?,
    })
  }
}

/// Raw columns of one defect-trend row.
pub struct RawTrendPoint {
  pub bucket_start:  String,
  pub defect_code:   String,
  pub total_defects: i64,
  pub bucket_total:  i64,
}

impl RawTrendPoint {
  pub fn into_point(self) -> Result<TrendPoint> {
    Ok(TrendPoint {
      bucket_start:  decode_date(&self.bucket_start)?,
      defect_code:   self.defect_code,
      total_defects: self.total_defects,
      bucket_total:  self.bucket_total,
    })
  }
}

/// Raw drill-down data for one lot, gathered in a single connection call.
pub struct RawLotReport {
  pub lot_code:      String,
  /// (line_code, record_date) ordered by date, then line.
  pub production:    Vec<(String, String)>,
  /// (defect_code, inspection_date, qty_defects) ordered by date, then code.
  pub inspections:   Vec<(String, String, i64)>,
  pub total_defects: i64,
  pub is_shipped:    i64,
  pub ship_date:     Option<String>,
}

impl RawLotReport {
  pub fn into_report(self) -> Result<LotReport> {
    use steelworks_core::report::{LotInspection, LotProduction};

    let production = self
      .production
      .into_iter()
      .map(|(line_code, date)| {
        Ok(LotProduction { line_code, record_date: decode_date(&date)? })
      })
      .collect::<Result<Vec<_>>>()?;

    let inspections = self
      .inspections
      .into_iter()
      .map(|(defect_code, date, qty_defects)| {
        Ok(LotInspection {
          defect_code,
          inspection_date: decode_date(&date)?,
          qty_defects,
        })
      })
      .collect::<Result<Vec<_>>>()?;

    let shipment = ShipmentStatus {
      lot_code:   self.lot_code.clone(),
      is_shipped: self.is_shipped != 0,
      ship_date:  decode_date_opt(self.ship_date.as_deref())?,
    };

    // Production rows are date-ordered, so the first row holds the earliest
    // production date.
    let days_to_ship = match (shipment.ship_date, production.first()) {
      (Some(shipped), Some(first)) => {
        Some((shipped - first.record_date).num_days())
      }
      _ => None,
    };

    Ok(LotReport {
      lot_code: self.lot_code,
      production,
      inspections,
      total_defects: self.total_defects,
      shipment,
      days_to_ship,
    })
  }
}
