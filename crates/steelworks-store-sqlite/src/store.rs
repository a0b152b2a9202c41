//! [`SqliteStore`] — the SQLite implementation of [`OpsStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, params};

use steelworks_core::{
  range::{Bucket, DateRange},
  record::{
    DefectType, InspectionRecord, Lot, ProductionLine, ProductionRecord,
    ShipmentRecord,
  },
  report::{
    DefectShare, LineDefects, LotReport, ProductionEvent, RiskLot,
    ShipmentFilter, ShipmentStatus, TrendPoint,
  },
  store::OpsStore,
};

use crate::{
  Error, Result,
  encode::{
    RawLotReport, RawShipmentStatus, RawTrendPoint, decode_date, encode_date,
  },
  schema::SCHEMA,
};

// ─── SQL shapes ──────────────────────────────────────────────────────────────

// Defect totals per line. Joining distinct (lot, line) production pairs
// keeps a lot produced on the same line on several dates from being counted
// more than once per line.
const DEFECTS_BY_LINE_SQL: &str = "
  SELECT pl.line_code, SUM(i.qty_defects) AS total_defects
  FROM (SELECT DISTINCT lot_id, line_id FROM production_records) pr
  JOIN production_lines pl ON pl.line_id = pr.line_id
  JOIN inspection_records i ON i.lot_id = pr.lot_id
  WHERE i.inspection_date >= ?1 AND i.inspection_date <= ?2
  GROUP BY pl.line_code
  ORDER BY total_defects DESC, pl.line_code ASC";

// The two trend shapes differ only in the bucket expression: the inspection
// date itself, or the Monday of its ISO week ('-6 days' then forward to the
// next Monday is a no-op when the date already is one).
const TREND_DAY_SQL: &str = "
  SELECT i.inspection_date AS bucket_start,
         d.defect_code,
         SUM(i.qty_defects) AS total_defects,
         SUM(SUM(i.qty_defects))
           OVER (PARTITION BY i.inspection_date) AS bucket_total
  FROM inspection_records i
  JOIN defect_types d ON d.defect_type_id = i.defect_type_id
  WHERE i.inspection_date >= ?1 AND i.inspection_date <= ?2
  GROUP BY i.inspection_date, d.defect_code
  ORDER BY bucket_start ASC, total_defects DESC, d.defect_code ASC";

const TREND_WEEK_SQL: &str = "
  SELECT date(i.inspection_date, '-6 days', 'weekday 1') AS bucket_start,
         d.defect_code,
         SUM(i.qty_defects) AS total_defects,
         SUM(SUM(i.qty_defects))
           OVER (PARTITION BY date(i.inspection_date, '-6 days', 'weekday 1'))
           AS bucket_total
  FROM inspection_records i
  JOIN defect_types d ON d.defect_type_id = i.defect_type_id
  WHERE i.inspection_date >= ?1 AND i.inspection_date <= ?2
  GROUP BY date(i.inspection_date, '-6 days', 'weekday 1'), d.defect_code
  ORDER BY bucket_start ASC, total_defects DESC, d.defect_code ASC";

// Per-type totals with their share of the grand total over the same filter.
// The CASE keeps an all-zero range from dividing by zero.
const DEFECTS_BY_TYPE_SQL: &str = "
  SELECT d.defect_code,
         SUM(i.qty_defects) AS total_defects,
         CASE WHEN t.grand_total = 0 THEN 0.0
              ELSE ROUND(SUM(i.qty_defects) * 100.0 / t.grand_total, 2)
         END AS percentage
  FROM inspection_records i
  JOIN defect_types d ON d.defect_type_id = i.defect_type_id
  JOIN (SELECT COALESCE(SUM(qty_defects), 0) AS grand_total
          FROM inspection_records
         WHERE inspection_date >= ?1 AND inspection_date <= ?2) t
  WHERE i.inspection_date >= ?1 AND i.inspection_date <= ?2
  GROUP BY d.defect_code, t.grand_total
  ORDER BY total_defects DESC, d.defect_code ASC";

const OVERVIEW_ALL_SQL: &str = "
  SELECT l.lot_code, COALESCE(s.is_shipped, 0) AS is_shipped, s.ship_date
  FROM lots l
  LEFT JOIN shipment_records s ON s.lot_id = l.lot_id
  ORDER BY l.lot_code ASC";

// A lot with no shipment row at all counts as pending.
const OVERVIEW_PENDING_SQL: &str = "
  SELECT l.lot_code, COALESCE(s.is_shipped, 0) AS is_shipped, s.ship_date
  FROM lots l
  LEFT JOIN shipment_records s ON s.lot_id = l.lot_id
  WHERE COALESCE(s.is_shipped, 0) = 0
  ORDER BY l.lot_code ASC";

const OVERVIEW_SHIPPED_SQL: &str = "
  SELECT l.lot_code, s.is_shipped, s.ship_date
  FROM lots l
  JOIN shipment_records s ON s.lot_id = l.lot_id
  WHERE s.is_shipped = 1
  ORDER BY l.lot_code ASC";

// Shipped lots with at least one inspection that found defects. The HAVING
// predicate ignores zero-defect passes without dropping them from the sum.
const RISK_REPORT_SQL: &str = "
  SELECT l.lot_code, s.ship_date, SUM(i.qty_defects) AS total_defects
  FROM shipment_records s
  JOIN lots l ON l.lot_id = s.lot_id
  JOIN inspection_records i ON i.lot_id = s.lot_id
  WHERE s.is_shipped = 1
  GROUP BY l.lot_code, s.ship_date
  HAVING MAX(i.qty_defects) > 0
  ORDER BY s.ship_date DESC, total_defects DESC, l.lot_code ASC";

const PRODUCTION_SUMMARY_SQL: &str = "
  SELECT pr.record_date, pl.line_code, l.lot_code
  FROM production_records pr
  JOIN lots l ON l.lot_id = pr.lot_id
  JOIN production_lines pl ON pl.line_id = pr.line_id
  WHERE pr.record_date >= ?1 AND pr.record_date <= ?2
  ORDER BY pr.record_date ASC, pl.line_code ASC, l.lot_code ASC";

// ─── Store ───────────────────────────────────────────────────────────────────

/// An operations store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Map constraint failures onto [`Error::ConstraintViolation`] so the caller
/// sees SQLite's message verbatim; everything else stays a database error.
fn db_err(err: tokio_rusqlite::Error) -> Error {
  match err {
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, msg))
      if e.code == rusqlite::ErrorCode::ConstraintViolation =>
    {
      Error::ConstraintViolation(msg.unwrap_or_else(|| e.to_string()))
    }
    other => Error::Database(other),
  }
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Look up a surrogate key by business code. `sql` must select exactly the
  /// id column and take the code as `?1`.
  async fn lookup_id(&self, sql: &'static str, code: &str) -> Result<Option<i64>> {
    let code = code.to_owned();
    let id = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(sql, params![code], |row| row.get(0)).optional()?)
      })
      .await?;
    Ok(id)
  }

  async fn require_lot_id(&self, lot_code: &str) -> Result<i64> {
    self
      .lookup_id("SELECT lot_id FROM lots WHERE lot_code = ?1", lot_code)
      .await?
      .ok_or_else(|| Error::LotNotFound(lot_code.to_owned()))
  }

  async fn require_line_id(&self, line_code: &str) -> Result<i64> {
    self
      .lookup_id(
        "SELECT line_id FROM production_lines WHERE line_code = ?1",
        line_code,
      )
      .await?
      .ok_or_else(|| Error::LineNotFound(line_code.to_owned()))
  }

  async fn require_defect_type_id(&self, defect_code: &str) -> Result<i64> {
    self
      .lookup_id(
        "SELECT defect_type_id FROM defect_types WHERE defect_code = ?1",
        defect_code,
      )
      .await?
      .ok_or_else(|| Error::DefectTypeNotFound(defect_code.to_owned()))
  }

  /// Insert one row and return its rowid, mapping constraint failures.
  async fn insert_row(
    &self,
    sql: &'static str,
    bind: Vec<rusqlite::types::Value>,
  ) -> Result<i64> {
    self
      .conn
      .call(move |conn| {
        conn.execute(sql, rusqlite::params_from_iter(bind))?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(db_err)
  }
}

// ─── OpsStore impl ───────────────────────────────────────────────────────────

impl OpsStore for SqliteStore {
  type Error = Error;

  // ── Dimensions ────────────────────────────────────────────────────────

  async fn add_lot(&self, lot_code: &str) -> Result<Lot> {
    let lot_id = self
      .insert_row("INSERT INTO lots (lot_code) VALUES (?1)", vec![
        lot_code.to_owned().into(),
      ])
      .await?;
    Ok(Lot { lot_id, lot_code: lot_code.to_owned() })
  }

  async fn add_production_line(&self, line_code: &str) -> Result<ProductionLine> {
    let line_id = self
      .insert_row("INSERT INTO production_lines (line_code) VALUES (?1)", vec![
        line_code.to_owned().into(),
      ])
      .await?;
    Ok(ProductionLine { line_id, line_code: line_code.to_owned() })
  }

  async fn add_defect_type(&self, defect_code: &str) -> Result<DefectType> {
    let defect_type_id = self
      .insert_row("INSERT INTO defect_types (defect_code) VALUES (?1)", vec![
        defect_code.to_owned().into(),
      ])
      .await?;
    Ok(DefectType { defect_type_id, defect_code: defect_code.to_owned() })
  }

  async fn delete_lot(&self, lot_code: &str) -> Result<()> {
    let lot_id = self.require_lot_id(lot_code).await?;
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM lots WHERE lot_id = ?1", params![lot_id])?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }

  async fn delete_production_line(&self, line_code: &str) -> Result<()> {
    let line_id = self.require_line_id(line_code).await?;
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM production_lines WHERE line_id = ?1", params![
          line_id
        ])?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }

  async fn delete_defect_type(&self, defect_code: &str) -> Result<()> {
    let defect_type_id = self.require_defect_type_id(defect_code).await?;
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM defect_types WHERE defect_type_id = ?1", params![
          defect_type_id
        ])?;
        Ok(())
      })
      .await
      .map_err(db_err)
  }

  // ── Facts — append-only writes ────────────────────────────────────────

  async fn record_production(
    &self,
    lot_code: &str,
    line_code: &str,
    record_date: chrono::NaiveDate,
  ) -> Result<ProductionRecord> {
    let lot_id = self.require_lot_id(lot_code).await?;
    let line_id = self.require_line_id(line_code).await?;
    let record_id = self
      .insert_row(
        "INSERT INTO production_records (lot_id, line_id, record_date)
         VALUES (?1, ?2, ?3)",
        vec![lot_id.into(), line_id.into(), encode_date(record_date).into()],
      )
      .await?;
    Ok(ProductionRecord { record_id, lot_id, line_id, record_date })
  }

  async fn record_inspection(
    &self,
    lot_code: &str,
    defect_code: &str,
    inspection_date: chrono::NaiveDate,
    qty_defects: i64,
  ) -> Result<InspectionRecord> {
    let lot_id = self.require_lot_id(lot_code).await?;
    let defect_type_id = self.require_defect_type_id(defect_code).await?;
    let inspection_id = self
      .insert_row(
        "INSERT INTO inspection_records
           (lot_id, defect_type_id, inspection_date, qty_defects)
         VALUES (?1, ?2, ?3, ?4)",
        vec![
          lot_id.into(),
          defect_type_id.into(),
          encode_date(inspection_date).into(),
          qty_defects.into(),
        ],
      )
      .await?;
    Ok(InspectionRecord {
      inspection_id,
      lot_id,
      defect_type_id,
      inspection_date,
      qty_defects,
    })
  }

  async fn record_shipment(
    &self,
    lot_code: &str,
    ship_date: Option<chrono::NaiveDate>,
  ) -> Result<ShipmentRecord> {
    let lot_id = self.require_lot_id(lot_code).await?;
    let is_shipped = ship_date.is_some();
    let shipment_id = self
      .insert_row(
        "INSERT INTO shipment_records (lot_id, is_shipped, ship_date)
         VALUES (?1, ?2, ?3)",
        vec![
          lot_id.into(),
          i64::from(is_shipped).into(),
          match ship_date {
            Some(date) => encode_date(date).into(),
            None => rusqlite::types::Value::Null,
          },
        ],
      )
      .await?;
    Ok(ShipmentRecord { shipment_id, lot_id, is_shipped, ship_date })
  }

  async fn mark_shipped(
    &self,
    lot_code: &str,
    ship_date: chrono::NaiveDate,
  ) -> Result<ShipmentRecord> {
    let lot_id = self.require_lot_id(lot_code).await?;
    let date = encode_date(ship_date);
    let shipment_id = self
      .conn
      .call(move |conn| {
        let existing: Option<(i64, i64)> = conn
          .query_row(
            "SELECT shipment_id, is_shipped FROM shipment_records
             WHERE lot_id = ?1",
            params![lot_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;

        match existing {
          // Only pending -> shipped is permitted; a shipped row is final.
          Some((_, 1)) => Ok(None),
          Some((shipment_id, _)) => {
            conn.execute(
              "UPDATE shipment_records SET is_shipped = 1, ship_date = ?1
               WHERE shipment_id = ?2 AND is_shipped = 0",
              params![date, shipment_id],
            )?;
            Ok(Some(shipment_id))
          }
          None => {
            conn.execute(
              "INSERT INTO shipment_records (lot_id, is_shipped, ship_date)
               VALUES (?1, 1, ?2)",
              params![lot_id, date],
            )?;
            Ok(Some(conn.last_insert_rowid()))
          }
        }
      })
      .await
      .map_err(db_err)?;
    let Some(shipment_id) = shipment_id else {
      return Err(Error::ConstraintViolation(format!(
        "lot {lot_code:?} is already shipped"
      )));
    };
    Ok(ShipmentRecord {
      shipment_id,
      lot_id,
      is_shipped: true,
      ship_date: Some(ship_date),
    })
  }

  // ── Reports ───────────────────────────────────────────────────────────

  async fn defects_by_line(&self, range: DateRange) -> Result<Vec<LineDefects>> {
    let start = encode_date(range.start());
    let end = encode_date(range.end());

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(DEFECTS_BY_LINE_SQL)?;
        let rows = stmt
          .query_map(params![start, end], |row| {
            Ok(LineDefects { line_code: row.get(0)?, total_defects: row.get(1)? })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn defect_trend(
    &self,
    range: DateRange,
    bucket: Bucket,
  ) -> Result<Vec<TrendPoint>> {
    let sql = match bucket {
      Bucket::Day => TREND_DAY_SQL,
      Bucket::Week => TREND_WEEK_SQL,
    };
    let start = encode_date(range.start());
    let end = encode_date(range.end());

    let raws: Vec<RawTrendPoint> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map(params![start, end], |row| {
            Ok(RawTrendPoint {
              bucket_start:  row.get(0)?,
              defect_code:   row.get(1)?,
              total_defects: row.get(2)?,
              bucket_total:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTrendPoint::into_point).collect()
  }

  async fn defects_by_type(&self, range: DateRange) -> Result<Vec<DefectShare>> {
    let start = encode_date(range.start());
    let end = encode_date(range.end());

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(DEFECTS_BY_TYPE_SQL)?;
        let rows = stmt
          .query_map(params![start, end], |row| {
            Ok(DefectShare {
              defect_code:   row.get(0)?,
              total_defects: row.get(1)?,
              percentage:    row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  async fn shipment_status(
    &self,
    lot_code: &str,
  ) -> Result<Option<ShipmentStatus>> {
    let code = lot_code.to_owned();

    let raw: Option<RawShipmentStatus> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT l.lot_code, COALESCE(s.is_shipped, 0), s.ship_date
               FROM lots l
               LEFT JOIN shipment_records s ON s.lot_id = l.lot_id
               WHERE l.lot_code = ?1",
              params![code],
              |row| {
                Ok(RawShipmentStatus {
                  lot_code:   row.get(0)?,
                  is_shipped: row.get(1)?,
                  ship_date:  row.get(2)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawShipmentStatus::into_status).transpose()
  }

  async fn shipment_overview(
    &self,
    filter: Option<ShipmentFilter>,
  ) -> Result<Vec<ShipmentStatus>> {
    let sql = match filter {
      None => OVERVIEW_ALL_SQL,
      Some(ShipmentFilter::Pending) => OVERVIEW_PENDING_SQL,
      Some(ShipmentFilter::Shipped) => OVERVIEW_SHIPPED_SQL,
    };

    let raws: Vec<RawShipmentStatus> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawShipmentStatus {
              lot_code:   row.get(0)?,
              is_shipped: row.get(1)?,
              ship_date:  row.get(2)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawShipmentStatus::into_status).collect()
  }

  async fn lot_drilldown(&self, lot_code: &str) -> Result<Option<LotReport>> {
    let code = lot_code.to_owned();

    let raw: Option<RawLotReport> = self
      .conn
      .call(move |conn| {
        let lot: Option<(i64, String)> = conn
          .query_row(
            "SELECT lot_id, lot_code FROM lots WHERE lot_code = ?1",
            params![code],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;
        let Some((lot_id, lot_code)) = lot else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(
          "SELECT pl.line_code, pr.record_date
           FROM production_records pr
           JOIN production_lines pl ON pl.line_id = pr.line_id
           WHERE pr.lot_id = ?1
           ORDER BY pr.record_date ASC, pl.line_code ASC",
        )?;
        let production: Vec<(String, String)> = stmt
          .query_map(params![lot_id], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut stmt = conn.prepare(
          "SELECT d.defect_code, i.inspection_date, i.qty_defects
           FROM inspection_records i
           JOIN defect_types d ON d.defect_type_id = i.defect_type_id
           WHERE i.lot_id = ?1
           ORDER BY i.inspection_date ASC, d.defect_code ASC",
        )?;
        let inspections: Vec<(String, String, i64)> = stmt
          .query_map(params![lot_id], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        let total_defects: i64 = conn.query_row(
          "SELECT COALESCE(SUM(qty_defects), 0)
           FROM inspection_records WHERE lot_id = ?1",
          params![lot_id],
          |row| row.get(0),
        )?;

        let shipment: Option<(i64, Option<String>)> = conn
          .query_row(
            "SELECT is_shipped, ship_date FROM shipment_records
             WHERE lot_id = ?1",
            params![lot_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
          )
          .optional()?;
        let (is_shipped, ship_date) = shipment.unwrap_or((0, None));

        Ok(Some(RawLotReport {
          lot_code,
          production,
          inspections,
          total_defects,
          is_shipped,
          ship_date,
        }))
      })
      .await?;

    raw.map(RawLotReport::into_report).transpose()
  }

  async fn risk_report(&self) -> Result<Vec<RiskLot>> {
    let rows: Vec<(String, String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(RISK_REPORT_SQL)?;
        let rows = stmt
          .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(lot_code, ship_date, total_defects)| {
        Ok(RiskLot {
          lot_code,
          ship_date: decode_date(&ship_date)?,
          total_defects,
        })
      })
      .collect()
  }

  async fn production_summary(
    &self,
    range: DateRange,
  ) -> Result<Vec<ProductionEvent>> {
    let start = encode_date(range.start());
    let end = encode_date(range.end());

    let rows: Vec<(String, String, String)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(PRODUCTION_SUMMARY_SQL)?;
        let rows = stmt
          .query_map(params![start, end], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    rows
      .into_iter()
      .map(|(record_date, line_code, lot_code)| {
        Ok(ProductionEvent {
          record_date: decode_date(&record_date)?,
          line_code,
          lot_code,
        })
      })
      .collect()
  }
}
