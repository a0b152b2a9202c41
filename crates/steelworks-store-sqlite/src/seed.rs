//! Sample January-2024 dataset for demos and tests.
//!
//! Mirrors the seed data the import collaborator would load: three lines,
//! four defect types, six lots in various shipment states, including a
//! zero-defect inspection pass and a lot with no shipment row at all.

use chrono::NaiveDate;
use steelworks_core::store::OpsStore;

use crate::{Result, SqliteStore};

fn d(year: i32, month: u32, day: u32) -> NaiveDate {
  // Seed dates are compile-time constants; from_ymd_opt never fails here.
  NaiveDate::from_ymd_opt(year, month, day).expect("valid seed date")
}

/// Load the sample dataset into an empty store.
pub async fn seed_sample(store: &SqliteStore) -> Result<()> {
  for line in ["LINE-A", "LINE-B", "LINE-C"] {
    store.add_production_line(line).await?;
  }
  for defect in [
    "DIMENSION-OOT",
    "MATERIAL-FLAW",
    "SURFACE-SCRATCH",
    "WELD-POROSITY",
  ] {
    store.add_defect_type(defect).await?;
  }
  for lot in [
    "LOT-2024-01-001",
    "LOT-2024-01-002",
    "LOT-2024-01-003",
    "LOT-2024-01-004",
    "LOT-2024-01-005",
    "LOT-2024-01-006",
  ] {
    store.add_lot(lot).await?;
  }

  // Lot 001: shipped with a minor scratch finding.
  store
    .record_production("LOT-2024-01-001", "LINE-A", d(2024, 1, 2))
    .await?;
  store
    .record_inspection("LOT-2024-01-001", "SURFACE-SCRATCH", d(2024, 1, 3), 2)
    .await?;
  store.mark_shipped("LOT-2024-01-001", d(2024, 1, 8)).await?;

  // Lot 002: pending shipment, worst defect counts of the month.
  store
    .record_production("LOT-2024-01-002", "LINE-A", d(2024, 1, 3))
    .await?;
  store
    .record_inspection("LOT-2024-01-002", "DIMENSION-OOT", d(2024, 1, 5), 5)
    .await?;
  store
    .record_inspection("LOT-2024-01-002", "SURFACE-SCRATCH", d(2024, 1, 5), 1)
    .await?;
  store.record_shipment("LOT-2024-01-002", None).await?;

  // Lot 003: shipped despite two findings on the same inspection day.
  store
    .record_production("LOT-2024-01-003", "LINE-C", d(2024, 1, 2))
    .await?;
  store
    .record_inspection("LOT-2024-01-003", "SURFACE-SCRATCH", d(2024, 1, 4), 3)
    .await?;
  store
    .record_inspection("LOT-2024-01-003", "MATERIAL-FLAW", d(2024, 1, 4), 1)
    .await?;
  store.mark_shipped("LOT-2024-01-003", d(2024, 1, 10)).await?;

  // Lot 004: clean pass (zero defects) and shipped.
  store
    .record_production("LOT-2024-01-004", "LINE-B", d(2024, 1, 5))
    .await?;
  store
    .record_inspection("LOT-2024-01-004", "WELD-POROSITY", d(2024, 1, 6), 0)
    .await?;
  store.mark_shipped("LOT-2024-01-004", d(2024, 1, 9)).await?;

  // Lot 005: inspected but never given a shipment row.
  store
    .record_production("LOT-2024-01-005", "LINE-B", d(2024, 1, 8))
    .await?;
  store
    .record_inspection("LOT-2024-01-005", "DIMENSION-OOT", d(2024, 1, 9), 4)
    .await?;

  // Lot 006: produced, not yet inspected, pending shipment.
  store
    .record_production("LOT-2024-01-006", "LINE-C", d(2024, 1, 10))
    .await?;
  store.record_shipment("LOT-2024-01-006", None).await?;

  Ok(())
}
