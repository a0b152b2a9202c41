//! The `OpsStore` trait — the repository surface over the six operations
//! tables.
//!
//! The trait is implemented by storage backends (e.g.
//! `steelworks-store-sqlite`). The reporting façade depends on this
//! abstraction, not on any concrete backend.
//!
//! Reads are aggregate queries with fixed ordering and tie-breaks; repeated
//! runs against an unchanged store return identical output, order included.
//! Writes exist for the import/seed collaborator: dimension inserts,
//! append-only fact inserts, and the single permitted shipment transition.

use std::future::Future;

use chrono::NaiveDate;

use crate::{
  range::{Bucket, DateRange},
  record::{
    DefectType, InspectionRecord, Lot, ProductionLine, ProductionRecord,
    ShipmentRecord,
  },
  report::{
    DefectShare, LineDefects, LotReport, ProductionEvent, RiskLot,
    ShipmentFilter, ShipmentStatus, TrendPoint,
  },
};

/// Abstraction over an operations store backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait OpsStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Dimensions ────────────────────────────────────────────────────────

  /// Insert a lot. The lot code is unique; a duplicate is a constraint
  /// violation.
  fn add_lot<'a>(
    &'a self,
    lot_code: &'a str,
  ) -> impl Future<Output = Result<Lot, Self::Error>> + Send + 'a;

  fn add_production_line<'a>(
    &'a self,
    line_code: &'a str,
  ) -> impl Future<Output = Result<ProductionLine, Self::Error>> + Send + 'a;

  fn add_defect_type<'a>(
    &'a self,
    defect_code: &'a str,
  ) -> impl Future<Output = Result<DefectType, Self::Error>> + Send + 'a;

  /// Delete a lot; its production, inspection, and shipment rows cascade.
  fn delete_lot<'a>(
    &'a self,
    lot_code: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a production line. Rejected while production records still
  /// reference it.
  fn delete_production_line<'a>(
    &'a self,
    line_code: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Delete a defect type. Rejected while inspection records still
  /// reference it.
  fn delete_defect_type<'a>(
    &'a self,
    defect_code: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Facts — append-only writes ────────────────────────────────────────

  /// Record one production event. The referenced lot and line must already
  /// exist (no upsert-on-demand); a duplicate (lot, line, date) triple is a
  /// constraint violation.
  fn record_production<'a>(
    &'a self,
    lot_code: &'a str,
    line_code: &'a str,
    record_date: NaiveDate,
  ) -> impl Future<Output = Result<ProductionRecord, Self::Error>> + Send + 'a;

  /// Record one inspection finding. `qty_defects` of zero records a clean
  /// pass; negative quantities are a constraint violation.
  fn record_inspection<'a>(
    &'a self,
    lot_code: &'a str,
    defect_code: &'a str,
    inspection_date: NaiveDate,
    qty_defects: i64,
  ) -> impl Future<Output = Result<InspectionRecord, Self::Error>> + Send + 'a;

  /// Create the at-most-one shipment row for a lot; pending when
  /// `ship_date` is `None`. A second row for the same lot is a constraint
  /// violation.
  fn record_shipment<'a>(
    &'a self,
    lot_code: &'a str,
    ship_date: Option<NaiveDate>,
  ) -> impl Future<Output = Result<ShipmentRecord, Self::Error>> + Send + 'a;

  /// The sole permitted fact mutation: transition a lot's shipment row from
  /// pending to shipped, creating the row when absent. A row that is already
  /// shipped is final; re-marking it is a constraint violation.
  fn mark_shipped<'a>(
    &'a self,
    lot_code: &'a str,
    ship_date: NaiveDate,
  ) -> impl Future<Output = Result<ShipmentRecord, Self::Error>> + Send + 'a;

  // ── Reports ───────────────────────────────────────────────────────────

  /// Defect totals per production line within `range`, ordered by total
  /// descending, then line code ascending. Lines with no matching defects
  /// are omitted (inner-join semantics).
  fn defects_by_line(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<LineDefects>, Self::Error>> + Send + '_;

  /// Time-bucketed defect totals per type, ordered by bucket ascending,
  /// then total descending, then defect code ascending.
  fn defect_trend(
    &self,
    range: DateRange,
    bucket: Bucket,
  ) -> impl Future<Output = Result<Vec<TrendPoint>, Self::Error>> + Send + '_;

  /// Defect totals per type with their share of the range's grand total,
  /// ordered by total descending, then defect code ascending.
  fn defects_by_type(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<DefectShare>, Self::Error>> + Send + '_;

  /// Shipment status for one lot. `None` when the lot itself is absent; a
  /// lot with no shipment row reports unshipped with no date.
  fn shipment_status<'a>(
    &'a self,
    lot_code: &'a str,
  ) -> impl Future<Output = Result<Option<ShipmentStatus>, Self::Error>>
  + Send
  + 'a;

  /// Shipment status for all lots (left-join semantics), ordered by lot
  /// code, optionally filtered to pending or shipped lots.
  fn shipment_overview(
    &self,
    filter: Option<ShipmentFilter>,
  ) -> impl Future<Output = Result<Vec<ShipmentStatus>, Self::Error>> + Send + '_;

  /// Full production/inspection/shipment drill-down for one lot. `None`
  /// when the lot is absent; a lot with no fact rows yields an empty report.
  fn lot_drilldown<'a>(
    &'a self,
    lot_code: &'a str,
  ) -> impl Future<Output = Result<Option<LotReport>, Self::Error>> + Send + 'a;

  /// Lots that shipped despite at least one inspection with defects,
  /// ordered by ship date descending, then total descending, then lot code
  /// ascending.
  fn risk_report(
    &self,
  ) -> impl Future<Output = Result<Vec<RiskLot>, Self::Error>> + Send + '_;

  /// Production events within `range`, ordered by date, then line code,
  /// then lot code.
  fn production_summary(
    &self,
    range: DateRange,
  ) -> impl Future<Output = Result<Vec<ProductionEvent>, Self::Error>>
  + Send
  + '_;
}
