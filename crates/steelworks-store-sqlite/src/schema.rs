//! SQL schema for the operations SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Calendar dates are stored as ISO 8601 `YYYY-MM-DD` strings, which sort
/// lexicographically in date order, so range filters and ORDER BY work on
/// the raw column.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Dimension tables: created by import/seed, never mutated, rarely deleted.

CREATE TABLE IF NOT EXISTS lots (
    lot_id   INTEGER PRIMARY KEY,
    lot_code TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS production_lines (
    line_id   INTEGER PRIMARY KEY,
    line_code TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS defect_types (
    defect_type_id INTEGER PRIMARY KEY,
    defect_code    TEXT NOT NULL UNIQUE
);

-- Fact tables. Production and inspection rows are append-only; deleting a
-- lot cascades to them, while a referenced line or defect type cannot be
-- deleted.

CREATE TABLE IF NOT EXISTS production_records (
    record_id   INTEGER PRIMARY KEY,
    lot_id      INTEGER NOT NULL
                REFERENCES lots(lot_id) ON DELETE CASCADE,
    line_id     INTEGER NOT NULL
                REFERENCES production_lines(line_id) ON DELETE RESTRICT,
    record_date TEXT NOT NULL,
    UNIQUE (lot_id, line_id, record_date)
);

CREATE TABLE IF NOT EXISTS inspection_records (
    inspection_id   INTEGER PRIMARY KEY,
    lot_id          INTEGER NOT NULL
                    REFERENCES lots(lot_id) ON DELETE CASCADE,
    defect_type_id  INTEGER NOT NULL
                    REFERENCES defect_types(defect_type_id) ON DELETE RESTRICT,
    inspection_date TEXT NOT NULL,
    qty_defects     INTEGER NOT NULL CHECK (qty_defects >= 0)
);

-- At most one shipment row per lot. The ship date is present exactly when
-- the lot is shipped; the transition pending -> shipped is the only UPDATE
-- ever issued against this table.
CREATE TABLE IF NOT EXISTS shipment_records (
    shipment_id INTEGER PRIMARY KEY,
    lot_id      INTEGER NOT NULL UNIQUE
                REFERENCES lots(lot_id) ON DELETE CASCADE,
    is_shipped  INTEGER NOT NULL CHECK (is_shipped IN (0, 1)),
    ship_date   TEXT,
    CHECK ((is_shipped = 1 AND ship_date IS NOT NULL)
        OR (is_shipped = 0 AND ship_date IS NULL))
);

CREATE INDEX IF NOT EXISTS production_records_date_idx
    ON production_records(record_date);
CREATE INDEX IF NOT EXISTS production_records_line_date_idx
    ON production_records(line_id, record_date);
CREATE INDEX IF NOT EXISTS inspection_records_date_idx
    ON inspection_records(inspection_date);
CREATE INDEX IF NOT EXISTS inspection_records_lot_date_idx
    ON inspection_records(lot_id, inspection_date);
CREATE INDEX IF NOT EXISTS inspection_records_type_date_idx
    ON inspection_records(defect_type_id, inspection_date);
CREATE INDEX IF NOT EXISTS shipment_records_shipped_idx
    ON shipment_records(is_shipped);

PRAGMA user_version = 1;
";
