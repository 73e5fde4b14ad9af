//! SQL schema for the Ramp SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Reviews are immutable once inserted. `seq` is the scan order of a fold.
CREATE TABLE IF NOT EXISTS reviews (
    seq         INTEGER PRIMARY KEY AUTOINCREMENT,
    review_id   TEXT NOT NULL UNIQUE,
    gid         TEXT NOT NULL,   -- building identifier; not a foreign key
    recorded_at TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    body        TEXT NOT NULL    -- JSON document, validated on read
);

CREATE TABLE IF NOT EXISTS buildings (
    gid  TEXT PRIMARY KEY,
    body TEXT NOT NULL
);

-- Exactly one document per building; always replaced whole.
CREATE TABLE IF NOT EXISTS aggregations (
    gid  TEXT PRIMARY KEY,
    body TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS reviews_gid_idx ON reviews(gid);

PRAGMA user_version = 1;
";
