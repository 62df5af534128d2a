//! SQL schema for the sales SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per order document. `id` gives the natural retrieval order and
-- decides which document is the first match for a duplicated order_id.
CREATE TABLE IF NOT EXISTS orders (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    doc  TEXT    NOT NULL CHECK (json_valid(doc))
);

-- Key specification of every index created through the store, so that
-- listing can report field and direction without parsing DDL.
CREATE TABLE IF NOT EXISTS order_indexes (
    name       TEXT    PRIMARY KEY,
    field      TEXT    NOT NULL,
    direction  INTEGER NOT NULL CHECK (direction IN (1, -1))
);

PRAGMA user_version = 1;
";
