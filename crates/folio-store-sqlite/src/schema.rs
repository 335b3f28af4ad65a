//! SQL schema for the Folio SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS pages (
    uuid             TEXT PRIMARY KEY,
    slug             TEXT NOT NULL UNIQUE,
    name             TEXT NOT NULL,
    archive_date     TEXT,  -- YYYY-MM-DD; date of the historical subject
    last_revision_id TEXT REFERENCES revisions(uuid),
    deleted_at       TEXT   -- RFC 3339 UTC; soft delete, history preserved
);

-- Revisions are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS revisions (
    uuid      TEXT PRIMARY KEY,
    page_id   TEXT NOT NULL REFERENCES pages(uuid),
    date_time TEXT NOT NULL,  -- RFC 3339 UTC micros; store-assigned,
                              -- strictly increasing per page
    author    TEXT NOT NULL
);

-- Checkpoints only; removable without losing any reconstructable content.
CREATE TABLE IF NOT EXISTS snapshots (
    uuid     TEXT PRIMARY KEY,
    page     TEXT NOT NULL REFERENCES pages(uuid),
    revision TEXT NOT NULL REFERENCES revisions(uuid)
);

CREATE TABLE IF NOT EXISTS categories (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    slug TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS page_categories (
    page_id     TEXT    NOT NULL REFERENCES pages(uuid),
    category_id INTEGER NOT NULL REFERENCES categories(id),
    UNIQUE (page_id, category_id)
);

CREATE INDEX IF NOT EXISTS revisions_page_idx ON revisions(page_id);
CREATE INDEX IF NOT EXISTS revisions_time_idx ON revisions(date_time);
CREATE INDEX IF NOT EXISTS snapshots_page_idx ON snapshots(page);

PRAGMA user_version = 1;
";
