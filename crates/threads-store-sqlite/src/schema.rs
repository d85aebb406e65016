//! SQL schema for the threads SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

use rusqlite::functions::FunctionFlags;

/// Register the scalar functions the queries rely on. Must run on every
/// connection before any query.
///
/// `fold_case(text)` lower-cases with full Unicode rules, matching
/// [`str::to_lowercase`]. SQLite's own `lower()` only folds ASCII.
pub fn register_functions(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    "fold_case",
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|s| s.to_lowercase())),
  )
}

/// Schema DDL. Safe to run on every open.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id     TEXT PRIMARY KEY,      -- issued by the identity provider
    username    TEXT NOT NULL UNIQUE,  -- stored lower-case
    name        TEXT NOT NULL,
    bio         TEXT NOT NULL DEFAULT '',
    image       TEXT NOT NULL DEFAULT '',
    onboarded   INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS communities (
    community_id TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    username     TEXT NOT NULL UNIQUE,
    image        TEXT NOT NULL DEFAULT '',
    bio          TEXT NOT NULL DEFAULT '',
    created_by   TEXT NOT NULL REFERENCES users(user_id),
    created_at   TEXT NOT NULL
);

-- parent_id is written once at insert and never updated.
CREATE TABLE IF NOT EXISTS threads (
    thread_id    TEXT PRIMARY KEY,
    text         TEXT NOT NULL CHECK (length(text) > 0),
    author_id    TEXT NOT NULL REFERENCES users(user_id),
    community_id TEXT REFERENCES communities(community_id) ON DELETE CASCADE,
    parent_id    TEXT REFERENCES threads(thread_id) ON DELETE CASCADE,
    created_at   TEXT NOT NULL,
    CHECK (parent_id IS NULL OR parent_id != thread_id)
);

-- One row serves both community -> members and user -> communities.
CREATE TABLE IF NOT EXISTS memberships (
    community_id TEXT NOT NULL REFERENCES communities(community_id) ON DELETE CASCADE,
    user_id      TEXT NOT NULL REFERENCES users(user_id),
    joined_at    TEXT NOT NULL,
    PRIMARY KEY (community_id, user_id)
);

CREATE INDEX IF NOT EXISTS threads_parent_idx    ON threads(parent_id);
CREATE INDEX IF NOT EXISTS threads_author_idx    ON threads(author_id);
CREATE INDEX IF NOT EXISTS threads_community_idx ON threads(community_id);
CREATE INDEX IF NOT EXISTS threads_created_idx   ON threads(created_at);
CREATE INDEX IF NOT EXISTS memberships_user_idx  ON memberships(user_id);

PRAGMA user_version = 1;
";
