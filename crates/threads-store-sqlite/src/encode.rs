//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order matches chronological order. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use threads_core::{community::Community, thread::Thread, user::User};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Column lists ────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "user_id, username, name, bio, image, onboarded, created_at";

pub const THREAD_COLUMNS: &str =
  "thread_id, text, author_id, community_id, parent_id, created_at";

pub const COMMUNITY_COLUMNS: &str =
  "community_id, name, username, image, bio, created_by, created_at";

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── LIKE patterns ───────────────────────────────────────────────────────────

/// Build a case-folded `LIKE` pattern matching `text` anywhere. `%`, `_` and
/// `\` in the input match literally (use with `ESCAPE '\'`).
pub fn contains_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.to_lowercase().chars() {
    if matches!(c, '%' | '_' | '\\') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

/// Encode ids as a single JSON array parameter, expanded in SQL with
/// `IN (SELECT value FROM json_each(?n))`. One bind regardless of length.
pub fn encode_id_list(ids: &[String]) -> Result<String> {
  Ok(serde_json::to_string(ids)?)
}

/// Clamp a row count to SQLite's signed integer range.
pub fn sql_count(n: u64) -> i64 { i64::try_from(n).unwrap_or(i64::MAX) }

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:    String,
  pub username:   String,
  pub name:       String,
  pub bio:        String,
  pub image:      String,
  pub onboarded:  bool,
  pub created_at: String,
}

impl RawUser {
  /// Read a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:    row.get(0)?,
      username:   row.get(1)?,
      name:       row.get(2)?,
      bio:        row.get(3)?,
      image:      row.get(4)?,
      onboarded:  row.get(5)?,
      created_at: row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:    self.user_id,
      username:   self.username,
      name:       self.name,
      bio:        self.bio,
      image:      self.image,
      onboarded:  self.onboarded,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `threads` row.
pub struct RawThread {
  pub thread_id:    String,
  pub text:         String,
  pub author_id:    String,
  pub community_id: Option<String>,
  pub parent_id:    Option<String>,
  pub created_at:   String,
}

impl RawThread {
  /// Read a row selected with [`THREAD_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      thread_id:    row.get(0)?,
      text:         row.get(1)?,
      author_id:    row.get(2)?,
      community_id: row.get(3)?,
      parent_id:    row.get(4)?,
      created_at:   row.get(5)?,
    })
  }

  pub fn into_thread(self) -> Result<Thread> {
    Ok(Thread {
      thread_id:    decode_uuid(&self.thread_id)?,
      text:         self.text,
      author_id:    self.author_id,
      community_id: self.community_id,
      parent_id:    self.parent_id.as_deref().map(decode_uuid).transpose()?,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read directly from a `communities` row.
pub struct RawCommunity {
  pub community_id: String,
  pub name:         String,
  pub username:     String,
  pub image:        String,
  pub bio:          String,
  pub created_by:   String,
  pub created_at:   String,
}

impl RawCommunity {
  /// Read a row selected with [`COMMUNITY_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      community_id: row.get(0)?,
      name:         row.get(1)?,
      username:     row.get(2)?,
      image:        row.get(3)?,
      bio:          row.get(4)?,
      created_by:   row.get(5)?,
      created_at:   row.get(6)?,
    })
  }

  pub fn into_community(self) -> Result<Community> {
    Ok(Community {
      community_id: self.community_id,
      name:         self.name,
      username:     self.username,
      image:        self.image,
      bio:          self.bio,
      created_by:   self.created_by,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}
