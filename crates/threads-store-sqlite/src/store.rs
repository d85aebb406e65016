//! [`SqliteStore`], the SQLite implementation of [`SocialStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use threads_core::{
  community::{Community, CommunityUpdate, NewCommunity},
  page::{Page, PageRequest},
  store::{CommunityQuery, SocialStore, UserQuery},
  thread::{NewThread, Thread},
  user::{User, UserProfile},
};

use crate::{
  encode::{
    COMMUNITY_COLUMNS, RawCommunity, RawThread, RawUser, THREAD_COLUMNS,
    USER_COLUMNS, contains_pattern, encode_dt, encode_id_list, encode_uuid,
    sql_count,
  },
  schema::{SCHEMA, register_functions},
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A threads store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, mostly for tests.
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
        register_functions(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT {USER_COLUMNS} …` with text parameters.
  async fn select_users(&self, sql: String, params: Vec<String>) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  /// Run a `SELECT {THREAD_COLUMNS} …` with text parameters.
  async fn select_threads(&self, sql: String, params: Vec<String>) -> Result<Vec<Thread>> {
    let raws: Vec<RawThread> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawThread::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawThread::into_thread).collect()
  }

  /// Run a `SELECT {COMMUNITY_COLUMNS} …` with text parameters.
  async fn select_communities(
    &self,
    sql: String,
    params: Vec<String>,
  ) -> Result<Vec<Community>> {
    let raws: Vec<RawCommunity> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params.iter()), RawCommunity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCommunity::into_community).collect()
  }
}

// ─── SocialStore impl ────────────────────────────────────────────────────────

impl SocialStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn upsert_user(&self, profile: UserProfile) -> Result<User> {
    let profile = profile.normalized();
    let now_str = encode_dt(Utc::now());

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "INSERT INTO users (user_id, username, name, bio, image, onboarded, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
           ON CONFLICT (user_id) DO UPDATE SET
             username  = excluded.username,
             name      = excluded.name,
             bio       = excluded.bio,
             image     = excluded.image,
             onboarded = 1
           RETURNING {USER_COLUMNS}"
        );
        Ok(conn.query_row(
          &sql,
          rusqlite::params![
            profile.user_id,
            profile.username,
            profile.name,
            profile.bio,
            profile.image,
            now_str,
          ],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  async fn get_user(&self, user_id: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1");
    let mut users = self.select_users(sql, vec![user_id.to_owned()]).await?;
    Ok(users.pop())
  }

  async fn get_users(&self, user_ids: &[String]) -> Result<Vec<User>> {
    if user_ids.is_empty() {
      return Ok(Vec::new());
    }
    let sql = format!(
      "SELECT {USER_COLUMNS} FROM users
       WHERE user_id IN (SELECT value FROM json_each(?1))"
    );
    self.select_users(sql, vec![encode_id_list(user_ids)?]).await
  }

  async fn list_users(&self, query: &UserQuery) -> Result<Page<User>> {
    let pattern   = contains_pattern(&query.search_text);
    let excluding = query.excluding.clone();
    let order     = query.sort.as_sql();
    let offset    = query.page.offset();
    let limit     = query.page.limit();

    let (raws, total): (Vec<RawUser>, i64) = self
      .conn
      .call(move |conn| {
        let filter = "(?1 IS NULL OR user_id != ?1)
           AND (fold_case(username) LIKE ?2 ESCAPE '\\' OR fold_case(name) LIKE ?2 ESCAPE '\\')";

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM users WHERE {filter}"),
          rusqlite::params![excluding, pattern],
          |r| r.get(0),
        )?;

        let sql = format!(
          "SELECT {USER_COLUMNS} FROM users WHERE {filter}
           ORDER BY created_at {order}, rowid {order}
           LIMIT ?3 OFFSET ?4"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![excluding, pattern, sql_count(limit), sql_count(offset)],
            RawUser::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let users = raws
      .into_iter()
      .map(RawUser::into_user)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(users, offset, total as u64))
  }

  async fn communities_of(&self, user_id: &str) -> Result<Vec<Community>> {
    let sql = format!(
      "SELECT {COMMUNITY_COLUMNS} FROM communities
       WHERE community_id IN (SELECT community_id FROM memberships WHERE user_id = ?1)
       ORDER BY created_at, rowid"
    );
    self.select_communities(sql, vec![user_id.to_owned()]).await
  }

  // ── Threads ───────────────────────────────────────────────────────────────

  async fn insert_thread(&self, input: NewThread) -> Result<Thread> {
    let thread = Thread {
      thread_id:    Uuid::new_v4(),
      text:         input.text,
      author_id:    input.author_id,
      community_id: input.community_id,
      parent_id:    input.parent_id,
      created_at:   Utc::now(),
    };

    let id_str        = encode_uuid(thread.thread_id);
    let text          = thread.text.clone();
    let author_id     = thread.author_id.clone();
    let community_id  = thread.community_id.clone();
    let parent_str    = thread.parent_id.map(encode_uuid);
    let at_str        = encode_dt(thread.created_at);

    let inserted: bool = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        if let Some(parent) = &parent_str {
          let exists = tx
            .query_row(
              "SELECT 1 FROM threads WHERE thread_id = ?1",
              rusqlite::params![parent],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false);
          if !exists {
            return Ok(false);
          }
        }

        tx.execute(
          "INSERT INTO threads (thread_id, text, author_id, community_id, parent_id, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, text, author_id, community_id, parent_str, at_str],
        )?;
        tx.commit()?;
        Ok(true)
      })
      .await?;

    match (inserted, thread.parent_id) {
      (false, Some(parent_id)) => Err(Error::ParentNotFound(parent_id)),
      _ => Ok(thread),
    }
  }

  async fn get_thread(&self, thread_id: Uuid) -> Result<Option<Thread>> {
    let sql = format!("SELECT {THREAD_COLUMNS} FROM threads WHERE thread_id = ?1");
    let mut threads = self.select_threads(sql, vec![encode_uuid(thread_id)]).await?;
    Ok(threads.pop())
  }

  async fn list_top_level(&self, page: PageRequest) -> Result<Page<Thread>> {
    let offset = page.offset();
    let limit  = page.limit();

    let (raws, total): (Vec<RawThread>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          "SELECT COUNT(*) FROM threads WHERE parent_id IS NULL",
          [],
          |r| r.get(0),
        )?;

        let sql = format!(
          "SELECT {THREAD_COLUMNS} FROM threads
           WHERE parent_id IS NULL
           ORDER BY created_at DESC, rowid DESC
           LIMIT ?1 OFFSET ?2"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![sql_count(limit), sql_count(offset)],
            RawThread::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let threads = raws
      .into_iter()
      .map(RawThread::into_thread)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(threads, offset, total as u64))
  }

  async fn children_of(&self, parent_ids: &[Uuid]) -> Result<Vec<Thread>> {
    if parent_ids.is_empty() {
      return Ok(Vec::new());
    }
    let sql = format!(
      "SELECT {THREAD_COLUMNS} FROM threads
       WHERE parent_id IN (SELECT value FROM json_each(?1))
       ORDER BY created_at ASC, rowid ASC"
    );
    let ids: Vec<String> = parent_ids.iter().copied().map(encode_uuid).collect();
    self.select_threads(sql, vec![encode_id_list(&ids)?]).await
  }

  async fn threads_by_author(&self, author_id: &str) -> Result<Vec<Thread>> {
    let sql = format!(
      "SELECT {THREAD_COLUMNS} FROM threads
       WHERE author_id = ?1
       ORDER BY created_at DESC, rowid DESC"
    );
    self.select_threads(sql, vec![author_id.to_owned()]).await
  }

  async fn threads_in_community(&self, community_id: &str) -> Result<Vec<Thread>> {
    let sql = format!(
      "SELECT {THREAD_COLUMNS} FROM threads
       WHERE community_id = ?1
       ORDER BY created_at DESC, rowid DESC"
    );
    self.select_threads(sql, vec![community_id.to_owned()]).await
  }

  // ── Communities ───────────────────────────────────────────────────────────

  async fn insert_community(&self, input: NewCommunity) -> Result<Community> {
    let community = Community {
      community_id: input.community_id,
      name:         input.name,
      username:     input.username,
      image:        input.image,
      bio:          input.bio,
      created_by:   input.created_by,
      created_at:   Utc::now(),
    };

    let row    = community.clone();
    let at_str = encode_dt(community.created_at);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO communities (community_id, name, username, image, bio, created_by, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![
            row.community_id,
            row.name,
            row.username,
            row.image,
            row.bio,
            row.created_by,
            at_str,
          ],
        )?;
        tx.execute(
          "INSERT INTO memberships (community_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![row.community_id, row.created_by, at_str],
        )?;
        tx.commit()?;
        Ok(())
      })
      .await?;

    Ok(community)
  }

  async fn get_community(&self, community_id: &str) -> Result<Option<Community>> {
    let sql = format!("SELECT {COMMUNITY_COLUMNS} FROM communities WHERE community_id = ?1");
    let mut communities = self
      .select_communities(sql, vec![community_id.to_owned()])
      .await?;
    Ok(communities.pop())
  }

  async fn get_communities(&self, community_ids: &[String]) -> Result<Vec<Community>> {
    if community_ids.is_empty() {
      return Ok(Vec::new());
    }
    let sql = format!(
      "SELECT {COMMUNITY_COLUMNS} FROM communities
       WHERE community_id IN (SELECT value FROM json_each(?1))"
    );
    self
      .select_communities(sql, vec![encode_id_list(community_ids)?])
      .await
  }

  async fn list_communities(&self, query: &CommunityQuery) -> Result<Page<Community>> {
    let pattern = contains_pattern(&query.search_text);
    let order   = query.sort.as_sql();
    let offset  = query.page.offset();
    let limit   = query.page.limit();

    let (raws, total): (Vec<RawCommunity>, i64) = self
      .conn
      .call(move |conn| {
        let filter =
          "fold_case(username) LIKE ?1 ESCAPE '\\' OR fold_case(name) LIKE ?1 ESCAPE '\\'";

        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM communities WHERE {filter}"),
          rusqlite::params![pattern],
          |r| r.get(0),
        )?;

        let sql = format!(
          "SELECT {COMMUNITY_COLUMNS} FROM communities WHERE {filter}
           ORDER BY created_at {order}, rowid {order}
           LIMIT ?2 OFFSET ?3"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params![pattern, sql_count(limit), sql_count(offset)],
            RawCommunity::from_row,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    let communities = raws
      .into_iter()
      .map(RawCommunity::into_community)
      .collect::<Result<Vec<_>>>()?;
    Ok(Page::new(communities, offset, total as u64))
  }

  async fn members_of(&self, community_id: &str) -> Result<Vec<User>> {
    let sql = format!(
      "SELECT {USER_COLUMNS} FROM users
       WHERE user_id IN (SELECT user_id FROM memberships WHERE community_id = ?1)
       ORDER BY created_at, rowid"
    );
    self.select_users(sql, vec![community_id.to_owned()]).await
  }

  async fn is_member(&self, community_id: &str, user_id: &str) -> Result<bool> {
    let community_id = community_id.to_owned();
    let user_id      = user_id.to_owned();

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM memberships WHERE community_id = ?1 AND user_id = ?2",
            rusqlite::params![community_id, user_id],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;
    Ok(found)
  }

  async fn add_member(&self, community_id: &str, user_id: &str) -> Result<()> {
    let community_id = community_id.to_owned();
    let user_id      = user_id.to_owned();
    let at_str       = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO memberships (community_id, user_id, joined_at) VALUES (?1, ?2, ?3)",
          rusqlite::params![community_id, user_id, at_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove_member(&self, community_id: &str, user_id: &str) -> Result<bool> {
    let community_id = community_id.to_owned();
    let user_id      = user_id.to_owned();

    let removed = self
      .conn
      .call(move |conn| {
        let n = conn.execute(
          "DELETE FROM memberships WHERE community_id = ?1 AND user_id = ?2",
          rusqlite::params![community_id, user_id],
        )?;
        Ok(n > 0)
      })
      .await?;
    Ok(removed)
  }

  async fn update_community(
    &self,
    community_id: &str,
    update: CommunityUpdate,
  ) -> Result<Option<Community>> {
    let community_id = community_id.to_owned();

    let raw: Option<RawCommunity> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "UPDATE communities SET name = ?2, username = ?3, image = ?4
           WHERE community_id = ?1
           RETURNING {COMMUNITY_COLUMNS}"
        );
        Ok(conn
          .query_row(
            &sql,
            rusqlite::params![community_id, update.name, update.username, update.image],
            RawCommunity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawCommunity::into_community).transpose()
  }

  async fn delete_community(&self, community_id: &str) -> Result<Option<Community>> {
    let community_id = community_id.to_owned();

    let raw: Option<RawCommunity> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let existing = tx
          .query_row(
            &format!("SELECT {COMMUNITY_COLUMNS} FROM communities WHERE community_id = ?1"),
            rusqlite::params![community_id],
            RawCommunity::from_row,
          )
          .optional()?;
        let Some(existing) = existing else {
          return Ok(None);
        };

        // Replies to these threads go with them via the parent_id cascade.
        tx.execute(
          "DELETE FROM threads WHERE community_id = ?1",
          rusqlite::params![community_id],
        )?;
        tx.execute(
          "DELETE FROM memberships WHERE community_id = ?1",
          rusqlite::params![community_id],
        )?;
        tx.execute(
          "DELETE FROM communities WHERE community_id = ?1",
          rusqlite::params![community_id],
        )?;

        tx.commit()?;
        Ok(Some(existing))
      })
      .await?;

    raw.map(RawCommunity::into_community).transpose()
  }
}
