//! Threads: posts and the replies below them.
//!
//! A thread with a `parent_id` is a reply. Replies never show up in the
//! top-level feed; they are reached through their parent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
  pub thread_id:    Uuid,
  pub text:         String,
  pub author_id:    String,
  pub community_id: Option<String>,
  pub parent_id:    Option<Uuid>,
  pub created_at:   DateTime<Utc>,
}

impl Thread {
  pub fn is_top_level(&self) -> bool { self.parent_id.is_none() }
}

/// Input for [`SocialStore::insert_thread`](crate::store::SocialStore::insert_thread).
///
/// The id and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewThread {
  pub text:         String,
  pub author_id:    String,
  pub community_id: Option<String>,
  pub parent_id:    Option<Uuid>,
}

impl NewThread {
  /// A top-level post, optionally inside a community.
  pub fn post(
    text: impl Into<String>,
    author_id: impl Into<String>,
    community_id: Option<String>,
  ) -> Self {
    Self {
      text: text.into(),
      author_id: author_id.into(),
      community_id,
      parent_id: None,
    }
  }

  /// A reply to `parent_id`.
  pub fn reply(
    parent_id: Uuid,
    text: impl Into<String>,
    author_id: impl Into<String>,
  ) -> Self {
    Self {
      text: text.into(),
      author_id: author_id.into(),
      community_id: None,
      parent_id: Some(parent_id),
    }
  }
}
