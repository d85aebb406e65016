//! Read projections assembled from the base records.
//!
//! None of these are stored. Nested authors always use [`AuthorSummary`] so
//! every listing exposes the same author fields.

use serde::{Deserialize, Serialize};

use crate::{community::Community, thread::Thread, user::User};

// ─── Summaries ───────────────────────────────────────────────────────────────

/// The author fields shown next to a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
  pub user_id: String,
  pub name:    String,
  pub image:   String,
}

impl From<&User> for AuthorSummary {
  fn from(u: &User) -> Self {
    Self {
      user_id: u.user_id.clone(),
      name:    u.name.clone(),
      image:   u.image.clone(),
    }
  }
}

/// The community fields shown next to a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommunitySummary {
  pub community_id: String,
  pub name:         String,
  pub image:        String,
}

impl From<&Community> for CommunitySummary {
  fn from(c: &Community) -> Self {
    Self {
      community_id: c.community_id.clone(),
      name:         c.name.clone(),
      image:        c.image.clone(),
    }
  }
}

/// A community member as listed on the community page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
  pub user_id:  String,
  pub name:     String,
  pub username: String,
  pub image:    String,
}

impl From<&User> for MemberSummary {
  fn from(u: &User) -> Self {
    Self {
      user_id:  u.user_id.clone(),
      name:     u.name.clone(),
      username: u.username.clone(),
      image:    u.image.clone(),
    }
  }
}

// ─── Thread trees ────────────────────────────────────────────────────────────

/// A thread with its author and a bounded number of reply levels.
///
/// `children` is expanded only as deep as the producing query asks for; a
/// node at the last expanded level has an empty `children` even when replies
/// exist below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadNode {
  #[serde(flatten)]
  pub thread:    Thread,
  pub author:    AuthorSummary,
  pub community: Option<CommunitySummary>,
  pub children:  Vec<ThreadNode>,
}

impl ThreadNode {
  /// Number of expanded levels below this node.
  pub fn depth(&self) -> usize {
    self
      .children
      .iter()
      .map(|c| c.depth() + 1)
      .max()
      .unwrap_or(0)
  }
}

// ─── Aggregates ──────────────────────────────────────────────────────────────

/// A user's profile page: the user and everything they authored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserThreads {
  pub user:    User,
  pub threads: Vec<ThreadNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityDetails {
  pub community: Community,
  pub creator:   User,
  pub members:   Vec<MemberSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityPosts {
  pub community: Community,
  pub threads:   Vec<ThreadNode>,
}

/// A row in the community directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityListing {
  pub community: Community,
  pub members:   Vec<MemberSummary>,
}
