//! Error type for the service layer.
//!
//! Store failures are logged where they happen and wrapped with the name of
//! the operation that failed.

use thiserror::Error;
use threads_core::store::StoreError;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("user not found: {0}")]
  UserNotFound(String),

  #[error("community not found: {0}")]
  CommunityNotFound(String),

  #[error("thread not found: {0}")]
  ThreadNotFound(Uuid),

  #[error("user {user_id} is already a member of community {community_id}")]
  AlreadyMember {
    community_id: String,
    user_id:      String,
  },

  /// A write collided with a unique field (username, community handle).
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("invalid input: {0}")]
  Invalid(String),

  #[error("failed to {op}: {source}")]
  Read {
    op:     &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },

  #[error("failed to {op}: {source}")]
  Write {
    op:     &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  pub fn is_not_found(&self) -> bool {
    matches!(
      self,
      Self::UserNotFound(_) | Self::CommunityNotFound(_) | Self::ThreadNotFound(_)
    )
  }

  pub fn is_conflict(&self) -> bool {
    matches!(self, Self::AlreadyMember { .. } | Self::Conflict(_))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// `map_err` adapter for store reads.
pub(crate) fn read_err<E: StoreError>(op: &'static str) -> impl FnOnce(E) -> Error {
  move |e| {
    tracing::error!(op, error = %e, "store read failed");
    Error::Read { op, source: Box::new(e) }
  }
}

/// `map_err` adapter for store writes. Unique collisions become
/// [`Error::Conflict`].
pub(crate) fn write_err<E: StoreError>(op: &'static str) -> impl FnOnce(E) -> Error {
  move |e| {
    tracing::error!(op, error = %e, "store write failed");
    if e.is_unique_violation() {
      Error::Conflict(format!("failed to {op}: {e}"))
    } else {
      Error::Write { op, source: Box::new(e) }
    }
  }
}

/// `map_err` adapter for inserting a reply. A parent deleted after the
/// existence check becomes [`Error::ThreadNotFound`].
pub(crate) fn reply_err<E: StoreError>(parent_id: Uuid) -> impl FnOnce(E) -> Error {
  move |e| {
    if e.is_missing_parent() {
      tracing::debug!(%parent_id, "parent thread removed before reply insert");
      Error::ThreadNotFound(parent_id)
    } else {
      write_err("add comment")(e)
    }
  }
}
