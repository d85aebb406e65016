//! The `SocialStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `threads-store-sqlite`).
//! The service layer depends on this abstraction, not on any concrete
//! backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  community::{Community, CommunityUpdate, NewCommunity},
  page::{Page, PageRequest, SortOrder},
  thread::{NewThread, Thread},
  user::{User, UserProfile},
};

// ─── Query types ─────────────────────────────────────────────────────────────

/// Parameters for [`SocialStore::list_users`].
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
  /// Never returned, typically the viewer.
  pub excluding:   Option<String>,
  /// Case-insensitive substring over username or name. Empty means no
  /// text filter.
  pub search_text: String,
  pub page:        PageRequest,
  pub sort:        SortOrder,
}

/// Parameters for [`SocialStore::list_communities`].
#[derive(Debug, Clone, Default)]
pub struct CommunityQuery {
  /// Case-insensitive substring over username or name.
  pub search_text: String,
  pub page:        PageRequest,
  pub sort:        SortOrder,
}

// ─── Error classification ────────────────────────────────────────────────────

/// Lets callers classify a backend failure without knowing the backend.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// The write collided with a unique key (username, membership, id).
  fn is_unique_violation(&self) -> bool;

  /// A reply was rejected because its parent thread does not exist.
  fn is_missing_parent(&self) -> bool { false }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over the relational store holding users, threads and
/// communities.
///
/// Every method is a single logical unit: methods that touch several rows
/// (`insert_community`, `delete_community`) must be all-or-nothing.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SocialStore: Send + Sync {
  type Error: StoreError;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create the user if absent, otherwise overwrite every profile field.
  /// Either way the stored user is onboarded.
  fn upsert_user(
    &self,
    profile: UserProfile,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Retrieve every user whose id is in `user_ids`. Unknown ids are skipped;
  /// order is unspecified.
  fn get_users<'a>(
    &'a self,
    user_ids: &'a [String],
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + 'a;

  fn list_users<'a>(
    &'a self,
    query: &'a UserQuery,
  ) -> impl Future<Output = Result<Page<User>, Self::Error>> + Send + 'a;

  /// Communities `user_id` is a member of.
  fn communities_of<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Community>, Self::Error>> + Send + 'a;

  // ── Threads ───────────────────────────────────────────────────────────

  /// Persist a new thread. The id and `created_at` are assigned by the store.
  ///
  /// A reply's parent must already exist; since `parent_id` is never
  /// rewritten, this keeps the thread graph acyclic.
  fn insert_thread(
    &self,
    input: NewThread,
  ) -> impl Future<Output = Result<Thread, Self::Error>> + Send + '_;

  fn get_thread(
    &self,
    thread_id: Uuid,
  ) -> impl Future<Output = Result<Option<Thread>, Self::Error>> + Send + '_;

  /// Threads without a parent, newest first.
  fn list_top_level(
    &self,
    page: PageRequest,
  ) -> impl Future<Output = Result<Page<Thread>, Self::Error>> + Send + '_;

  /// Direct replies to any of `parent_ids`, oldest first.
  fn children_of<'a>(
    &'a self,
    parent_ids: &'a [Uuid],
  ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send + 'a;

  /// Every thread (posts and replies) authored by `author_id`, newest first.
  fn threads_by_author<'a>(
    &'a self,
    author_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send + 'a;

  /// Threads owned by a community, newest first.
  fn threads_in_community<'a>(
    &'a self,
    community_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Thread>, Self::Error>> + Send + 'a;

  // ── Communities ───────────────────────────────────────────────────────

  /// Persist a community with its creator as the first member.
  fn insert_community(
    &self,
    input: NewCommunity,
  ) -> impl Future<Output = Result<Community, Self::Error>> + Send + '_;

  fn get_community<'a>(
    &'a self,
    community_id: &'a str,
  ) -> impl Future<Output = Result<Option<Community>, Self::Error>> + Send + 'a;

  /// Retrieve every community whose id is in `community_ids`.
  fn get_communities<'a>(
    &'a self,
    community_ids: &'a [String],
  ) -> impl Future<Output = Result<Vec<Community>, Self::Error>> + Send + 'a;

  fn list_communities<'a>(
    &'a self,
    query: &'a CommunityQuery,
  ) -> impl Future<Output = Result<Page<Community>, Self::Error>> + Send + 'a;

  fn members_of<'a>(
    &'a self,
    community_id: &'a str,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + 'a;

  fn is_member<'a>(
    &'a self,
    community_id: &'a str,
    user_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Add a membership. A duplicate is reported as a unique violation.
  fn add_member<'a>(
    &'a self,
    community_id: &'a str,
    user_id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove a membership. Returns whether a membership existed.
  fn remove_member<'a>(
    &'a self,
    community_id: &'a str,
    user_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Overwrite name, username and image. Returns `None` if not found.
  fn update_community<'a>(
    &'a self,
    community_id: &'a str,
    update: CommunityUpdate,
  ) -> impl Future<Output = Result<Option<Community>, Self::Error>> + Send + 'a;

  /// Delete a community, its threads (with their replies) and its
  /// memberships. Returns the deleted community, or `None` if not found.
  fn delete_community<'a>(
    &'a self,
    community_id: &'a str,
  ) -> impl Future<Output = Result<Option<Community>, Self::Error>> + Send + 'a;
}
