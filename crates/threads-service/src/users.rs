//! User profile operations.

use threads_core::{
  community::Community,
  page::Page,
  store::{SocialStore, UserQuery},
  thread::Thread,
  user::{User, UserProfile},
  view::{ThreadNode, UserThreads},
};

use crate::{
  Service,
  error::{Error, Result, read_err, write_err},
};

impl<S: SocialStore> Service<S> {
  /// Create the profile if absent, otherwise overwrite it. The username is
  /// stored lower-case and the user is marked onboarded.
  ///
  /// When `path` is the profile-edit route, that route is marked stale.
  pub async fn create_or_update_user(
    &self,
    profile: UserProfile,
    path: &str,
  ) -> Result<User> {
    if profile.user_id.trim().is_empty() {
      return Err(Error::Invalid("user id is required".into()));
    }
    if profile.username.trim().is_empty() {
      return Err(Error::Invalid("username is required".into()));
    }

    let user = self
      .store
      .upsert_user(profile.normalized())
      .await
      .map_err(write_err("create/update user"))?;

    if path == self.config.profile_edit_route {
      self.mark_stale(path);
    }
    Ok(user)
  }

  pub async fn fetch_user(&self, user_id: &str) -> Result<Option<User>> {
    self
      .store
      .get_user(user_id)
      .await
      .map_err(read_err("fetch user"))
  }

  /// The user with every thread they authored, newest first. Each thread
  /// carries its community and one level of replies.
  pub async fn fetch_user_threads(&self, user_id: &str) -> Result<Option<UserThreads>> {
    let Some(user) = self.fetch_user(user_id).await? else {
      return Ok(None);
    };

    let threads = self
      .store
      .threads_by_author(user_id)
      .await
      .map_err(read_err("fetch user threads"))?;
    let threads = self.expand(threads, 1).await?;

    Ok(Some(UserThreads { user, threads }))
  }

  pub async fn list_users(&self, query: &UserQuery) -> Result<Page<User>> {
    self
      .store
      .list_users(query)
      .await
      .map_err(read_err("list users"))
  }

  /// Replies other users left on threads authored by `user_id`, newest
  /// first. Self-replies are not activity.
  pub async fn get_activity(&self, user_id: &str) -> Result<Vec<ThreadNode>> {
    let own_ids: Vec<_> = self
      .store
      .threads_by_author(user_id)
      .await
      .map_err(read_err("fetch activity"))?
      .into_iter()
      .map(|t| t.thread_id)
      .collect();

    let mut replies: Vec<Thread> = self
      .store
      .children_of(&own_ids)
      .await
      .map_err(read_err("fetch activity"))?
      .into_iter()
      .filter(|t| t.author_id != user_id)
      .collect();
    // children_of is oldest first.
    replies.reverse();

    self.expand(replies, 0).await
  }

  /// Communities the user belongs to.
  pub async fn fetch_user_communities(&self, user_id: &str) -> Result<Vec<Community>> {
    if self.fetch_user(user_id).await?.is_none() {
      return Err(Error::UserNotFound(user_id.to_owned()));
    }
    self
      .store
      .communities_of(user_id)
      .await
      .map_err(read_err("fetch user communities"))
  }
}
