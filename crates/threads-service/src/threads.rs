//! Thread operations: posting, replying and reading feeds.

use serde::Deserialize;
use threads_core::{
  page::{Page, PageRequest},
  store::SocialStore,
  thread::{NewThread, Thread},
  view::ThreadNode,
};
use uuid::Uuid;

use crate::{
  Service,
  error::{Error, Result, read_err, reply_err, write_err},
};

/// Input for [`Service::create_thread`].
#[derive(Debug, Clone, Deserialize)]
pub struct CreateThread {
  pub text:         String,
  pub author_id:    String,
  #[serde(default)]
  pub community_id: Option<String>,
  /// Route to mark stale once the thread exists.
  #[serde(default)]
  pub path:         String,
}

fn require_text(text: &str, what: &str) -> Result<()> {
  if text.trim().is_empty() {
    return Err(Error::Invalid(format!("{what} text is required")));
  }
  Ok(())
}

impl<S: SocialStore> Service<S> {
  async fn require_user(&self, user_id: &str) -> Result<()> {
    match self.fetch_user(user_id).await? {
      Some(_) => Ok(()),
      None => Err(Error::UserNotFound(user_id.to_owned())),
    }
  }

  /// Post a new top-level thread, optionally inside a community.
  pub async fn create_thread(&self, input: CreateThread) -> Result<Thread> {
    require_text(&input.text, "thread")?;
    self.require_user(&input.author_id).await?;

    if let Some(community_id) = &input.community_id {
      let community = self
        .store
        .get_community(community_id)
        .await
        .map_err(read_err("create thread"))?;
      if community.is_none() {
        return Err(Error::CommunityNotFound(community_id.clone()));
      }
    }

    let thread = self
      .store
      .insert_thread(NewThread::post(input.text, input.author_id, input.community_id))
      .await
      .map_err(write_err("create thread"))?;

    tracing::debug!(thread_id = %thread.thread_id, "thread created");
    self.mark_stale(&input.path);
    Ok(thread)
  }

  /// One page of the main feed: top-level threads, newest first, each with
  /// its direct replies.
  pub async fn fetch_posts(&self, page: PageRequest) -> Result<Page<ThreadNode>> {
    let threads = self
      .store
      .list_top_level(page)
      .await
      .map_err(read_err("fetch posts"))?;

    let is_next = threads.is_next;
    let items = self.expand(threads.items, 1).await?;
    Ok(Page { items, is_next })
  }

  /// A thread with two levels of replies. Replies deeper than that are not
  /// expanded.
  pub async fn fetch_thread_by_id(&self, thread_id: Uuid) -> Result<Option<ThreadNode>> {
    let Some(thread) = self
      .store
      .get_thread(thread_id)
      .await
      .map_err(read_err("fetch thread"))?
    else {
      return Ok(None);
    };

    Ok(self.expand(vec![thread], 2).await?.pop())
  }

  /// Reply to an existing thread. Nothing is written when the parent is
  /// missing.
  pub async fn add_comment_to_thread(
    &self,
    thread_id: Uuid,
    text: &str,
    user_id: &str,
    path: &str,
  ) -> Result<Thread> {
    let parent = self
      .store
      .get_thread(thread_id)
      .await
      .map_err(read_err("add comment"))?;
    if parent.is_none() {
      return Err(Error::ThreadNotFound(thread_id));
    }

    require_text(text, "comment")?;
    self.require_user(user_id).await?;

    let comment = self
      .store
      .insert_thread(NewThread::reply(thread_id, text, user_id))
      .await
      .map_err(reply_err(thread_id))?;

    tracing::debug!(
      thread_id = %comment.thread_id,
      parent_id = %thread_id,
      "comment added"
    );
    self.mark_stale(path);
    Ok(comment)
  }
}
