//! Bounded-depth reply trees.
//!
//! Each level is one `children_of` query; authors and communities for every
//! level are resolved with one batch lookup each, then nodes are assembled
//! bottom-up.

use std::collections::{BTreeSet, HashMap};

use threads_core::{
  store::SocialStore,
  thread::Thread,
  view::{AuthorSummary, CommunitySummary, ThreadNode},
};
use uuid::Uuid;

use crate::{
  Service,
  error::{Error, Result, read_err},
};

impl<S: SocialStore> Service<S> {
  /// Expand `roots` with `depth` levels of replies below them. Root order
  /// is preserved; replies are oldest first.
  pub(crate) async fn expand(
    &self,
    roots: Vec<Thread>,
    depth: usize,
  ) -> Result<Vec<ThreadNode>> {
    let mut levels = vec![roots];
    for _ in 0..depth {
      let parent_ids: Vec<Uuid> = levels
        .last()
        .map(|level| level.iter().map(|t| t.thread_id).collect())
        .unwrap_or_default();
      if parent_ids.is_empty() {
        break;
      }
      let children = self
        .store
        .children_of(&parent_ids)
        .await
        .map_err(read_err("fetch replies"))?;
      levels.push(children);
    }

    let author_ids: Vec<String> = levels
      .iter()
      .flatten()
      .map(|t| t.author_id.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();
    let community_ids: Vec<String> = levels
      .iter()
      .flatten()
      .filter_map(|t| t.community_id.clone())
      .collect::<BTreeSet<_>>()
      .into_iter()
      .collect();

    let authors: HashMap<String, AuthorSummary> = self
      .store
      .get_users(&author_ids)
      .await
      .map_err(read_err("fetch thread authors"))?
      .iter()
      .map(|u| (u.user_id.clone(), AuthorSummary::from(u)))
      .collect();
    let communities: HashMap<String, CommunitySummary> = self
      .store
      .get_communities(&community_ids)
      .await
      .map_err(read_err("fetch thread communities"))?
      .iter()
      .map(|c| (c.community_id.clone(), CommunitySummary::from(c)))
      .collect();

    let mut below: HashMap<Uuid, Vec<ThreadNode>> = HashMap::new();
    let mut nodes: Vec<ThreadNode> = Vec::new();

    while let Some(level) = levels.pop() {
      nodes = level
        .into_iter()
        .map(|thread| {
          let author = authors
            .get(&thread.author_id)
            .cloned()
            .ok_or_else(|| Error::UserNotFound(thread.author_id.clone()))?;
          let community = thread
            .community_id
            .as_ref()
            .and_then(|id| communities.get(id))
            .cloned();
          let children = below.remove(&thread.thread_id).unwrap_or_default();
          Ok(ThreadNode { thread, author, community, children })
        })
        .collect::<Result<Vec<_>>>()?;

      if !levels.is_empty() {
        below = HashMap::new();
        for node in nodes.drain(..) {
          if let Some(parent_id) = node.thread.parent_id {
            below.entry(parent_id).or_default().push(node);
          }
        }
      }
    }

    Ok(nodes)
  }
}
