//! Community operations: lifecycle, membership and listings.

use threads_core::{
  community::{Community, CommunityUpdate, NewCommunity},
  page::Page,
  store::{CommunityQuery, SocialStore},
  view::{CommunityDetails, CommunityListing, CommunityPosts, MemberSummary},
};

use crate::{
  Service,
  error::{Error, Result, read_err, write_err},
};

impl<S: SocialStore> Service<S> {
  async fn require_community(&self, community_id: &str) -> Result<Community> {
    self
      .store
      .get_community(community_id)
      .await
      .map_err(read_err("fetch community"))?
      .ok_or_else(|| Error::CommunityNotFound(community_id.to_owned()))
  }

  async fn member_summaries(&self, community_id: &str) -> Result<Vec<MemberSummary>> {
    Ok(self
      .store
      .members_of(community_id)
      .await
      .map_err(read_err("fetch community members"))?
      .iter()
      .map(MemberSummary::from)
      .collect())
  }

  /// Create a community. The creator must exist and becomes its first
  /// member.
  pub async fn create_community(&self, input: NewCommunity) -> Result<Community> {
    if input.community_id.trim().is_empty() {
      return Err(Error::Invalid("community id is required".into()));
    }
    if self.fetch_user(&input.created_by).await?.is_none() {
      return Err(Error::UserNotFound(input.created_by));
    }

    let community = self
      .store
      .insert_community(input)
      .await
      .map_err(write_err("create community"))?;

    tracing::info!(community_id = %community.community_id, "community created");
    Ok(community)
  }

  pub async fn fetch_community_details(
    &self,
    community_id: &str,
  ) -> Result<Option<CommunityDetails>> {
    let Some(community) = self
      .store
      .get_community(community_id)
      .await
      .map_err(read_err("fetch community details"))?
    else {
      return Ok(None);
    };

    let creator = self
      .fetch_user(&community.created_by)
      .await?
      .ok_or_else(|| Error::UserNotFound(community.created_by.clone()))?;
    let members = self.member_summaries(community_id).await?;

    Ok(Some(CommunityDetails { community, creator, members }))
  }

  /// The community's threads, newest first, each with one level of replies.
  pub async fn fetch_community_posts(
    &self,
    community_id: &str,
  ) -> Result<Option<CommunityPosts>> {
    let Some(community) = self
      .store
      .get_community(community_id)
      .await
      .map_err(read_err("fetch community posts"))?
    else {
      return Ok(None);
    };

    let threads = self
      .store
      .threads_in_community(community_id)
      .await
      .map_err(read_err("fetch community posts"))?;
    let threads = self.expand(threads, 1).await?;

    Ok(Some(CommunityPosts { community, threads }))
  }

  pub async fn list_communities(
    &self,
    query: &CommunityQuery,
  ) -> Result<Page<CommunityListing>> {
    let page = self
      .store
      .list_communities(query)
      .await
      .map_err(read_err("list communities"))?;

    let mut items = Vec::with_capacity(page.len());
    for community in page.items {
      let members = self.member_summaries(&community.community_id).await?;
      items.push(CommunityListing { community, members });
    }
    Ok(Page { items, is_next: page.is_next })
  }

  pub async fn add_member(&self, community_id: &str, user_id: &str) -> Result<()> {
    self.require_community(community_id).await?;
    if self.fetch_user(user_id).await?.is_none() {
      return Err(Error::UserNotFound(user_id.to_owned()));
    }

    let already = self
      .store
      .is_member(community_id, user_id)
      .await
      .map_err(read_err("add member"))?;
    if already {
      return Err(Error::AlreadyMember {
        community_id: community_id.to_owned(),
        user_id:      user_id.to_owned(),
      });
    }

    self
      .store
      .add_member(community_id, user_id)
      .await
      .map_err(write_err("add member"))
  }

  /// Remove a membership. Removing a non-member is not an error.
  pub async fn remove_member(&self, user_id: &str, community_id: &str) -> Result<()> {
    if self.fetch_user(user_id).await?.is_none() {
      return Err(Error::UserNotFound(user_id.to_owned()));
    }
    self.require_community(community_id).await?;

    let removed = self
      .store
      .remove_member(community_id, user_id)
      .await
      .map_err(write_err("remove member"))?;
    if !removed {
      tracing::debug!(community_id, user_id, "user was not a member");
    }
    Ok(())
  }

  pub async fn update_community_info(
    &self,
    community_id: &str,
    update: CommunityUpdate,
  ) -> Result<Community> {
    self
      .store
      .update_community(community_id, update)
      .await
      .map_err(write_err("update community"))?
      .ok_or_else(|| Error::CommunityNotFound(community_id.to_owned()))
  }

  /// Delete a community together with its threads and memberships.
  pub async fn delete_community(&self, community_id: &str) -> Result<Community> {
    let deleted = self
      .store
      .delete_community(community_id)
      .await
      .map_err(write_err("delete community"))?
      .ok_or_else(|| Error::CommunityNotFound(community_id.to_owned()))?;

    tracing::info!(community_id, "community deleted");
    Ok(deleted)
  }
}
