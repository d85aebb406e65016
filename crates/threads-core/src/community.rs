//! Communities: named groups that own threads and have members.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Community {
  pub community_id: String,
  pub name:         String,
  /// Unique across communities.
  pub username:     String,
  pub image:        String,
  pub bio:          String,
  pub created_by:   String,
  pub created_at:   DateTime<Utc>,
}

/// Input for [`SocialStore::insert_community`](crate::store::SocialStore::insert_community).
///
/// The creator becomes the first member in the same write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCommunity {
  pub community_id: String,
  pub name:         String,
  pub username:     String,
  pub image:        String,
  pub bio:          String,
  pub created_by:   String,
}

/// Fields overwritten by a community info update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityUpdate {
  pub name:     String,
  pub username: String,
  pub image:    String,
}
