//! User profiles, keyed by the identity provider's id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
  /// Issued by the identity provider; never generated here.
  pub user_id:    String,
  /// Unique, always stored lower-case.
  pub username:   String,
  pub name:       String,
  pub bio:        String,
  pub image:      String,
  pub onboarded:  bool,
  pub created_at: DateTime<Utc>,
}

/// The mutable profile fields written by an upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
  pub user_id:  String,
  pub username: String,
  pub name:     String,
  pub bio:      String,
  pub image:    String,
}

impl UserProfile {
  /// Return the profile with its username folded to lower case.
  pub fn normalized(mut self) -> Self {
    self.username = self.username.to_lowercase();
    self
  }
}
