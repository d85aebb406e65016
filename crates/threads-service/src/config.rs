//! Service-level settings, usually embedded in the server's config file.

use serde::Deserialize;
use threads_core::page::DEFAULT_PAGE_SIZE;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
  /// Route whose cached rendering is invalidated after a profile upsert.
  pub profile_edit_route: String,
  /// Page size used when a listing request does not specify one.
  pub default_page_size:  u32,
}

impl Default for ServiceConfig {
  fn default() -> Self {
    Self {
      profile_edit_route: "/profile/edit".to_owned(),
      default_page_size:  DEFAULT_PAGE_SIZE,
    }
  }
}
