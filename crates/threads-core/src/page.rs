//! Offset pagination shared by every listing.
//!
//! Pages are 1-based. `is_next` is true when the total number of matching
//! rows extends past the end of the returned slice.

use serde::{Deserialize, Serialize};

/// Default page size when a caller does not ask for one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Direction of a `created_at` ordering.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
  Asc,
  #[default]
  Desc,
}

impl SortOrder {
  pub fn as_sql(self) -> &'static str {
    match self {
      SortOrder::Asc => "ASC",
      SortOrder::Desc => "DESC",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
  pub page_number: u32,
  pub page_size:   u32,
}

impl Default for PageRequest {
  fn default() -> Self {
    Self { page_number: 1, page_size: DEFAULT_PAGE_SIZE }
  }
}

impl PageRequest {
  pub fn new(page_number: u32, page_size: u32) -> Self {
    Self { page_number, page_size }
  }

  /// Rows to skip. Page 0 is treated as page 1.
  pub fn offset(&self) -> u64 {
    u64::from(self.page_number.max(1) - 1) * u64::from(self.page_size)
  }

  pub fn limit(&self) -> u64 { u64::from(self.page_size) }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:   Vec<T>,
  pub is_next: bool,
}

impl<T> Page<T> {
  /// Build a page from the slice fetched at `offset` and the total count of
  /// matching rows.
  pub fn new(items: Vec<T>, offset: u64, total: u64) -> Self {
    let is_next = total > offset.saturating_add(items.len() as u64);
    Self { items, is_next }
  }

  pub fn empty() -> Self {
    Self { items: Vec::new(), is_next: false }
  }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  /// Transform every item, keeping `is_next`.
  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:   self.items.into_iter().map(f).collect(),
      is_next: self.is_next,
    }
  }
}
