//! Stale-path signalling towards the cache/view layer.

use std::{
  collections::BTreeSet,
  sync::{Mutex, PoisonError},
};

/// Receives "the cached rendering of this route is stale" signals.
pub trait Revalidate: Send + Sync {
  fn mark_stale(&self, path: &str);
}

/// Logs each stale path and keeps nothing. For processes with no view
/// layer to drain a [`StalePaths`].
#[derive(Debug, Default, Clone, Copy)]
pub struct LogOnly;

impl Revalidate for LogOnly {
  fn mark_stale(&self, path: &str) {
    tracing::debug!(path, "path is stale");
  }
}

/// In-process set of stale paths, drained by the view layer. Grows until
/// [`take`](Self::take) is called.
#[derive(Debug, Default)]
pub struct StalePaths {
  paths: Mutex<BTreeSet<String>>,
}

impl StalePaths {
  pub fn new() -> Self { Self::default() }

  pub fn is_stale(&self, path: &str) -> bool {
    self
      .paths
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .contains(path)
  }

  /// Remove and return every pending path, in lexical order.
  pub fn take(&self) -> Vec<String> {
    let mut paths = self.paths.lock().unwrap_or_else(PoisonError::into_inner);
    std::mem::take(&mut *paths).into_iter().collect()
  }
}

impl Revalidate for StalePaths {
  fn mark_stale(&self, path: &str) {
    tracing::debug!(path, "marking path stale");
    self
      .paths
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(path.to_owned());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn take_drains_and_deduplicates() {
    let stale = StalePaths::new();
    stale.mark_stale("/b");
    stale.mark_stale("/a");
    stale.mark_stale("/b");

    assert!(stale.is_stale("/a"));
    assert_eq!(stale.take(), ["/a", "/b"]);
    assert!(!stale.is_stale("/a"));
    assert!(stale.take().is_empty());
  }

  #[test]
  fn log_only_retains_nothing() {
    let sink: std::sync::Arc<dyn Revalidate> = std::sync::Arc::new(LogOnly);
    for i in 0..10_000 {
      sink.mark_stale(&format!("/thread/{i}"));
    }
    assert_eq!(std::mem::size_of::<LogOnly>(), 0);
  }
}
