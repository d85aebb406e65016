//! User, thread and community services.
//!
//! A [`Service`] is a thin object holding the store handle, the stale-path
//! sink and a little configuration. Each public method is one request-sized
//! operation: validate, check references, call the store, signal the cache
//! layer, and return a plain record.

mod communities;
mod threads;
mod tree;
mod users;

pub mod config;
pub mod error;
pub mod revalidate;

use std::sync::Arc;

use threads_core::store::SocialStore;

pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use revalidate::{LogOnly, Revalidate, StalePaths};
pub use threads::CreateThread;

pub struct Service<S> {
  store:       S,
  revalidator: Arc<dyn Revalidate>,
  config:      ServiceConfig,
}

impl<S: SocialStore> Service<S> {
  pub fn new(store: S, revalidator: Arc<dyn Revalidate>, config: ServiceConfig) -> Self {
    Self { store, revalidator, config }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn config(&self) -> &ServiceConfig { &self.config }

  fn mark_stale(&self, path: &str) {
    if !path.is_empty() {
      self.revalidator.mark_stale(path);
    }
  }
}
