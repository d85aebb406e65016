//! JSON REST API for the threads service.
//!
//! Exposes an axum [`Router`] backed by a [`threads_service::Service`] over
//! any [`threads_core::store::SocialStore`]. Auth and transport concerns are
//! the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", threads_api::api_router(service.clone()))
//! ```

pub mod communities;
pub mod error;
pub mod threads;
pub mod users;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use threads_core::store::SocialStore;
use threads_service::Service;

pub use error::ApiError;

/// Build a fully-materialised API router for `service`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(service: Arc<Service<S>>) -> Router<()>
where
  S: SocialStore + 'static,
{
  Router::new()
    // Users
    .route("/users", get(users::list::<S>))
    .route("/users/{id}", get(users::get_one::<S>).put(users::upsert::<S>))
    .route("/users/{id}/threads", get(users::threads::<S>))
    .route("/users/{id}/activity", get(users::activity::<S>))
    .route("/users/{id}/communities", get(users::communities::<S>))
    // Threads
    .route("/threads", get(threads::feed::<S>).post(threads::create::<S>))
    .route("/threads/{id}", get(threads::get_one::<S>))
    .route("/threads/{id}/comments", post(threads::comment::<S>))
    // Communities
    .route(
      "/communities",
      get(communities::list::<S>).post(communities::create::<S>),
    )
    .route(
      "/communities/{id}",
      get(communities::details::<S>)
        .patch(communities::update::<S>)
        .delete(communities::delete::<S>),
    )
    .route("/communities/{id}/threads", get(communities::posts::<S>))
    .route(
      "/communities/{id}/members/{user_id}",
      put(communities::add_member::<S>).delete(communities::remove_member::<S>),
    )
    .with_state(service)
}
