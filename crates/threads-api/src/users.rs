//! Handlers for `/users` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users` | Optional `q`, `exclude`, `page`, `page_size`, `sort=asc\|desc` |
//! | `PUT`  | `/users/{id}` | Body: [`UpsertBody`]; creates or updates |
//! | `GET`  | `/users/{id}` | 404 if not found |
//! | `GET`  | `/users/{id}/threads` | Authored threads with one reply level |
//! | `GET`  | `/users/{id}/activity` | Replies from others |
//! | `GET`  | `/users/{id}/communities` | Memberships |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;
use threads_core::{
  community::Community,
  page::{Page, PageRequest, SortOrder},
  store::{SocialStore, UserQuery},
  user::{User, UserProfile},
  view::{ThreadNode, UserThreads},
};
use threads_service::Service;

use crate::error::ApiError;

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  /// Substring matched against username or name.
  pub q:         Option<String>,
  /// User id left out of the results, typically the viewer.
  pub exclude:   Option<String>,
  pub page:      Option<u32>,
  pub page_size: Option<u32>,
  pub sort:      Option<SortOrder>,
}

/// `GET /users[?q=...][&exclude=...][&page=...][&page_size=...][&sort=...]`
pub async fn list<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<User>>, ApiError> {
  let query = UserQuery {
    excluding:   params.exclude,
    search_text: params.q.unwrap_or_default(),
    page:        PageRequest::new(
      params.page.unwrap_or(1),
      params.page_size.unwrap_or(service.config().default_page_size),
    ),
    sort:        params.sort.unwrap_or_default(),
  };
  Ok(Json(service.list_users(&query).await?))
}

// ─── Upsert ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpsertBody {
  pub username: String,
  pub name:     String,
  #[serde(default)]
  pub bio:      String,
  #[serde(default)]
  pub image:    String,
  /// Route the request came from; used for cache invalidation.
  #[serde(default)]
  pub path:     String,
}

/// `PUT /users/{id}`
pub async fn upsert<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(user_id): Path<String>,
  Json(body): Json<UpsertBody>,
) -> Result<Json<User>, ApiError> {
  let profile = UserProfile {
    user_id,
    username: body.username,
    name:     body.name,
    bio:      body.bio,
    image:    body.image,
  };
  Ok(Json(service.create_or_update_user(profile, &body.path).await?))
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /users/{id}`
pub async fn get_one<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(user_id): Path<String>,
) -> Result<Json<User>, ApiError> {
  let user = service
    .fetch_user(&user_id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;
  Ok(Json(user))
}

/// `GET /users/{id}/threads`
pub async fn threads<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(user_id): Path<String>,
) -> Result<Json<UserThreads>, ApiError> {
  let threads = service
    .fetch_user_threads(&user_id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("user {user_id} not found")))?;
  Ok(Json(threads))
}

/// `GET /users/{id}/activity`
pub async fn activity<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<ThreadNode>>, ApiError> {
  Ok(Json(service.get_activity(&user_id).await?))
}

/// `GET /users/{id}/communities`
pub async fn communities<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(user_id): Path<String>,
) -> Result<Json<Vec<Community>>, ApiError> {
  Ok(Json(service.fetch_user_communities(&user_id).await?))
}
