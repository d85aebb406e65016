//! Handlers for `/communities` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/communities` | Optional `q`, `page`, `page_size`, `sort` |
//! | `POST`   | `/communities` | Body: [`NewCommunity`]; returns 201 |
//! | `GET`    | `/communities/{id}` | Creator and members |
//! | `PATCH`  | `/communities/{id}` | Body: [`CommunityUpdate`] |
//! | `DELETE` | `/communities/{id}` | Returns the deleted community |
//! | `GET`    | `/communities/{id}/threads` | Threads with one reply level |
//! | `PUT`    | `/communities/{id}/members/{user_id}` | 204; 409 if already a member |
//! | `DELETE` | `/communities/{id}/members/{user_id}` | 204 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use threads_core::{
  community::{Community, CommunityUpdate, NewCommunity},
  page::{Page, PageRequest, SortOrder},
  store::{CommunityQuery, SocialStore},
  view::{CommunityDetails, CommunityListing, CommunityPosts},
};
use threads_service::Service;

use crate::error::ApiError;

fn not_found(id: &str) -> ApiError {
  ApiError::NotFound(format!("community {id} not found"))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub q:         Option<String>,
  pub page:      Option<u32>,
  pub page_size: Option<u32>,
  pub sort:      Option<SortOrder>,
}

/// `GET /communities[?q=...][&page=...][&page_size=...][&sort=...]`
pub async fn list<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Page<CommunityListing>>, ApiError> {
  let query = CommunityQuery {
    search_text: params.q.unwrap_or_default(),
    page:        PageRequest::new(
      params.page.unwrap_or(1),
      params.page_size.unwrap_or(service.config().default_page_size),
    ),
    sort:        params.sort.unwrap_or_default(),
  };
  Ok(Json(service.list_communities(&query).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /communities`
pub async fn create<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Json(body): Json<NewCommunity>,
) -> Result<impl IntoResponse, ApiError> {
  let community = service.create_community(body).await?;
  Ok((StatusCode::CREATED, Json(community)))
}

// ─── Single community ─────────────────────────────────────────────────────────

/// `GET /communities/{id}`
pub async fn details<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<String>,
) -> Result<Json<CommunityDetails>, ApiError> {
  let details = service
    .fetch_community_details(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(details))
}

/// `GET /communities/{id}/threads`
pub async fn posts<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<String>,
) -> Result<Json<CommunityPosts>, ApiError> {
  let posts = service
    .fetch_community_posts(&id)
    .await?
    .ok_or_else(|| not_found(&id))?;
  Ok(Json(posts))
}

/// `PATCH /communities/{id}`
pub async fn update<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<String>,
  Json(body): Json<CommunityUpdate>,
) -> Result<Json<Community>, ApiError> {
  Ok(Json(service.update_community_info(&id, body).await?))
}

/// `DELETE /communities/{id}`
pub async fn delete<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<String>,
) -> Result<Json<Community>, ApiError> {
  Ok(Json(service.delete_community(&id).await?))
}

// ─── Membership ───────────────────────────────────────────────────────────────

/// `PUT /communities/{id}/members/{user_id}`
pub async fn add_member<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
  service.add_member(&id, &user_id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /communities/{id}/members/{user_id}`
pub async fn remove_member<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path((id, user_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
  service.remove_member(&user_id, &id).await?;
  Ok(StatusCode::NO_CONTENT)
}
