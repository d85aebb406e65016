//! Handlers for `/threads` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/threads` | Main feed; optional `page`, `page_size` |
//! | `POST` | `/threads` | Body: [`CreateThread`]; returns 201 |
//! | `GET`  | `/threads/{id}` | Two levels of replies; 404 if not found |
//! | `POST` | `/threads/{id}/comments` | Body: [`CommentBody`]; returns 201 |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use threads_core::{
  page::{Page, PageRequest},
  store::SocialStore,
  view::ThreadNode,
};
use threads_service::{CreateThread, Service};
use uuid::Uuid;

use crate::error::ApiError;

// ─── Feed ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedParams {
  pub page:      Option<u32>,
  pub page_size: Option<u32>,
}

/// `GET /threads[?page=...][&page_size=...]`
pub async fn feed<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Query(params): Query<FeedParams>,
) -> Result<Json<Page<ThreadNode>>, ApiError> {
  let page = PageRequest::new(
    params.page.unwrap_or(1),
    params.page_size.unwrap_or(service.config().default_page_size),
  );
  Ok(Json(service.fetch_posts(page).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /threads`; returns 201 with the stored thread.
pub async fn create<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Json(body): Json<CreateThread>,
) -> Result<impl IntoResponse, ApiError> {
  let thread = service.create_thread(body).await?;
  Ok((StatusCode::CREATED, Json(thread)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /threads/{id}`
pub async fn get_one<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<Uuid>,
) -> Result<Json<ThreadNode>, ApiError> {
  let node = service
    .fetch_thread_by_id(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("thread {id} not found")))?;
  Ok(Json(node))
}

// ─── Comment ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CommentBody {
  pub text:    String,
  pub user_id: String,
  #[serde(default)]
  pub path:    String,
}

/// `POST /threads/{id}/comments`
pub async fn comment<S: SocialStore + 'static>(
  State(service): State<Arc<Service<S>>>,
  Path(id): Path<Uuid>,
  Json(body): Json<CommentBody>,
) -> Result<impl IntoResponse, ApiError> {
  let reply = service
    .add_comment_to_thread(id, &body.text, &body.user_id, &body.path)
    .await?;
  Ok((StatusCode::CREATED, Json(reply)))
}
