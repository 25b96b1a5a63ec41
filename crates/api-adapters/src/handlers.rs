//! # Handlers
//!
//! Each handler runs exactly one [`services::PostService`] operation and
//! hands the result to [`crate::present`]. The mode is fixed per route in
//! [`crate::routes`].

use axum::extract::{Path, State};
use axum::response::Response;

use crate::error::ApiResult;
use crate::extract::PostBody;
use crate::present::{self, ResponseMode};
use crate::state::AppState;

pub async fn list_posts(State(state): State<AppState>, mode: ResponseMode) -> ApiResult<Response> {
    let posts = state.posts.list().await?;
    present::listing(mode, posts)
}

pub async fn show_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mode: ResponseMode,
) -> ApiResult<Response> {
    let post = state.posts.get(&id).await?;
    present::single(mode, post)
}

pub async fn create_post(
    State(state): State<AppState>,
    PostBody(fields): PostBody,
    mode: ResponseMode,
) -> ApiResult<Response> {
    let post = state.posts.create(fields).await?;
    Ok(present::created(mode, post))
}

pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    PostBody(fields): PostBody,
    mode: ResponseMode,
) -> ApiResult<Response> {
    let post = state.posts.update(&id, fields).await?;
    Ok(present::updated(mode, post))
}

pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    mode: ResponseMode,
) -> ApiResult<Response> {
    let outcome = state.posts.delete(&id).await?;
    Ok(present::deleted(mode, outcome))
}
