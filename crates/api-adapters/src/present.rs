//! Presentation of operation results.
//!
//! Handlers pass a [`ResponseMode`] alongside the result. `Page` renders a
//! template or redirects, `Json` always answers with a JSON document and
//! never redirects. Failures never reach this module; they are `ApiError`s.

use askama::Template;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use domains::Post;
use serde_json::json;
use services::DeleteOutcome;

use crate::error::ApiResult;
use crate::views::{EditTemplate, IndexTemplate, PostView};

/// Where a create from the browser lands afterwards.
pub const LISTING_PATH: &str = "/";

pub const NOTHING_DELETED_MESSAGE: &str = "No record of that post was found.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseMode {
    /// Browser navigation: rendered pages and redirects.
    Page,
    /// Programmatic consumers.
    Json,
}

pub fn listing(mode: ResponseMode, posts: Vec<Post>) -> ApiResult<Response> {
    Ok(match mode {
        ResponseMode::Page => {
            let posts = posts.iter().map(PostView::from).collect();
            Html(IndexTemplate { posts }.render()?).into_response()
        }
        ResponseMode::Json => Json(posts).into_response(),
    })
}

/// A single post; the page variant is the edit form.
pub fn single(mode: ResponseMode, post: Post) -> ApiResult<Response> {
    Ok(match mode {
        ResponseMode::Page => {
            let post = PostView::from(&post);
            Html(EditTemplate { post }.render()?).into_response()
        }
        ResponseMode::Json => Json(post).into_response(),
    })
}

/// The assigned id only reaches JSON callers; the browser is sent to the listing.
pub fn created(mode: ResponseMode, post: Post) -> Response {
    match mode {
        ResponseMode::Page => Redirect::to(LISTING_PATH).into_response(),
        ResponseMode::Json => Json(post).into_response(),
    }
}

// Browser updates and deletes are issued by script, so both modes answer JSON.
pub fn updated(mode: ResponseMode, post: Post) -> Response {
    match mode {
        ResponseMode::Page | ResponseMode::Json => Json(post).into_response(),
    }
}

pub fn deleted(mode: ResponseMode, outcome: DeleteOutcome) -> Response {
    let body = match outcome {
        DeleteOutcome::Deleted { deleted_count } => {
            json!({ "acknowledged": true, "deletedCount": deleted_count })
        }
        DeleteOutcome::NothingFound => json!({ "message": NOTHING_DELETED_MESSAGE }),
    };
    match mode {
        ResponseMode::Page | ResponseMode::Json => Json(body).into_response(),
    }
}
