//! Route table. Paths are grouped by surface; the second argument to every
//! handler is the presentation it answers with.

use std::path::Path as FsPath;

use axum::extract::{Path, State};
use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::extract::PostBody;
use crate::handlers::{create_post, delete_post, list_posts, show_post, update_post};
use crate::present::ResponseMode::{Json as AsJson, Page as AsPage};
use crate::state::AppState;

type Id = Path<String>;

/// Builds the full router. Unmatched paths are served from `static_dir` when given.
pub fn build_router(state: AppState, static_dir: Option<&FsPath>) -> Router {
    let mut router = Router::new()
        // Browser surface
        .route("/", get(|s: State<AppState>| list_posts(s, AsPage)))
        .route(
            "/posts",
            get(|s: State<AppState>| list_posts(s, AsJson))
                .post(|s: State<AppState>, b: PostBody| create_post(s, b, AsPage)),
        )
        .route(
            "/posts/{id}",
            get(|s: State<AppState>, id: Id| show_post(s, id, AsJson))
                .put(|s: State<AppState>, id: Id, b: PostBody| update_post(s, id, b, AsPage)),
        )
        .route(
            "/posts/{id}/edit",
            get(|s: State<AppState>, id: Id| show_post(s, id, AsPage)),
        )
        .route(
            "/posts/{id}/delete",
            delete(|s: State<AppState>, id: Id| delete_post(s, id, AsPage)),
        )
        // API surface
        .route(
            "/api",
            post(|s: State<AppState>, b: PostBody| create_post(s, b, AsJson)),
        )
        .route("/api/posts", get(|s: State<AppState>| list_posts(s, AsJson)))
        .route(
            "/api/posts/{id}",
            get(|s: State<AppState>, id: Id| show_post(s, id, AsJson))
                .put(|s: State<AppState>, id: Id, b: PostBody| update_post(s, id, b, AsJson)),
        )
        .route(
            "/api/posts/{id}/edit",
            get(|s: State<AppState>, id: Id| show_post(s, id, AsJson)),
        )
        .route(
            "/api/posts/{id}/delete",
            delete(|s: State<AppState>, id: Id| delete_post(s, id, AsJson)),
        );

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
