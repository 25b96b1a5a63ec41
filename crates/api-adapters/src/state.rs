use std::sync::Arc;

use services::PostService;

/// Shared by every handler. Cloned per request; the service itself is shared.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<PostService>,
}

impl AppState {
    pub fn new(posts: PostService) -> Self {
        Self {
            posts: Arc::new(posts),
        }
    }
}
