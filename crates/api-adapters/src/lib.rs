//! # api-adapters
//!
//! The HTTP surface for posts. Every CRUD action is reachable from a browser
//! route and from a `/api` route; both call the same [`PostService`] method
//! and differ only in the [`ResponseMode`] used to present the result.
//!
//! [`PostService`]: services::PostService

pub mod error;
pub mod extract;
pub mod handlers;
pub mod present;
pub mod routes;
pub mod state;
pub mod views;

pub use error::{ApiError, ApiResult};
pub use present::ResponseMode;
pub use routes::build_router;
pub use state::AppState;
