//! # services
//!
//! One operation per CRUD action on posts. Both HTTP surfaces call into the
//! same [`PostService`]; only the presentation of the result differs.

pub mod policy;
pub mod post_service;

pub use policy::{PostPolicy, UpdateEcho};
pub use post_service::{DeleteOutcome, PostService};
