//! # Core Traits (Ports)
//!
//! Any storage backend must implement these traits to be used by the binary.

use async_trait::async_trait;

use crate::models::{Post, PostFields, PostId};

/// Persistence contract for the posts collection.
///
/// Every call is a single store operation; sequences of calls made by a
/// caller are not atomic.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Inserts a new document. The store assigns the identifier.
    async fn insert(&self, fields: PostFields) -> anyhow::Result<PostId>;

    /// Every document, fully materialised, in store-defined order.
    async fn find_all(&self) -> anyhow::Result<Vec<Post>>;

    async fn find_by_id(&self, id: &PostId) -> anyhow::Result<Option<Post>>;

    /// Overwrites the given fields, leaving the rest of the document alone.
    ///
    /// Returns the document as stored after the update. `None` means nothing
    /// matched and `upsert` was false; with `upsert` a miss creates a document
    /// from `id` plus `fields`.
    async fn update_fields(
        &self,
        id: &PostId,
        fields: PostFields,
        upsert: bool,
    ) -> anyhow::Result<Option<Post>>;

    /// Removes at most one document. Returns how many were removed.
    async fn delete_by_id(&self, id: &PostId) -> anyhow::Result<u64>;
}
