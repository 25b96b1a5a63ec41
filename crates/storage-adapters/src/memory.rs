//! # In-memory posts collection
//!
//! A process-local stand-in for the document store with the same merge and
//! upsert semantics. Backs `storage.backend = "memory"` and the test suites.

use async_trait::async_trait;
use bson::oid::ObjectId;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use domains::{Post, PostFields, PostId, PostRepository};
use tracing::debug;

#[derive(Debug, Default)]
pub struct InMemoryPostRepository {
    posts: DashMap<PostId, PostFields>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn insert(&self, fields: PostFields) -> anyhow::Result<PostId> {
        let id = PostId::parse(&ObjectId::new().to_hex())?;
        self.posts.insert(id.clone(), fields);
        debug!(post_id = %id, "inserted");
        Ok(id)
    }

    /// Ascending id order, which for store-assigned ids is creation order.
    async fn find_all(&self) -> anyhow::Result<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .map(|entry| Post::new(entry.key().clone(), entry.value().clone()))
            .collect();
        posts.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(posts)
    }

    async fn find_by_id(&self, id: &PostId) -> anyhow::Result<Option<Post>> {
        Ok(self
            .posts
            .get(id)
            .map(|entry| Post::new(id.clone(), entry.value().clone())))
    }

    async fn update_fields(
        &self,
        id: &PostId,
        fields: PostFields,
        upsert: bool,
    ) -> anyhow::Result<Option<Post>> {
        let stored = match self.posts.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let doc = entry.get_mut();
                for (name, value) in fields {
                    doc.insert(name, value);
                }
                doc.clone()
            }
            Entry::Vacant(entry) if upsert => {
                debug!(post_id = %id, "upserted");
                entry.insert(fields).value().clone()
            }
            Entry::Vacant(_) => return Ok(None),
        };
        Ok(Some(Post::new(id.clone(), stored)))
    }

    async fn delete_by_id(&self, id: &PostId) -> anyhow::Result<u64> {
        Ok(self.posts.remove(id).map_or(0, |_| 1))
    }
}
