//! # PostService
//!
//! Each method is the whole of one CRUD action: parse the identifier, apply
//! the body rules, make one store call, and classify the outcome.

use std::sync::Arc;

use domains::{AppError, Post, PostFields, PostId, PostRepository, Result};
use tracing::{error, info, instrument, warn};

use crate::policy::{PostPolicy, UpdateEcho};

/// Result of a delete that reached the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { deleted_count: u64 },
    /// Nothing matched. Reported as a successful no-op, not an error.
    NothingFound,
}

pub struct PostService {
    repo: Arc<dyn PostRepository>,
    policy: PostPolicy,
}

impl PostService {
    pub fn new(repo: Arc<dyn PostRepository>, policy: PostPolicy) -> Self {
        Self { repo, policy }
    }

    pub fn policy(&self) -> &PostPolicy {
        &self.policy
    }

    /// Inserts `fields` and returns them together with the assigned `_id`.
    #[instrument(skip_all)]
    pub async fn create(&self, fields: PostFields) -> Result<Post> {
        self.policy.check_create(&fields)?;
        let id = self
            .repo
            .insert(fields.clone())
            .await
            .map_err(|e| store_failure("create", e))?;
        info!(post_id = %id, "post created");
        Ok(Post::new(id, fields))
    }

    /// Every post. An empty collection is a successful empty list.
    #[instrument(skip_all)]
    pub async fn list(&self) -> Result<Vec<Post>> {
        let posts = self
            .repo
            .find_all()
            .await
            .map_err(|e| store_failure("list", e))?;
        info!(count = posts.len(), "posts listed");
        Ok(posts)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, raw_id: &str) -> Result<Post> {
        let id = parse_id(raw_id)?;
        match self.repo.find_by_id(&id).await {
            Ok(Some(post)) => Ok(post),
            Ok(None) => {
                warn!(post_id = %id, "post not found");
                Err(AppError::NotFound(raw_id.to_owned()))
            }
            Err(e) => Err(store_failure("get", e)),
        }
    }

    /// Merges `fields` into the post. A miss upserts or fails per policy.
    #[instrument(skip(self, fields))]
    pub async fn update(&self, raw_id: &str, fields: PostFields) -> Result<Post> {
        let id = parse_id(raw_id)?;
        self.policy.check_update(&fields)?;

        let stored = self
            .repo
            .update_fields(&id, fields.clone(), self.policy.upsert_on_update)
            .await
            .map_err(|e| store_failure("update", e))?;

        let Some(stored) = stored else {
            warn!(post_id = %id, "update matched nothing and upsert is off");
            return Err(AppError::NotFound(raw_id.to_owned()));
        };
        info!(post_id = %id, "post updated");

        Ok(match self.policy.update_echo {
            UpdateEcho::Stored => stored,
            UpdateEcho::Merged => Post::new(id, fields),
        })
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, raw_id: &str) -> Result<DeleteOutcome> {
        let id = parse_id(raw_id)?;
        let deleted_count = self
            .repo
            .delete_by_id(&id)
            .await
            .map_err(|e| store_failure("delete", e))?;

        if deleted_count == 0 {
            info!(post_id = %id, "delete matched nothing");
            Ok(DeleteOutcome::NothingFound)
        } else {
            info!(post_id = %id, deleted_count, "post deleted");
            Ok(DeleteOutcome::Deleted { deleted_count })
        }
    }
}

fn parse_id(raw_id: &str) -> Result<PostId> {
    PostId::parse(raw_id).inspect_err(|_| warn!(raw_id, "rejected malformed post id"))
}

fn store_failure(action: &str, err: anyhow::Error) -> AppError {
    error!(action, error = %err, "store operation failed");
    AppError::Store(err)
}
