//! # MongoDB posts collection
//!
//! One client is opened at startup and shared for the life of the process;
//! the driver pools connections internally. Each trait method issues exactly
//! one driver call.

use anyhow::Context;
use async_trait::async_trait;
use domains::{Post, PostFields, PostId, PostRepository};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId, Bson, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Client, Collection};
use tracing::{debug, info};

pub struct MongoPostRepository {
    client: Client,
    collection: Collection<Document>,
}

impl MongoPostRepository {
    /// Connects and pings the deployment so a bad credential fails at startup
    /// rather than on the first request.
    pub async fn connect(uri: &str, database: &str, collection: &str) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("invalid MongoDB connection string")?;
        let db = client.database(database);
        db.run_command(doc! { "ping": 1 })
            .await
            .context("MongoDB deployment did not answer ping")?;
        info!(database, collection, "connected to MongoDB");

        Ok(Self {
            collection: db.collection(collection),
            client,
        })
    }

    /// Closes every pooled connection. Call once the server has drained.
    pub async fn shutdown(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB client shut down");
    }
}

#[async_trait]
impl PostRepository for MongoPostRepository {
    async fn insert(&self, fields: PostFields) -> anyhow::Result<PostId> {
        let result = self.collection.insert_one(bson::to_document(&fields)?).await?;
        match result.inserted_id {
            Bson::ObjectId(oid) => Ok(PostId::parse(&oid.to_hex())?),
            other => anyhow::bail!("store assigned a non-ObjectId _id: {other}"),
        }
    }

    async fn find_all(&self) -> anyhow::Result<Vec<Post>> {
        let docs: Vec<Document> = self.collection.find(doc! {}).await?.try_collect().await?;
        debug!(count = docs.len(), "fetched posts");
        docs.into_iter().map(post_from_document).collect()
    }

    async fn find_by_id(&self, id: &PostId) -> anyhow::Result<Option<Post>> {
        self.collection
            .find_one(id_filter(id)?)
            .await?
            .map(post_from_document)
            .transpose()
    }

    async fn update_fields(
        &self,
        id: &PostId,
        fields: PostFields,
        upsert: bool,
    ) -> anyhow::Result<Option<Post>> {
        let update = doc! { "$set": bson::to_document(&fields)? };
        self.collection
            .find_one_and_update(id_filter(id)?, update)
            .upsert(upsert)
            .return_document(ReturnDocument::After)
            .await?
            .map(post_from_document)
            .transpose()
    }

    async fn delete_by_id(&self, id: &PostId) -> anyhow::Result<u64> {
        let result = self.collection.delete_one(id_filter(id)?).await?;
        Ok(result.deleted_count)
    }
}

fn id_filter(id: &PostId) -> anyhow::Result<Document> {
    let oid = ObjectId::parse_str(id.as_str())
        .with_context(|| format!("{id} is not an ObjectId"))?;
    Ok(doc! { "_id": oid })
}

/// `_id` becomes a plain hex string; every other value is relaxed extended JSON.
fn post_from_document(mut doc: Document) -> anyhow::Result<Post> {
    let id = match doc.remove("_id") {
        Some(Bson::ObjectId(oid)) => PostId::parse(&oid.to_hex())?,
        other => anyhow::bail!("document has no ObjectId _id: {other:?}"),
    };
    match Bson::Document(doc).into_relaxed_extjson() {
        serde_json::Value::Object(fields) => Ok(Post::new(id, fields)),
        other => anyhow::bail!("document did not convert to a JSON object: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_id_is_rendered_as_hex() {
        let oid = ObjectId::parse_str("65a1b2c3d4e5f60718293a4b").unwrap();
        let post = post_from_document(doc! { "_id": oid, "title": "T", "likes": 2_i32 }).unwrap();

        assert_eq!(post.id.as_str(), "65a1b2c3d4e5f60718293a4b");
        assert_eq!(serde_json::Value::Object(post.fields), json!({"title": "T", "likes": 2}));
    }

    #[test]
    fn document_without_object_id_is_rejected() {
        assert!(post_from_document(doc! { "_id": "plain", "title": "T" }).is_err());
        assert!(post_from_document(doc! { "title": "T" }).is_err());
    }

    #[test]
    fn id_filter_targets_object_id() {
        let id = PostId::parse("65a1b2c3d4e5f60718293a4b").unwrap();
        let filter = id_filter(&id).unwrap();
        assert_eq!(filter.get_object_id("_id").unwrap().to_hex(), id.as_str());
    }
}
