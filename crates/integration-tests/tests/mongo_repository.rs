//! `MongoPostRepository` against a throwaway MongoDB container.
//!
//! Needs Docker: `cargo test -p integration-tests --features db-mongodb -- --ignored`

use domains::{PostFields, PostId, PostRepository};
use serde_json::{json, Value};
use storage_adapters::MongoPostRepository;
use testcontainers_modules::mongo::Mongo;
use testcontainers_modules::testcontainers::runners::AsyncRunner;
use testcontainers_modules::testcontainers::ContainerAsync;

const UNUSED_ID: &str = "65a1b2c3d4e5f60718293a4b";

fn fields(value: Value) -> PostFields {
    match value {
        Value::Object(map) => map,
        other => panic!("not an object: {other}"),
    }
}

/// The container must outlive the repository, so both are handed back.
async fn repository() -> (ContainerAsync<Mongo>, MongoPostRepository) {
    let node = Mongo::default().start().await.unwrap();
    let host = node.get_host().await.unwrap();
    let port = node.get_host_port_ipv4(27017).await.unwrap();
    let repo = MongoPostRepository::connect(&format!("mongodb://{host}:{port}"), "postsDB", "posts")
        .await
        .unwrap();
    (node, repo)
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn insert_read_merge_delete() {
    let (_node, repo) = repository().await;
    assert!(repo.find_all().await.unwrap().is_empty());

    let id = repo
        .insert(fields(json!({"title": "T", "body": "B", "likes": 3})))
        .await
        .unwrap();
    let read = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(read.id, id);
    assert_eq!(read.fields, fields(json!({"title": "T", "body": "B", "likes": 3})));

    let merged = repo
        .update_fields(&id, fields(json!({"body": "B2", "tags": ["a", "b"]})), false)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        merged.fields,
        fields(json!({"title": "T", "body": "B2", "likes": 3, "tags": ["a", "b"]}))
    );

    let listed = repo.find_all().await.unwrap();
    assert_eq!(listed, vec![merged]);

    assert_eq!(repo.delete_by_id(&id).await.unwrap(), 1);
    assert_eq!(repo.delete_by_id(&id).await.unwrap(), 0);
    assert!(repo.find_by_id(&id).await.unwrap().is_none());

    repo.shutdown().await;
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn update_miss_upserts_exactly_one_document_with_that_id() {
    let (_node, repo) = repository().await;
    let id = PostId::parse(UNUSED_ID).unwrap();

    let created = repo
        .update_fields(&id, fields(json!({"title": "U"})), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(created.id, id);
    assert_eq!(created.fields, fields(json!({"title": "U"})));

    let again = repo
        .update_fields(&id, fields(json!({"body": "B"})), true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(again.fields, fields(json!({"title": "U", "body": "B"})));

    let listed = repo.find_all().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);

    repo.shutdown().await;
}

#[tokio::test]
#[ignore = "needs Docker"]
async fn update_miss_without_upsert_writes_nothing() {
    let (_node, repo) = repository().await;
    let id = PostId::parse(UNUSED_ID).unwrap();

    let outcome = repo
        .update_fields(&id, fields(json!({"title": "U"})), false)
        .await
        .unwrap();
    assert!(outcome.is_none());
    assert!(repo.find_all().await.unwrap().is_empty());

    repo.shutdown().await;
}
