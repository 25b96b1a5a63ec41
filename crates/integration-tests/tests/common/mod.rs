#![allow(dead_code)]

use std::sync::Arc;

use api_adapters::{build_router, AppState};
use axum::body::{to_bytes, Body};
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use services::{PostPolicy, PostService};
use storage_adapters::InMemoryPostRepository;
use tower::ServiceExt;

pub const MISSING_ID: &str = "65a1b2c3d4e5f60718293a4b";

pub struct TestApp {
    pub router: Router,
    pub repo: Arc<InMemoryPostRepository>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body)
            .unwrap_or_else(|e| panic!("body is not JSON ({e}): {}", self.text()))
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn location(&self) -> Option<&str> {
        self.headers.get(header::LOCATION).and_then(|v| v.to_str().ok())
    }
}

pub fn app() -> TestApp {
    app_with(PostPolicy::default())
}

pub fn app_with(policy: PostPolicy) -> TestApp {
    let repo = Arc::new(InMemoryPostRepository::new());
    let service = PostService::new(repo.clone(), policy);
    TestApp {
        router: build_router(AppState::new(service), None),
        repo,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec();
        TestResponse { status, headers, body }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send(empty(Method::GET, uri)).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send(empty(Method::DELETE, uri)).await
    }

    pub async fn send_json(&self, method: Method, uri: &str, body: Value) -> TestResponse {
        self.send(json(method, uri, &body)).await
    }

    pub async fn send_form(&self, method: Method, uri: &str, body: &str) -> TestResponse {
        self.send(form(method, uri, body)).await
    }

    /// Creates through the API and returns the assigned id.
    pub async fn create(&self, body: Value) -> String {
        let response = self.send_json(Method::POST, "/api", body).await;
        assert_eq!(response.status, StatusCode::OK, "{}", response.text());
        response.json()["_id"]
            .as_str()
            .expect("created post carries _id")
            .to_string()
    }
}

pub fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
}

pub fn json(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn form(method: Method, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_owned()))
        .unwrap()
}
