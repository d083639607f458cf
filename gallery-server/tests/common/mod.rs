//! Shared helpers: in-memory backends, one-shot requests, multipart bodies

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use gallery_server::AppState;
use gallery_server::api::create_router;
use gallery_server::auth::UploadCredentials;
use gallery_server::db::MemoryImageRepository;
use gallery_server::storage::MemoryStorage;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

pub const USERNAME: &str = "curator";
pub const PASSWORD: &str = "s3cret";

const BOUNDARY: &str = "gallery-test-boundary";

pub struct TestApp {
    pub router: Router,
    pub images: Arc<MemoryImageRepository>,
    pub storage: Arc<MemoryStorage>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(
            MemoryStorage::new(),
            UploadCredentials::new(Some(USERNAME.into()), Some(PASSWORD.into())),
            false,
        )
    }

    pub fn with(storage: MemoryStorage, credentials: UploadCredentials, development: bool) -> Self {
        Self::build(storage, credentials, |state| state.with_development(development))
    }

    /// Valid credentials, uploads capped at `max` bytes
    pub fn limited(max: usize) -> Self {
        Self::build(
            MemoryStorage::new(),
            UploadCredentials::new(Some(USERNAME.into()), Some(PASSWORD.into())),
            |state| state.with_max_upload_bytes(max),
        )
    }

    fn build(
        storage: MemoryStorage,
        credentials: UploadCredentials,
        configure: impl FnOnce(AppState) -> AppState,
    ) -> Self {
        let images = Arc::new(MemoryImageRepository::new());
        let storage = Arc::new(storage);
        let state = configure(AppState::from_parts(
            images.clone(),
            storage.clone(),
            credentials,
        ));
        Self {
            router: create_router(state),
            images,
            storage,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes()
            .to_vec();
        (status, body)
    }

    pub async fn json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, body) = self.send(request).await;
        let value = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).expect("JSON body")
        };
        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Request::get(uri).body(Body::empty()).expect("request"))
            .await
    }

    pub async fn post(&self, uri: &str) -> (StatusCode, Value) {
        self.json(Request::post(uri).body(Body::empty()).expect("request"))
            .await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.json(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .expect("request"),
        )
        .await
    }

    pub async fn upload(&self, form: Multipart) -> (StatusCode, Value) {
        self.json(form.into_request("/api/images")).await
    }

    /// Upload with valid credentials and return the created record
    pub async fn upload_ok(&self, file_name: &str, title: &str) -> Value {
        let form = Multipart::new()
            .credentials(USERNAME, PASSWORD)
            .text("title", title)
            .file(file_name, b"\x89PNG fake image bytes");
        let (status, body) = self.upload(form).await;
        assert_eq!(status, StatusCode::OK, "upload failed: {body}");
        body["image"].clone()
    }
}

/// Hand-built `multipart/form-data` body
#[derive(Default)]
pub struct Multipart {
    body: Vec<u8>,
}

impl Multipart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, file_name: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn credentials(self, username: &str, password: &str) -> Self {
        self.text("username", username).text("password", password)
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(self.body))
            .expect("request")
    }
}
