#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{HeaderMap, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use serde_json::{Value, json};
use snaploop::config::AppConfig;
use snaploop::infrastructure::database;
use snaploop::services::media_host::{
    MediaHost, MediaSource, UploadRequest, UploadSignature, UploadedMedia, sign_upload,
};
use snaploop::{AppState, create_app};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

/// In-memory media host that records what it was asked to do.
#[derive(Default)]
pub struct MockMediaHost {
    counter: AtomicUsize,
    pub fail_uploads: AtomicBool,
    pub uploads: Mutex<Vec<(String, String)>>,
    pub deleted: Mutex<Vec<String>>,
}

impl MockMediaHost {
    pub fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<(String, String)> {
        self.uploads.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaHost for MockMediaHost {
    async fn upload(&self, request: UploadRequest) -> anyhow::Result<UploadedMedia> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("media host unavailable"));
        }
        if let MediaSource::Bytes(bytes) = &request.source {
            assert!(!bytes.is_empty());
        }

        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let file_path = format!("{}/{}", request.folder, request.file_name);
        self.uploads
            .lock()
            .unwrap()
            .push((request.folder.clone(), request.file_name.clone()));

        Ok(UploadedMedia {
            url: format!("https://media.test{}", file_path),
            file_id: format!("file_{}", n),
            file_path,
        })
    }

    async fn delete_file(&self, file_id: &str) -> anyhow::Result<()> {
        self.deleted.lock().unwrap().push(file_id.to_string());
        Ok(())
    }

    async fn upload_signature(
        &self,
        token: Option<String>,
        expire: Option<i64>,
    ) -> anyhow::Result<UploadSignature> {
        let token = token.unwrap_or_else(|| "mock-token".to_string());
        let expire = expire.unwrap_or(4_102_444_800);
        Ok(UploadSignature {
            signature: sign_upload("mock_private", &token, expire)?,
            token,
            expire,
            public_key: "mock_public".to_string(),
        })
    }
}

pub struct TestApp {
    pub router: Router,
    pub db: DatabaseConnection,
    pub media: Arc<MockMediaHost>,
    pub config: AppConfig,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    pub fn set_cookie(&self) -> Option<String> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }
}

pub async fn setup_test_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    database::run_migrations(&db).await.unwrap();
    db
}

pub async fn setup() -> TestApp {
    setup_with_config(AppConfig {
        jwt_secret: "test_secret".to_string(),
        ..AppConfig::development()
    })
    .await
}

pub async fn setup_with_config(config: AppConfig) -> TestApp {
    let db = setup_test_db().await;
    let media = Arc::new(MockMediaHost::default());
    let state = AppState::new(db.clone(), media.clone(), config.clone());

    TestApp {
        router: create_app(state),
        db,
        media,
        config,
    }
}

impl TestApp {
    pub async fn request(&self, req: Request<Body>) -> TestResponse {
        let response = self.router.clone().oneshot(req).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.request(req).await
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None, None).await
    }

    /// Registers `name` and returns (token, user id).
    pub async fn register(&self, name: &str) -> (String, String) {
        let res = self
            .send(
                "POST",
                "/api/users/register",
                Some(json!({
                    "username": name,
                    "displayName": name,
                    "email": format!("{}@example.com", name),
                    "password": PASSWORD,
                })),
                None,
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "register failed: {}", res.body);
        (
            res.body["data"]["token"].as_str().unwrap().to_string(),
            res.body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Publishes a video through the API and returns its id.
    pub async fn publish(&self, token: &str, title: &str, category: &str) -> String {
        self.publish_with(token, json!({ "title": title, "category": category }))
            .await
    }

    pub async fn publish_with(&self, token: &str, mut body: Value) -> String {
        if body.get("file").is_none() {
            body["file"] = json!("data:video/mp4;base64,AAAAIGZ0eXBpc29t");
        }
        let res = self.send("POST", "/api/videos", Some(body), Some(token)).await;
        assert_eq!(res.status, StatusCode::CREATED, "publish failed: {}", res.body);
        res.body["data"]["id"].as_str().unwrap().to_string()
    }
}
