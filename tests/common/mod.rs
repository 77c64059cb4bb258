//! Test harness: the full route table over an in-memory SQLite database.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::Duration;
use poem::endpoint::BoxEndpoint;
use poem::http::{Method, StatusCode};
use poem::test::{TestClient, TestRequestBuilder, TestResponse};
use poem::EndpointExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tempfile::TempDir;
use yatube_api::auth::JwtKeys;
use yatube_api::config::PaginationConfig;
use yatube_api::entities::{group, user};
use yatube_api::media::MediaStore;
use yatube_api::migration::Migrator;
use yatube_api::{AppState, build_app};

pub const PIXEL_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

pub struct TestApp {
    pub client: TestClient<BoxEndpoint<'static>>,
    pub db: DatabaseConnection,
    pub keys: JwtKeys,
    pub media: TempDir,
}

pub async fn setup() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options
        .max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let media = tempfile::tempdir().unwrap();
    let keys = JwtKeys::new(b"test-secret");
    let state = Arc::new(AppState::new(
        db.clone(),
        keys.clone(),
        MediaStore::new(media.path(), "/media/"),
        PaginationConfig {
            default_limit: 20,
            max_limit: 100,
        },
    ));

    TestApp {
        client: TestClient::new(build_app(state).boxed()),
        db,
        keys,
        media,
    }
}

impl TestApp {
    pub async fn create_user(&self, username: &str) -> user::Model {
        user::ActiveModel {
            username: Set(username.to_owned()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub async fn create_group(&self, title: &str, slug: &str) -> group::Model {
        group::ActiveModel {
            title: Set(title.to_owned()),
            slug: Set(slug.to_owned()),
            description: Set(format!("About {title}")),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .unwrap()
    }

    pub fn bearer(&self, user: &user::Model) -> String {
        let token = self.keys.issue(user.id, Duration::minutes(5)).unwrap();
        format!("Bearer {token}")
    }

    fn builder(&self, method: Method, path: &str) -> TestRequestBuilder<'_, BoxEndpoint<'static>> {
        match method {
            Method::GET => self.client.get(path),
            Method::POST => self.client.post(path),
            Method::PUT => self.client.put(path),
            Method::PATCH => self.client.patch(path),
            Method::DELETE => self.client.delete(path),
            Method::HEAD => self.client.head(path),
            other => panic!("unsupported method {other}"),
        }
    }

    /// Sends a request, optionally authenticated and with a JSON body.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        user: Option<&user::Model>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = self.builder(method, path);
        if let Some(user) = user {
            req = req.header("Authorization", self.bearer(user));
        }
        if let Some(body) = body {
            req = req.body_json(&body);
        }
        read(req.send().await).await
    }

    /// Posts a raw, possibly malformed, JSON body.
    pub async fn post_raw(&self, path: &str, user: &user::Model, body: &'static str) -> (StatusCode, Value) {
        let req = self
            .client
            .post(path)
            .header("Authorization", self.bearer(user))
            .content_type("application/json")
            .body(body);
        read(req.send().await).await
    }

    pub async fn get(&self, path: &str, user: Option<&user::Model>) -> (StatusCode, Value) {
        self.call(Method::GET, path, user, None).await
    }

    pub async fn post(&self, path: &str, user: Option<&user::Model>, body: Value) -> (StatusCode, Value) {
        self.call(Method::POST, path, user, Some(body)).await
    }

    /// Creates a post through the API and returns its id.
    pub async fn create_post(&self, author: &user::Model, text: &str) -> i64 {
        let (status, body) = self
            .post("/api/v1/posts", Some(author), serde_json::json!({ "text": text }))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_i64().unwrap()
    }
}

async fn read(resp: TestResponse) -> (StatusCode, Value) {
    let status = resp.0.status();
    let bytes = resp.0.into_body().into_bytes().await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}
