// tests/common/mod.rs
#![allow(dead_code)]

use std::path::PathBuf;

use quizdesk::{config::Config, routes, state::AppState};
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub upload_dir: PathBuf,
    pub pool: SqlitePool,
}

/// Spawns the app on a random port over a fresh in-memory database.
pub async fn spawn_app() -> TestApp {
    // One connection that never expires keeps the in-memory database alive.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory SQLite");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to migrate database");

    let upload_dir = std::env::temp_dir().join(format!("quizdesk-test-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&upload_dir).expect("Failed to create upload dir");

    let config = Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test_secret_for_integration_tests".to_string(),
        jwt_expiration: 600,
        rust_log: "error".to_string(),
        upload_dir: upload_dir.clone(),
        max_upload_bytes: 1024 * 1024,
        port: 0,
    };

    let app = routes::create_router(AppState::new(pool.clone(), config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client: reqwest::Client::new(),
        upload_dir,
        pool,
    }
}

pub fn unique_name(prefix: &str) -> String {
    format!("{}_{}", prefix, &uuid::Uuid::new_v4().to_string()[..8])
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn register(&self, username: &str, password: &str, role: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/register"))
            .json(&json!({ "username": username, "password": password, "role": role }))
            .send()
            .await
            .expect("Register failed")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.client
            .post(self.url("/api/auth/login"))
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Login failed")
    }

    /// Registers a fresh account and returns its user id.
    pub async fn register_id(&self, role: &str) -> i64 {
        let resp = self.register(&unique_name(&role[..1]), "password123", role).await;
        assert_eq!(resp.status().as_u16(), 201);
        let user: Value = resp.json().await.unwrap();
        user["id"].as_i64().unwrap()
    }

    /// Registers a fresh account with the given role and returns (username, token).
    pub async fn signed_in(&self, role: &str) -> (String, String) {
        let username = unique_name(&role[..1]);
        let resp = self.register(&username, "password123", role).await;
        assert_eq!(resp.status().as_u16(), 201);

        let body: Value = self.login(&username, "password123").await.json().await.unwrap();
        let token = body["token"].as_str().expect("Token not found").to_string();
        (username, token)
    }

    pub async fn get(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("GET failed")
    }

    pub async fn post_json(&self, path: &str, token: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("POST failed")
    }

    pub async fn create_quiz(&self, token: &str, body: Value) -> i64 {
        let resp = self.post_json("/api/quizzes", token, &body).await;
        assert_eq!(resp.status().as_u16(), 201);
        let quiz: Value = resp.json().await.unwrap();
        quiz["id"].as_i64().unwrap()
    }

    pub async fn add_question(&self, token: &str, quiz_id: i64, body: Value) -> i64 {
        let resp = self
            .post_json(&format!("/api/quizzes/{}/questions", quiz_id), token, &body)
            .await;
        assert_eq!(resp.status().as_u16(), 201);
        let question: Value = resp.json().await.unwrap();
        question["id"].as_i64().unwrap()
    }

    /// Creates the capitals quiz: multiple choice "Paris", true/false "True",
    /// free text "Blue". Returns (quiz id, [mc, tf, text] question ids).
    pub async fn capitals_quiz(&self, token: &str, extra: Value) -> (i64, [i64; 3]) {
        let mut body = json!({ "title": "Capitals", "passing_score": 60 });
        if let (Some(base), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        let quiz_id = self.create_quiz(token, body).await;

        let mc = self
            .add_question(
                token,
                quiz_id,
                json!({
                    "question_type": "multiple_choice",
                    "question_text": "Capital of France?",
                    "options": ["London", "Paris", "Rome", "Berlin"],
                    "correct_answer": "Paris"
                }),
            )
            .await;
        let tf = self
            .add_question(
                token,
                quiz_id,
                json!({
                    "question_type": "true_false",
                    "question_text": "Water is wet.",
                    "correct_answer": "True"
                }),
            )
            .await;
        let text = self
            .add_question(
                token,
                quiz_id,
                json!({
                    "question_type": "free_text",
                    "question_text": "Colour of the sky?",
                    "correct_answer": "Blue"
                }),
            )
            .await;

        (quiz_id, [mc, tf, text])
    }
}
