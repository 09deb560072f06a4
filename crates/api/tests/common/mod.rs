//! Shared helpers for API integration tests.
//!
//! Builds the full application router over the test pool with a fixed
//! JWT secret and no SMTP transport. Email effects are logged and
//! skipped; notification effects still write to the database, so the
//! notification endpoints stay observable from tests.

// Not every test binary exercises every helper.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use buildup_api::auth::jwt::{self, JwtConfig};
use buildup_api::auth::password;
use buildup_api::config::ServerConfig;
use buildup_api::router::build_app_router;
use buildup_api::state::AppState;
use buildup_db::models::builder::{Builder, CreateBuilder};
use buildup_db::models::coach::{Coach, CreateCoach};
use buildup_db::models::user::{CreateUser, User};
use buildup_db::repositories::{BuilderRepo, CoachRepo, UserRepo};
use buildup_events::EffectDispatcher;

/// Password behind every account seeded through [`create_account`].
pub const TEST_PASSWORD: &str = "Motdepasse-de-test-1";

/// Server configuration with a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_days: 20,
        },
    }
}

/// Build the full application router, middleware stack included.
pub fn build_test_app(pool: &PgPool) -> Router {
    let config = test_config();
    let dispatcher = EffectDispatcher::new(pool.clone(), None);
    let state = AppState::new(pool.clone(), test_config(), dispatcher);
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Send a GET request without authentication.
pub async fn get(app: Router, path: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET request with a bearer token.
pub async fn get_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(path)
        .header(AUTHORIZATION, bearer(token))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body, without authentication.
pub async fn post_json(app: Router, path: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a JSON body and a bearer token.
pub async fn post_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, bearer(token))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with an empty body and a bearer token.
pub async fn post_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(AUTHORIZATION, bearer(token))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a DELETE request with a bearer token.
pub async fn delete_auth(app: Router, path: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(path)
        .header(AUTHORIZATION, bearer(token))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a PUT request with a JSON body and a bearer token.
pub async fn put_json_auth(
    app: Router,
    path: &str,
    body: serde_json::Value,
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(Method::PUT)
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, bearer(token))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST request with a multipart form body and a bearer token.
pub async fn post_multipart_auth(
    app: Router,
    path: &str,
    form: MultipartForm,
    token: &str,
) -> Response {
    let (content_type, body) = form.finish();
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(CONTENT_TYPE, content_type)
        .header(AUTHORIZATION, bearer(token))
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Parse a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Collect a response body's raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Hand-assembled `multipart/form-data` body for upload endpoints.
pub struct MultipartForm {
    boundary: &'static str,
    body: Vec<u8>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self {
            boundary: "buildup-test-boundary",
            body: Vec::new(),
        }
    }

    /// Append a text field.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        let part = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n",
            self.boundary
        );
        self.body.extend_from_slice(part.as_bytes());
        self
    }

    /// Append a file part.
    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, data: &[u8]) -> Self {
        let header = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
             Content-Type: {content_type}\r\n\r\n",
            self.boundary
        );
        self.body.extend_from_slice(header.as_bytes());
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> (String, Vec<u8>) {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        (
            format!("multipart/form-data; boundary={}", self.boundary),
            self.body,
        )
    }
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Insert an account with the given role. Email, username and discord
/// tag derive from `suffix` so several accounts can coexist in a test.
pub async fn create_account(pool: &PgPool, suffix: &str, role: &str) -> User {
    let (hash, salt) = password::create_password_hash(TEST_PASSWORD);
    let input = CreateUser {
        first_name: format!("Prenom-{suffix}"),
        last_name: format!("Nom-{suffix}"),
        birthdate: Utc.with_ymd_and_hms(2003, 6, 15, 0, 0, 0).unwrap(),
        email: format!("{suffix}@new-talents.fr"),
        discord_tag: format!("{suffix}#0001"),
        username: suffix.to_string(),
        role: role.to_string(),
        password_hash: hash,
        password_salt: salt,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Mint a JWT for an account, signed with the test secret.
pub fn auth_token(user: &User) -> String {
    jwt::generate_token(&user.id, &user.role, &test_config().jwt).unwrap()
}

/// Seed an account and mint its token in one call.
pub async fn account_with_token(pool: &PgPool, suffix: &str, role: &str) -> (User, String) {
    let user = create_account(pool, suffix, role).await;
    let token = auth_token(&user);
    (user, token)
}

/// Insert a builder profile for an existing builder account.
pub async fn create_builder_profile(pool: &PgPool, user_id: &str) -> Builder {
    let input = CreateBuilder {
        user_id: user_id.to_string(),
        department: Some(75),
        situation: "Étudiant".to_string(),
        description: "Je monte une plateforme de covoiturage local.".to_string(),
        form: vec![],
    };
    BuilderRepo::create(pool, &input).await.unwrap()
}

/// Insert a coach profile for an existing coach account.
pub async fn create_coach_profile(pool: &PgPool, user_id: &str) -> Coach {
    let input = CreateCoach {
        user_id: user_id.to_string(),
        department: Some(33),
        situation: "Entrepreneur".to_string(),
        description: "Dix ans d'accompagnement de jeunes fondateurs.".to_string(),
        form: vec![],
    };
    CoachRepo::create(pool, &input).await.unwrap()
}
