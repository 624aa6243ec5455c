//! Authentication test helpers
//!
//! Provides an in-process application, users with ready-made tokens, and
//! a small request helper on top of `tower::ServiceExt::oneshot`. Socket
//! tests can also serve the router on a loopback port.

use std::net::SocketAddr;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use carebridge::backend::auth::passwords::PasswordHasher;
use carebridge::backend::auth::sessions::JwtKeys;
use carebridge::backend::routes::create_router;
use carebridge::backend::server::AppState;
use carebridge::shared::user::Role;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use super::database::{create_test_pool, insert_user};

/// Secret the test application signs tokens with
pub const TEST_JWT_SECRET: &str = "integration-test-secret";

/// Test user credentials
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub token: String,
}

/// The application under test and its state
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
}

impl TestApp {
    /// Fresh application over an empty database
    pub async fn new() -> Self {
        let state = AppState::new(
            create_test_pool().await,
            JwtKeys::new(TEST_JWT_SECRET, 1),
            PasswordHasher::new(4),
        );
        let router = create_router(state.clone(), &["*".to_string()]);
        Self { state, router }
    }

    /// Create a user directly in the database and sign a token for it
    pub async fn user(&self, email: &str, role: Role) -> TestUser {
        let user = insert_user(&self.state.pool, email, role).await;
        let token = self
            .state
            .jwt
            .create_token(user.id, &user.email)
            .expect("Failed to create test token");
        TestUser {
            id: user.id,
            email: user.email,
            token,
        }
    }

    /// Serve the router on an ephemeral loopback port
    ///
    /// The server task lives until the test's runtime shuts down.
    pub async fn serve(&self) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Test server failed");
        });
        addr
    }

    /// Send a request and decode the JSON response body
    ///
    /// An empty body decodes as `Value::Null`.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, auth_header(token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("Failed to read response body");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("Response body is not JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.request(Method::GET, uri, Some(&user.token), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, uri, Some(&user.token), Some(body)).await
    }

    pub async fn put(&self, uri: &str, user: &TestUser, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, Some(&user.token), Some(body)).await
    }

    pub async fn delete(&self, uri: &str, user: &TestUser) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, Some(&user.token), None).await
    }
}

/// Create authorization header value
pub fn auth_header(token: &str) -> String {
    format!("Bearer {}", token)
}
