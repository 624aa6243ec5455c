//! HTTP side of the `/ws` upgrade

use axum::http::{Method, StatusCode};
use carebridge::shared::user::Role;

use crate::common::TestApp;

#[tokio::test]
async fn test_ws_without_token_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/ws", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_ws_with_invalid_token_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/ws?token=forged", None, None).await;
    assert_api_error!(status, body, StatusCode::UNAUTHORIZED, "Invalid or expired token");
}

#[tokio::test]
async fn test_ws_with_valid_token_but_no_upgrade() {
    let app = TestApp::new().await;
    let user = app.user("p1@example.com", Role::Patient).await;

    // Authenticated, but a plain GET is not a WebSocket handshake.
    let (status, _) = app
        .request(Method::GET, &format!("/ws?token={}", user.token), None, None)
        .await;
    assert!(status.is_client_error());
    assert_ne!(status, StatusCode::UNAUTHORIZED);
}
