//! Message API integration tests

use axum::http::{Method, StatusCode};
use carebridge::shared::user::Role;
use serde_json::{json, Value};

use crate::common::{TestApp, TestUser};

struct Thread {
    app: TestApp,
    patient: TestUser,
    provider: TestUser,
    outsider: TestUser,
    conversation_id: i64,
}

async fn thread() -> Thread {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let outsider = app.user("p2@example.com", Role::Patient).await;
    let (_, conv) = app
        .post(
            "/api/conversations",
            &patient,
            json!({ "patient_id": patient.id, "provider_id": provider.id }),
        )
        .await;
    Thread {
        conversation_id: conv["id"].as_i64().unwrap(),
        app,
        patient,
        provider,
        outsider,
    }
}

impl Thread {
    async fn send(&self, author: &TestUser, content: &str) -> (StatusCode, Value) {
        self.app
            .post(
                "/api/messages",
                author,
                json!({ "conversation_id": self.conversation_id, "content": content }),
            )
            .await
    }

    async fn history(&self, reader: &TestUser) -> (StatusCode, Value) {
        self.app
            .get(
                &format!("/api/messages/conversation/{}", self.conversation_id),
                reader,
            )
            .await
    }
}

#[tokio::test]
async fn test_send_and_list_oldest_first() {
    let t = thread().await;

    let (status, sent) = t.send(&t.patient, "I have a headache").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["user_id"], t.patient.id);
    assert_eq!(sent["user"]["email"], "p1@example.com");
    assert_eq!(sent["is_read"], false);

    t.send(&t.provider, "Since when?").await;
    t.send(&t.patient, "Since this morning").await;

    let (status, body) = t.history(&t.provider).await;
    assert_eq!(status, StatusCode::OK);
    let contents: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, ["I have a headache", "Since when?", "Since this morning"]);
}

#[tokio::test]
async fn test_send_validation_and_access() {
    let t = thread().await;

    let (status, body) = t.send(&t.patient, "   ").await;
    assert_api_error!(status, body, StatusCode::BAD_REQUEST, "conversation_id and content are required");

    let (status, _) = t
        .app
        .post("/api/messages", &t.patient, json!({ "conversation_id": 999, "content": "hi" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = t.send(&t.outsider, "let me in").await;
    assert_api_error!(status, body, StatusCode::FORBIDDEN, "Unauthorized");

    let (status, body) = t.history(&t.outsider).await;
    assert_api_error!(status, body, StatusCode::FORBIDDEN, "Unauthorized");

    let (_, body) = t.history(&t.patient).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_edit_and_delete_by_author_only() {
    let t = thread().await;
    let (_, sent) = t.send(&t.patient, "typo mesage").await;
    let uri = format!("/api/messages/{}", sent["id"]);

    let (status, body) = t.app.put(&uri, &t.provider, json!({ "content": "hijacked" })).await;
    assert_api_error!(status, body, StatusCode::FORBIDDEN, "Unauthorized");

    let (status, body) = t.app.put(&uri, &t.patient, json!({ "content": "typo message" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["content"], "typo message");

    let (status, _) = t.app.delete(&uri, &t.provider).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = t.app.delete(&uri, &t.patient).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Message deleted");

    let (status, body) = t.app.delete(&uri, &t.patient).await;
    assert_api_error!(status, body, StatusCode::NOT_FOUND, "Message not found");
}

#[tokio::test]
async fn test_mark_read_is_idempotent() {
    let t = thread().await;
    let (_, sent) = t.send(&t.patient, "please review").await;
    let uri = format!("/api/messages/{}/read", sent["id"]);

    let unread = |body: Value| body[0]["unread_count"].as_i64().unwrap();
    let (_, list) = t.app.get("/api/conversations", &t.provider).await;
    assert_eq!(unread(list), 1);

    for _ in 0..2 {
        let (status, body) = t
            .app
            .request(Method::PUT, &uri, Some(&t.provider.token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_read"], true);
    }

    let (_, list) = t.app.get("/api/conversations", &t.provider).await;
    assert_eq!(unread(list), 0);

    let (status, _) = t
        .app
        .request(Method::PUT, &uri, Some(&t.outsider.token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
