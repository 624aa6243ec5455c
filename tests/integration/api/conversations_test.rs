//! Conversation API integration tests

use axum::http::StatusCode;
use carebridge::shared::user::Role;
use serde_json::json;

use crate::common::{count_rows, TestApp, TestUser};

struct Clinic {
    app: TestApp,
    patient: TestUser,
    provider: TestUser,
    other_patient: TestUser,
}

async fn clinic() -> Clinic {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let other_patient = app.user("p2@example.com", Role::Patient).await;
    Clinic {
        app,
        patient,
        provider,
        other_patient,
    }
}

#[tokio::test]
async fn test_create_conversation_is_idempotent() {
    let c = clinic().await;
    let body = json!({ "patient_id": c.patient.id, "provider_id": c.provider.id });

    let (status, first) = c.app.post("/api/conversations", &c.patient, body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(first["patient"]["email"], "p1@example.com");
    assert_eq!(first["provider"]["role"], "healthcare_provider");

    let (status, second) = c.app.post("/api/conversations", &c.provider, body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);

    assert_eq!(count_rows(&c.app.state.pool, "conversations").await, 1);
}

#[tokio::test]
async fn test_create_conversation_validation() {
    let c = clinic().await;

    let (status, body) = c
        .app
        .post("/api/conversations", &c.patient, json!({ "patient_id": c.patient.id }))
        .await;
    assert_api_error!(status, body, StatusCode::BAD_REQUEST, "patient_id and provider_id are required");

    let (status, body) = c
        .app
        .post(
            "/api/conversations",
            &c.patient,
            json!({ "patient_id": c.patient.id, "provider_id": 999 }),
        )
        .await;
    assert_api_error!(status, body, StatusCode::BAD_REQUEST, "Invalid user IDs");

    let (status, body) = c
        .app
        .post(
            "/api/conversations",
            &c.patient,
            json!({ "patient_id": c.patient.id, "provider_id": c.other_patient.id }),
        )
        .await;
    assert_api_error!(status, body, StatusCode::BAD_REQUEST, "provider_id must be a healthcare provider");

    assert_eq!(count_rows(&c.app.state.pool, "conversations").await, 0);
}

#[tokio::test]
async fn test_get_conversation_access() {
    let c = clinic().await;
    let (_, conv) = c
        .app
        .post(
            "/api/conversations",
            &c.patient,
            json!({ "patient_id": c.patient.id, "provider_id": c.provider.id }),
        )
        .await;
    let uri = format!("/api/conversations/{}", conv["id"]);

    let (status, body) = c.app.get(&uri, &c.provider).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], conv["id"]);

    let (status, body) = c.app.get(&uri, &c.other_patient).await;
    assert_api_error!(status, body, StatusCode::FORBIDDEN, "Unauthorized");

    let (status, body) = c.app.get("/api/conversations/999", &c.patient).await;
    assert_api_error!(status, body, StatusCode::NOT_FOUND, "Conversation not found");
}

#[tokio::test]
async fn test_list_orders_by_activity_with_unread_counts() {
    let c = clinic().await;
    let second_provider = c.app.user("d2@example.com", Role::HealthcareProvider).await;

    let (_, older) = c
        .app
        .post(
            "/api/conversations",
            &c.patient,
            json!({ "patient_id": c.patient.id, "provider_id": c.provider.id }),
        )
        .await;
    let (_, newer) = c
        .app
        .post(
            "/api/conversations",
            &c.patient,
            json!({ "patient_id": c.patient.id, "provider_id": second_provider.id }),
        )
        .await;

    // A message bumps the older conversation to the top.
    c.app
        .post(
            "/api/messages",
            &c.provider,
            json!({ "conversation_id": older["id"], "content": "Test results are in" }),
        )
        .await;

    let (status, body) = c.app.get("/api/conversations", &c.patient).await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], older["id"]);
    assert_eq!(list[0]["unread_count"], 1);
    assert_eq!(list[1]["id"], newer["id"]);
    assert_eq!(list[1]["unread_count"], 0);

    let (_, body) = c.app.get("/api/conversations", &c.other_patient).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_conversation_removes_messages() {
    let c = clinic().await;
    let (_, conv) = c
        .app
        .post(
            "/api/conversations",
            &c.patient,
            json!({ "patient_id": c.patient.id, "provider_id": c.provider.id }),
        )
        .await;
    c.app
        .post(
            "/api/messages",
            &c.patient,
            json!({ "conversation_id": conv["id"], "content": "hello" }),
        )
        .await;
    let uri = format!("/api/conversations/{}", conv["id"]);

    let (status, _) = c.app.delete(&uri, &c.other_patient).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = c.app.delete(&uri, &c.provider).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Conversation deleted");

    assert_eq!(count_rows(&c.app.state.pool, "messages").await, 0);
    let (status, _) = c.app.get(&uri, &c.patient).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
