//! Fan-out of messages to joined connections

use carebridge::backend::realtime::session::{handle_client_event, handle_text_frame};
use carebridge::shared::event::{ClientEvent, ServerEvent};
use carebridge::shared::user::Role;
use serde_json::json;
use tokio::time::{timeout, Duration};

use crate::common::{TestApp, TestUser};

async fn recv(rx: &mut tokio::sync::mpsc::UnboundedReceiver<ServerEvent>) -> ServerEvent {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("Timed out waiting for event")
        .expect("Connection queue closed")
}

async fn conversation(app: &TestApp, patient: &TestUser, provider: &TestUser) -> i64 {
    let (_, conv) = app
        .post(
            "/api/conversations",
            patient,
            json!({ "patient_id": patient.id, "provider_id": provider.id }),
        )
        .await;
    conv["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_http_post_reaches_joined_connections_only() {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let conv = conversation(&app, &patient, &provider).await;
    let rooms = &app.state.rooms;

    let (provider_conn, mut provider_rx) = rooms.register(provider.id);
    let (idle_conn, mut idle_rx) = rooms.register(provider.id);

    handle_client_event(
        &app.state,
        provider_conn,
        provider.id,
        ClientEvent::JoinConversation {
            conversation_id: Some(conv),
        },
    )
    .await;
    assert_eq!(recv(&mut provider_rx).await, ServerEvent::Joined { conversation_id: conv });

    app.post(
        "/api/messages",
        &patient,
        json!({ "conversation_id": conv, "content": "Can I take ibuprofen?" }),
    )
    .await;

    match recv(&mut provider_rx).await {
        ServerEvent::NewMessage(message) => {
            assert_eq!(message.conversation_id, conv);
            assert_eq!(message.user_id, patient.id);
            assert_eq!(message.content, "Can I take ibuprofen?");
        }
        other => panic!("Expected new_message, got {other:?}"),
    }

    assert!(idle_rx.try_recv().is_err());
    assert!(!rooms.is_member(idle_conn, conv));
}

#[tokio::test]
async fn test_socket_messages_arrive_in_commit_order() {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let conv = conversation(&app, &patient, &provider).await;

    let (patient_conn, mut patient_rx) = app.state.rooms.register(patient.id);
    let (provider_conn, mut provider_rx) = app.state.rooms.register(provider.id);
    for (conn, user) in [(patient_conn, patient.id), (provider_conn, provider.id)] {
        let join = json!({ "event": "join_conversation", "data": { "conversation_id": conv } });
        handle_text_frame(&app.state, conn, user, &join.to_string()).await;
    }
    recv(&mut patient_rx).await;
    recv(&mut provider_rx).await;

    for text in ["one", "two", "three"] {
        let frame = json!({
            "event": "send_message",
            "data": { "conversation_id": conv, "content": text }
        });
        handle_text_frame(&app.state, patient_conn, patient.id, &frame.to_string()).await;
    }

    for rx in [&mut patient_rx, &mut provider_rx] {
        let mut seen = Vec::new();
        for _ in 0..3 {
            match recv(rx).await {
                ServerEvent::NewMessage(message) => seen.push(message.content),
                other => panic!("Expected new_message, got {other:?}"),
            }
        }
        assert_eq!(seen, ["one", "two", "three"]);
    }

    let (_, history) = app
        .get(&format!("/api/messages/conversation/{conv}"), &provider)
        .await;
    assert_eq!(history.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_non_participant_join_gets_error_event() {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let outsider = app.user("p2@example.com", Role::Patient).await;
    let conv = conversation(&app, &patient, &provider).await;

    let (conn, mut rx) = app.state.rooms.register(outsider.id);
    handle_client_event(
        &app.state,
        conn,
        outsider.id,
        ClientEvent::JoinConversation {
            conversation_id: Some(conv),
        },
    )
    .await;

    assert_eq!(recv(&mut rx).await, ServerEvent::error("Unauthorized"));
    assert_eq!(app.state.rooms.room_size(conv), 0);

    handle_client_event(
        &app.state,
        conn,
        outsider.id,
        ClientEvent::JoinConversation {
            conversation_id: Some(999),
        },
    )
    .await;
    assert_eq!(recv(&mut rx).await, ServerEvent::error("Conversation not found"));
}

#[tokio::test]
async fn test_deleting_conversation_closes_room() {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let conv = conversation(&app, &patient, &provider).await;

    let (conn, _rx) = app.state.rooms.register(provider.id);
    app.state.rooms.join(conn, conv);
    assert_eq!(app.state.rooms.room_size(conv), 1);

    app.delete(&format!("/api/conversations/{conv}"), &patient).await;
    assert_eq!(app.state.rooms.room_size(conv), 0);
    assert!(app.state.rooms.rooms_of(conn).is_empty());
}

#[tokio::test]
async fn test_disconnect_stops_delivery() {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let conv = conversation(&app, &patient, &provider).await;

    let (conn, _rx) = app.state.rooms.register(provider.id);
    app.state.rooms.join(conn, conv);
    app.state.rooms.disconnect(conn);

    let (status, body) = app
        .post("/api/messages", &patient, json!({ "conversation_id": conv, "content": "hi" }))
        .await;
    assert_success!(status, body);
    assert_eq!(app.state.rooms.connection_count(), 0);
}
