//! End-to-end socket sessions over a real TCP connection

use std::net::SocketAddr;

use carebridge::shared::user::Role;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout, Duration};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::{TestApp, TestUser};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, user: &TestUser) -> Socket {
    let (socket, _) = connect_async(format!("ws://{addr}/ws?token={}", user.token))
        .await
        .expect("Failed to connect");
    socket
}

async fn send(socket: &mut Socket, event: Value) {
    socket
        .send(Message::Text(event.to_string().into()))
        .await
        .expect("Failed to send frame");
}

/// Next text frame as JSON, skipping keep-alive frames
async fn next_event(socket: &mut Socket) -> Value {
    loop {
        let frame = timeout(Duration::from_secs(2), socket.next())
            .await
            .expect("Timed out waiting for frame")
            .expect("Socket closed")
            .expect("Socket error");
        match frame {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("Frame is not JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("Unexpected frame: {other:?}"),
        }
    }
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

async fn wait_until(mut done: impl FnMut() -> bool) {
    for _ in 0..100 {
        if done() {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("Condition not reached");
}

#[tokio::test]
async fn test_socket_join_receive_and_close() {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let conv = conversation(&app, &patient, &provider).await;
    let addr = app.serve().await;

    let mut socket = connect(addr, &provider).await;
    send(
        &mut socket,
        json!({ "event": "join_conversation", "data": { "conversation_id": conv } }),
    )
    .await;
    assert_eq!(
        next_event(&mut socket).await,
        json!({ "event": "joined", "data": { "conversation_id": conv } })
    );
    assert_eq!(app.state.rooms.room_size(conv), 1);

    let (status, posted) = app
        .post(
            "/api/messages",
            &patient,
            json!({ "conversation_id": conv, "content": "Is my dose right?" }),
        )
        .await;
    assert_success!(status, posted);

    let event = next_event(&mut socket).await;
    assert_eq!(event["event"], "new_message");
    assert_eq!(event["data"]["id"], posted["id"]);
    assert_eq!(event["data"]["user_id"], patient.id);
    assert_eq!(event["data"]["content"], "Is my dose right?");

    socket.send(Message::Close(None)).await.expect("Failed to close");
    let registry = app.state.rooms.clone();
    wait_until(|| registry.connection_count() == 0).await;
    assert_eq!(app.state.rooms.room_size(conv), 0);
}

#[tokio::test]
async fn test_socket_invalid_frame_gets_error_event() {
    let app = TestApp::new().await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let addr = app.serve().await;

    let mut socket = connect(addr, &provider).await;
    socket
        .send(Message::Text("not json".into()))
        .await
        .expect("Failed to send frame");

    assert_eq!(
        next_event(&mut socket).await,
        json!({ "event": "error", "data": { "message": "Invalid event" } })
    );

    // The connection stays usable after a bad frame.
    send(&mut socket, json!({ "event": "join_conversation", "data": {} })).await;
    assert_eq!(next_event(&mut socket).await["event"], "error");
    assert_eq!(app.state.rooms.connection_count(), 1);
}

#[tokio::test]
async fn test_dropped_socket_leaves_every_room() {
    let app = TestApp::new().await;
    let patient = app.user("p1@example.com", Role::Patient).await;
    let provider = app.user("d1@example.com", Role::HealthcareProvider).await;
    let conv = conversation(&app, &patient, &provider).await;
    let addr = app.serve().await;

    let mut socket = connect(addr, &patient).await;
    send(
        &mut socket,
        json!({ "event": "join_conversation", "data": { "conversation_id": conv } }),
    )
    .await;
    assert_eq!(next_event(&mut socket).await["event"], "joined");

    drop(socket);

    let registry = app.state.rooms.clone();
    wait_until(|| registry.connection_count() == 0).await;
    assert_eq!(app.state.rooms.room_size(conv), 0);

    let (status, body) = app
        .post(
            "/api/messages",
            &patient,
            json!({ "conversation_id": conv, "content": "Anyone there?" }),
        )
        .await;
    assert_success!(status, body);
}
