//! Ordering of concurrent posts across the log and the room

use carebridge::backend::auth::passwords::PasswordHasher;
use carebridge::backend::auth::sessions::JwtKeys;
use carebridge::backend::messaging::{conversations, messages};
use carebridge::backend::server::config::{connect_database, AppConfig};
use carebridge::backend::server::AppState;
use carebridge::shared::event::ServerEvent;
use carebridge::shared::user::Role;

use crate::common::{insert_user, TEST_JWT_SECRET};

const POSTS: usize = 120;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_list_in_broadcast_order() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::builder()
        .database_url(format!("sqlite://{}", dir.path().join("order.db").display()))
        .max_connections(8)
        .build()
        .unwrap();
    let pool = connect_database(&config).await.unwrap();
    let state = AppState::new(pool, JwtKeys::new(TEST_JWT_SECRET, 1), PasswordHasher::new(4));

    let patient = insert_user(&state.pool, "p1@example.com", Role::Patient).await;
    let provider = insert_user(&state.pool, "d1@example.com", Role::HealthcareProvider).await;
    let (conversation, _) = conversations::create(&state.pool, Some(patient.id), Some(provider.id))
        .await
        .unwrap();

    let conversation_id = conversation.id;

    let (connection, mut events) = state.rooms.register(provider.id);
    assert!(state.rooms.join(connection, conversation_id));

    let tasks: Vec<_> = (0..POSTS)
        .map(|i| {
            let state = state.clone();
            let author = if i % 2 == 0 { patient.id } else { provider.id };
            tokio::spawn(async move {
                let content = format!("message {i}");
                messages::post(
                    &state.pool,
                    &state.rooms,
                    Some(conversation_id),
                    author,
                    Some(content.as_str()),
                )
                .await
                .unwrap()
            })
        })
        .collect();
    for task in tasks {
        task.await.unwrap();
    }

    let mut broadcast_ids = Vec::new();
    while let Ok(event) = events.try_recv() {
        match event {
            ServerEvent::NewMessage(message) => broadcast_ids.push(message.id),
            other => panic!("Expected new_message, got {other:?}"),
        }
    }

    let listed = messages::list(&state.pool, conversation_id, patient.id).await.unwrap();
    let listed_ids: Vec<i64> = listed.iter().map(|m| m.id).collect();

    assert_eq!(listed.len(), POSTS);
    assert_eq!(broadcast_ids, listed_ids);
    assert!(listed_ids.windows(2).all(|w| w[0] < w[1]));
    assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));

    let refreshed = conversations::get(&state.pool, conversation_id, patient.id)
        .await
        .unwrap();
    assert!(refreshed.updated_at >= listed[POSTS - 1].created_at);
}
