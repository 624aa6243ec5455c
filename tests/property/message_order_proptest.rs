//! Property-based tests for message ordering and unread counts
//!
//! Each case runs against a fresh in-memory database, so the case count is
//! kept low.

use carebridge::backend::messaging::{conversations, messages};
use carebridge::backend::realtime::RoomRegistry;
use carebridge::shared::user::Role;
use proptest::prelude::*;

use crate::common::{create_test_pool, insert_user};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn test_history_preserves_post_order(
        posts in prop::collection::vec((any::<bool>(), "[a-z]{1,12}"), 1..12),
    ) {
        let listed = tokio_test::block_on(async {
            let pool = create_test_pool().await;
            let rooms = RoomRegistry::new();
            let patient = insert_user(&pool, "p1@example.com", Role::Patient).await;
            let provider = insert_user(&pool, "d1@example.com", Role::HealthcareProvider).await;
            let (conv, _) = conversations::create(&pool, Some(patient.id), Some(provider.id))
                .await
                .unwrap();

            for (from_patient, text) in &posts {
                let author = if *from_patient { patient.id } else { provider.id };
                messages::post(&pool, &rooms, Some(conv.id), author, Some(text.as_str()))
                    .await
                    .unwrap();
            }

            messages::list(&pool, conv.id, provider.id).await.unwrap()
        });

        let contents: Vec<&str> = listed.iter().map(|m| m.content.as_str()).collect();
        let expected: Vec<&str> = posts.iter().map(|(_, text)| text.as_str()).collect();
        prop_assert_eq!(contents, expected);

        let ids: Vec<i64> = listed.iter().map(|m| m.id).collect();
        prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));
        prop_assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[test]
    fn test_unread_counts_only_unread_messages_from_the_other_side(
        from_patient in 0usize..8,
        from_provider in 0usize..8,
        read_fraction in 0.0f64..=1.0,
    ) {
        let marked = (from_patient as f64 * read_fraction).floor() as usize;

        let (provider_unread, patient_unread) = tokio_test::block_on(async {
            let pool = create_test_pool().await;
            let rooms = RoomRegistry::new();
            let patient = insert_user(&pool, "p1@example.com", Role::Patient).await;
            let provider = insert_user(&pool, "d1@example.com", Role::HealthcareProvider).await;
            let (conv, _) = conversations::create(&pool, Some(patient.id), Some(provider.id))
                .await
                .unwrap();

            let mut patient_messages = Vec::new();
            for i in 0..from_patient {
                let content = format!("p{i}");
                let message =
                    messages::post(&pool, &rooms, Some(conv.id), patient.id, Some(content.as_str()))
                        .await
                        .unwrap();
                patient_messages.push(message.id);
            }
            for i in 0..from_provider {
                let content = format!("d{i}");
                messages::post(&pool, &rooms, Some(conv.id), provider.id, Some(content.as_str()))
                    .await
                    .unwrap();
            }
            for id in patient_messages.iter().take(marked) {
                messages::mark_read(&pool, *id, provider.id).await.unwrap();
                // Marking twice changes nothing.
                messages::mark_read(&pool, *id, provider.id).await.unwrap();
            }

            (
                conversations::unread_count(&pool, conv.id, provider.id).await.unwrap(),
                conversations::unread_count(&pool, conv.id, patient.id).await.unwrap(),
            )
        });

        prop_assert_eq!(provider_unread, (from_patient - marked) as i64);
        prop_assert_eq!(patient_unread, from_provider as i64);
    }
}
