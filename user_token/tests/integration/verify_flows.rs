use std::sync::Arc;

use user_token::{LoginRequest, LoginResponse, get_user_token_core, hash_password};

use crate::common::FileStore;

#[tokio::test]
async fn test_seed_three_then_verify() {
    let fixture = FileStore::open().await;
    assert_eq!(fixture.store.seed_users(3).await.expect("seed"), 3);

    for i in 1..=3 {
        let user_id = fixture
            .store
            .verify_user(
                &format!("user{i}@example.com"),
                &hash_password(&format!("password{i}")),
            )
            .await
            .expect("lookup");
        assert_eq!(user_id, Some(i));
    }

    let user_id = fixture
        .store
        .verify_user("user2@example.com", &hash_password("wrongpass"))
        .await
        .expect("lookup");
    assert_eq!(user_id, None);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_lookups_during_reload_see_whole_table() {
    let fixture = FileStore::open().await;
    fixture.store.seed_users(2_000).await.expect("initial seed");
    let store = Arc::new(fixture.store);

    let reload = {
        let store = store.clone();
        tokio::spawn(async move { store.seed_users(2_000).await })
    };

    let mut readers = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        readers.push(tokio::spawn(async move {
            let request = LoginRequest {
                user_name: "user1500@example.com".to_string(),
                hashed_password: hash_password("password1500"),
            };
            for _ in 0..25 {
                let response = get_user_token_core(&store, &request).await;
                // The gate keeps readers out of the half-deleted table
                assert!(response.success, "lookup failed mid-reload: {response:?}");
                tokio::task::yield_now().await;
            }
        }));
    }

    assert_eq!(reload.await.expect("reload task").expect("reload"), 2_000);
    for reader in readers {
        reader.await.expect("reader task");
    }

    let stats = store.pool_stats();
    assert_eq!(stats.available, stats.created);
}

#[tokio::test]
async fn test_failure_responses_are_indistinguishable() {
    let fixture = FileStore::open().await;
    fixture.store.seed_users(3).await.expect("seed");

    let wrong_password = get_user_token_core(
        &fixture.store,
        &LoginRequest {
            user_name: "user1@example.com".to_string(),
            hashed_password: hash_password("nope"),
        },
    )
    .await;
    let unknown_user = get_user_token_core(
        &fixture.store,
        &LoginRequest {
            user_name: "ghost@example.com".to_string(),
            hashed_password: hash_password("password1"),
        },
    )
    .await;

    assert_eq!(wrong_password, LoginResponse::invalid_credentials());
    assert_eq!(wrong_password, unknown_user);
}
