use user_token::hash_password;

use crate::common::FileStore;

#[tokio::test]
async fn test_seed_ten_thousand_twice() {
    let fixture = FileStore::open().await;

    let first = fixture.store.seed_users(10_000).await.expect("first seed");
    let second = fixture.store.seed_users(10_000).await.expect("second seed");

    assert_eq!(first, 10_000);
    assert_eq!(second, 10_000);
    assert_eq!(fixture.store.count_users().await.expect("count"), 10_000);
}

#[tokio::test]
async fn test_seeded_rows_survive_reopen() {
    let fixture = FileStore::open().await;
    fixture.store.seed_users(3).await.expect("seed");

    let fixture = fixture.reopen().await;

    assert_eq!(fixture.store.count_users().await.expect("count"), 3);
    let user_id = fixture
        .store
        .verify_user("user2@example.com", &hash_password("password2"))
        .await
        .expect("lookup");
    assert_eq!(user_id, Some(2));
}

#[tokio::test]
async fn test_open_is_idempotent_on_existing_file() {
    let fixture = FileStore::open().await;
    fixture.store.seed_users(5).await.expect("seed");

    // Reopening re-runs table and index creation against the populated file
    let fixture = fixture.reopen().await;
    let fixture = fixture.reopen().await;

    assert_eq!(fixture.store.count_users().await.expect("count"), 5);
}

#[tokio::test]
async fn test_journal_mode_is_wal_on_disk() {
    let fixture = FileStore::open().await;
    let config = fixture.config.clone();
    fixture.store.close().await;

    // Persistent journal mode is recorded in the file header
    let path = config
        .database_url
        .strip_prefix("sqlite:")
        .expect("url has sqlite prefix")
        .to_string();
    let mut header = [0u8; 20];
    {
        use std::io::Read;
        let mut file = std::fs::File::open(&path).expect("database file exists");
        file.read_exact(&mut header).expect("read header");
    }
    // Bytes 18 and 19 are the file format write/read versions; 2 means WAL
    assert_eq!(header[18], 2);
    assert_eq!(header[19], 2);
}
