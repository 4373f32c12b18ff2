use tempfile::TempDir;
use user_token::{StoreConfig, UserStore};

/// A file-backed store that lives as long as its temporary directory
pub struct FileStore {
    pub store: UserStore,
    pub config: StoreConfig,
    // Held so the directory outlives the store
    _dir: TempDir,
}

impl FileStore {
    pub async fn open() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("users.db");
        let config = StoreConfig::default().with_database_url(format!("sqlite:{}", path.display()));

        let store = UserStore::open(config.clone())
            .await
            .expect("Failed to open file-backed store");

        Self {
            store,
            config,
            _dir: dir,
        }
    }

    /// Close the store and open the same file again
    pub async fn reopen(self) -> Self {
        let FileStore { store, config, _dir } = self;
        store.close().await;

        let store = UserStore::open(config.clone())
            .await
            .expect("Failed to reopen file-backed store");

        Self { store, config, _dir }
    }
}
