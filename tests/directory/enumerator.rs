use session_directory::{
    error::{DirectoryError, ErrorKind},
    store::MemoryStore,
};

use crate::test_utils::{FlakyStore, Fault, TestEnv};

#[tokio::test]
async fn test_list_viewers_excludes_server_lists() {
    let env = TestEnv::new();

    for id in 1..=8 {
        env.put_hash(&format!("viewer:{}", id), &[("id_uploader", "1")])
            .await;
        env.put_list(&format!("viewer:{}:servers", id), &["s1"]).await;
    }
    env.put_hash("uploader:1", &[("title", "t")]).await;

    let mut viewers = env.directory.list_viewers().await.unwrap();
    viewers.sort();

    assert_eq!(
        viewers,
        vec!["1", "2", "3", "4", "5", "6", "7", "8"]
    );
}

#[tokio::test]
async fn test_list_uploaders_excludes_tags_and_servers() {
    let env = TestEnv::new();

    env.put_hash("uploader:1", &[("title", "one")]).await;
    env.put_list("uploader:1:tags", &["music"]).await;
    env.put_list("uploader:1:servers", &["s1"]).await;
    env.put_list("uploader:2:servers", &["s2"]).await;
    env.put_hash("uploader:3", &[("title", "three")]).await;
    env.put_hash("viewer:1", &[("id_uploader", "1")]).await;

    assert_eq!(
        env.directory.list_uploaders().await.unwrap(),
        vec!["1".to_string(), "3".to_string()]
    );
}

#[tokio::test]
async fn test_enumeration_spans_many_scan_pages() {
    let env = TestEnv::new();

    for id in 0..25 {
        env.put_hash(&format!("viewer:{}", id), &[("id_uploader", "1")])
            .await;
    }

    let directory = env.directory.clone().with_scan_count(1);

    assert_eq!(directory.scan_count(), 1);
    assert_eq!(directory.list_viewers().await.unwrap().len(), 25);
}

#[tokio::test]
async fn test_enumeration_is_restartable() {
    let env = TestEnv::new();

    env.put_hash("viewer:1", &[("id_uploader", "1")]).await;
    env.put_hash("viewer:2", &[("id_uploader", "1")]).await;

    let first = env.directory.list_viewers().await.unwrap();
    let second = env.directory.list_viewers().await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_duplicate_scan_keys_are_reported_once() {
    let store = MemoryStore::new();
    let env = TestEnv {
        store: store.clone(),
        directory: FlakyStore::new(store, Fault::DuplicateScanKeys, &["scan"]).directory(),
    };

    env.put_hash("viewer:1", &[("id_uploader", "1")]).await;
    env.put_hash("viewer:2", &[("id_uploader", "1")]).await;

    assert_eq!(
        env.directory.list_viewers().await.unwrap(),
        vec!["1".to_string(), "2".to_string()]
    );
}

#[tokio::test]
async fn test_malformed_key_fails_enumeration() {
    let env = TestEnv::new();

    env.put_hash("viewer:1", &[("id_uploader", "1")]).await;
    env.put_list("viewer:1:tags", &["oops"]).await;

    let err = env.directory.list_viewers().await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MalformedKey);
}

#[tokio::test]
async fn test_scan_failure_aborts_enumeration() {
    let store = MemoryStore::new();
    let directory = FlakyStore::new(store.clone(), Fault::Unavailable, &["scan"]).directory();

    let err = directory.list_uploaders().await.unwrap_err();

    assert!(matches!(err, DirectoryError::StoreUnavailable(_)));
    assert!(err.is_retryable());
}
