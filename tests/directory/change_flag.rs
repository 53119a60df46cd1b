use std::sync::Arc;

use session_directory::{
    directory::{BitrateTable, ChangeFlag, Directory},
    store::{BoundedStore, MemoryStore},
};

use crate::test_utils::{TestEnv, TEST_STORE_TIMEOUT};

#[tokio::test]
async fn test_check_returns_true_once_per_mark() {
    let env = TestEnv::new();

    assert!(!env.directory.check_viewer_change_flag().await.unwrap());

    env.directory.change_flag().mark().await.unwrap();

    assert!(env.directory.check_viewer_change_flag().await.unwrap());
    assert!(!env.directory.check_viewer_change_flag().await.unwrap());
    assert_eq!(env.scalar("modifViewer").await.as_deref(), Some("no"));
}

#[tokio::test]
async fn test_adding_and_deleting_viewers_raise_the_flag() {
    let env = TestEnv::new();

    env.directory.add_viewer(1, 2).await.unwrap();
    assert!(env.directory.check_viewer_change_flag().await.unwrap());

    env.directory.delete_viewer(1).await.unwrap();
    assert!(env.directory.check_viewer_change_flag().await.unwrap());

    // nothing left to remove, so the viewer set did not change
    env.directory.delete_viewer(1).await.unwrap();
    assert!(!env.directory.check_viewer_change_flag().await.unwrap());
}

#[tokio::test]
async fn test_uploader_changes_do_not_raise_the_flag() {
    let env = TestEnv::new();

    env.directory.add_uploader(1, "title", &[]).await.unwrap();
    env.directory.delete_uploader(1).await.unwrap();

    assert!(!env.directory.check_viewer_change_flag().await.unwrap());
}

#[tokio::test]
async fn test_shared_state_handles() {
    let store = MemoryStore::new();
    let bounded = BoundedStore::new(Arc::new(store.clone()), TEST_STORE_TIMEOUT);
    let change_flag = ChangeFlag::with_key(bounded.clone(), "viewers-changed");
    let bitrates = BitrateTable::with_key(bounded.clone(), "bitrates");

    let first = Directory::new(bounded.clone(), change_flag.clone(), bitrates.clone());
    let second = Directory::new(bounded, change_flag, bitrates);

    first.add_viewer(1, 1).await.unwrap();
    second.report_server_load("s1", "42").await.unwrap();

    assert_eq!(second.change_flag().key(), "viewers-changed");
    assert_eq!(first.bitrate_table().key(), "bitrates");
    assert!(second.check_viewer_change_flag().await.unwrap());
    assert!(!first.check_viewer_change_flag().await.unwrap());
    assert_eq!(first.bitrates().await.unwrap().get("s1").map(String::as_str), Some("42"));

    let store = store.inner();
    let store_guard = store.lock().await;
    assert!(store_guard.contains_key("viewers-changed"));
    assert!(store_guard.contains_key("bitrates"));
    assert!(!store_guard.contains_key("modifViewer"));
    assert!(!store_guard.contains_key("distrib"));
}
