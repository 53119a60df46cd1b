use session_directory::error::{DirectoryError, ErrorKind};

use crate::test_utils::{TestEnv, TestUtils};

#[tokio::test]
async fn test_add_viewer_then_read_back() {
    let env = TestEnv::new();

    for (id_viewer, id_uploader) in [(0, 0), (7, 3), (i64::MAX, 12)] {
        env.directory.add_viewer(id_viewer, id_uploader).await.unwrap();

        let viewer = env.directory.viewer(id_viewer).await.unwrap().unwrap();

        assert_eq!(viewer.id_uploader, Some(id_uploader.to_string()));
        assert!(viewer.date_started.is_some_and(|date| !date.is_empty()));
        assert!(viewer.servers.is_empty());
    }
}

#[tokio::test]
async fn test_add_viewer_does_not_require_uploader() {
    let env = TestEnv::new();

    env.directory.add_viewer(1, 999).await.unwrap();

    assert!(env.directory.uploader(999).await.unwrap().is_none());
    assert!(env.contains_key("viewer:1").await);
}

#[tokio::test]
async fn test_negative_ids_are_rejected_without_writes() {
    let env = TestEnv::new();

    let results = vec![
        env.directory.add_viewer(-1, 2).await,
        env.directory.add_viewer(1, -2).await,
        env.directory
            .add_uploader(-5, "title", &TestUtils::strings(&["tag"]))
            .await,
        env.directory.delete_viewer(-1).await,
        env.directory.delete_uploader(-1).await,
    ];

    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(!err.is_retryable());
    }

    assert!(env.keys().await.is_empty());
}

#[tokio::test]
async fn test_empty_title_is_rejected_without_writes() {
    let env = TestEnv::new();

    assert_eq!(
        env.directory
            .add_uploader(4, "", &TestUtils::strings(&["music"]))
            .await,
        Err(DirectoryError::validation("title must not be empty"))
    );
    assert!(env.keys().await.is_empty());
}

#[tokio::test]
async fn test_add_uploader_keeps_tag_order() {
    let env = TestEnv::new();

    env.directory
        .add_uploader(4, "Live from the lab", &TestUtils::strings(&["science", "live", "q&a"]))
        .await
        .unwrap();

    let uploader = env.directory.uploader(4).await.unwrap().unwrap();

    assert_eq!(uploader.title.as_deref(), Some("Live from the lab"));
    assert!(uploader.publish_time.is_some());
    assert_eq!(uploader.tags, TestUtils::strings(&["science", "live", "q&a"]));
    assert!(uploader.servers.is_empty());
}

#[tokio::test]
async fn test_add_uploader_again_replaces_tags() {
    let env = TestEnv::new();

    env.directory
        .add_uploader(4, "first", &TestUtils::strings(&["a", "b", "c"]))
        .await
        .unwrap();
    env.directory
        .add_uploader(4, "second", &TestUtils::strings(&["d"]))
        .await
        .unwrap();

    let uploader = env.directory.uploader(4).await.unwrap().unwrap();

    assert_eq!(uploader.title.as_deref(), Some("second"));
    assert_eq!(uploader.tags, TestUtils::strings(&["d"]));
}

#[tokio::test]
async fn test_add_uploader_without_tags() {
    let env = TestEnv::new();

    env.directory.add_uploader(4, "untagged", &[]).await.unwrap();

    assert!(!env.contains_key("uploader:4:tags").await);
    assert!(env
        .directory
        .uploader(4)
        .await
        .unwrap()
        .unwrap()
        .tags
        .is_empty());
}

#[tokio::test]
async fn test_delete_viewer_twice_leaves_no_residual_keys() {
    let env = TestEnv::new();

    env.directory.add_viewer(7, 3).await.unwrap();
    env.put_list("viewer:7:servers", &["s1", "s2"]).await;

    assert_eq!(env.directory.delete_viewer(7).await, Ok(()));
    assert_eq!(env.directory.delete_viewer(7).await, Ok(()));

    assert!(!env.contains_key("viewer:7").await);
    assert!(!env.contains_key("viewer:7:servers").await);
    assert!(env.directory.viewer(7).await.unwrap().is_none());
}

// Deleting an uploader removes its tag and server lists, not only the record.
#[tokio::test]
async fn test_delete_uploader_removes_companion_keys() {
    let env = TestEnv::new();

    env.directory
        .add_uploader(9, "to be removed", &TestUtils::strings(&["x", "y"]))
        .await
        .unwrap();
    env.put_list("uploader:9:servers", &["s1"]).await;
    env.directory.add_uploader(10, "kept", &[]).await.unwrap();

    env.directory.delete_uploader(9).await.unwrap();
    env.directory.delete_uploader(9).await.unwrap();

    assert!(!env.contains_key("uploader:9").await);
    assert!(!env.contains_key("uploader:9:tags").await);
    assert!(!env.contains_key("uploader:9:servers").await);
    assert_eq!(env.directory.list_uploaders().await.unwrap(), vec!["10".to_string()]);
}

#[tokio::test]
async fn test_delete_viewer_leaves_other_viewers_alone() {
    let env = TestEnv::new();

    env.directory.add_viewer(1, 3).await.unwrap();
    env.directory.add_viewer(11, 3).await.unwrap();
    env.put_list("viewer:11:servers", &["s1"]).await;

    env.directory.delete_viewer(1).await.unwrap();

    assert!(env.contains_key("viewer:11").await);
    assert_eq!(env.list("viewer:11:servers").await, TestUtils::strings(&["s1"]));
}

#[tokio::test]
async fn test_point_reads_reject_negative_ids() {
    let env = TestEnv::new();

    assert_eq!(
        env.directory.viewer(-1).await.unwrap_err().kind(),
        ErrorKind::Validation
    );
    assert_eq!(
        env.directory.uploader(-1).await.unwrap_err().kind(),
        ErrorKind::Validation
    );
}
