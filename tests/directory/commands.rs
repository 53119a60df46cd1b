use std::sync::Arc;

use bytes::BytesMut;
use session_directory::{
    connection::handle_client_connection, directory::Directory, input::read_and_parse_resp,
    resp::RespValue, store::MemoryStore,
};
use tokio::io::AsyncWriteExt;

use crate::test_utils::{TestEnv, TestUtils, TEST_STORE_TIMEOUT};

#[tokio::test]
async fn test_ping() {
    let env = TestEnv::new();

    assert_eq!(env.exec(&["PING"]).await, "+PONG\r\n");
    assert_eq!(
        env.exec(&["PING", "extra"]).await,
        "-ERR wrong number of arguments for 'PING' command\r\n"
    );
}

#[tokio::test]
async fn test_viewer_lifecycle() {
    let env = TestEnv::new();

    env.exec_ok(&["VIEWER", "ADD", "7", "3"]).await;
    env.exec_ok(&["VIEWER_SERVERS", "UPDATE", "7", "2", "a", "b"]).await;

    let response = env.exec(&["viewer", "get", "7"]).await;
    assert!(response.starts_with("*6\r\n$11\r\nid_uploader\r\n$1\r\n3\r\n$12\r\ndate_started\r\n"));
    assert!(response.ends_with("$7\r\nservers\r\n*2\r\n$1\r\nb\r\n$1\r\na\r\n"));

    env.exec_ok(&["VIEWER", "DEL", "7"]).await;
    env.exec_ok(&["VIEWER", "DEL", "7"]).await;

    assert_eq!(env.exec(&["VIEWER", "GET", "7"]).await, "$-1\r\n");
    assert!(env.keys().await.iter().all(|key| !key.starts_with("viewer:")));
}

#[tokio::test]
async fn test_uploader_lifecycle() {
    let env = TestEnv::new();

    env.exec_ok(&["UPLOADER", "ADD", "4", "Morning show", "news", "live"])
        .await;
    env.exec_ok(&["UPLOADER_SERVERS", "UPDATE", "4", "1", "s1"]).await;

    assert_eq!(
        env.exec(&["UPLOADERS", "LIST"]).await,
        "*1\r\n$1\r\n4\r\n"
    );
    assert_eq!(
        env.exec(&["UPLOADER_SERVERS", "GET"]).await,
        "*2\r\n$1\r\n4\r\n*1\r\n$2\r\ns1\r\n"
    );

    let response = env.exec(&["UPLOADER", "GET", "4"]).await;
    assert!(response.starts_with("*8\r\n$5\r\ntitle\r\n$12\r\nMorning show\r\n"));
    assert!(response.ends_with(
        "$4\r\ntags\r\n*2\r\n$4\r\nnews\r\n$4\r\nlive\r\n$7\r\nservers\r\n*1\r\n$2\r\ns1\r\n"
    ));

    let publish_times = env.exec(&["PUBLISHTIME", "GET"]).await;
    assert!(publish_times.starts_with("*2\r\n$1\r\n4\r\n"));

    env.exec_ok(&["UPLOADER", "DEL", "4"]).await;
    assert_eq!(env.exec(&["UPLOADERS", "LIST"]).await, "*0\r\n");
    assert!(env.keys().await.is_empty());
}

#[tokio::test]
async fn test_statistics() {
    let env = TestEnv::new();

    env.exec_ok(&["VIEWER", "ADD", "1", "10"]).await;
    env.exec_ok(&["VIEWER", "ADD", "2", "10"]).await;
    env.exec_ok(&["VIEWER", "ADD", "3", "20"]).await;
    env.exec_ok(&["VIEWER_SERVERS", "UPDATE", "1", "2", "s1", "s2", "2", "1", "s1"])
        .await;
    env.exec_ok(&["SERVERS", "LOAD", "s1", "2500"]).await;

    let test_cases = vec![
        (
            vec!["VIEWERS", "STATS"],
            "*4\r\n$2\r\n10\r\n:2\r\n$2\r\n20\r\n:1\r\n",
        ),
        (
            vec!["VIEWERS", "LIST"],
            "*4\r\n$2\r\n10\r\n*2\r\n$1\r\n1\r\n$1\r\n2\r\n$2\r\n20\r\n*1\r\n$1\r\n3\r\n",
        ),
        (
            vec!["SERVERS", "STATS"],
            "*4\r\n$2\r\ns1\r\n:2\r\n$2\r\ns2\r\n:1\r\n",
        ),
        (
            vec!["SERVERS", "BITRATES"],
            "*2\r\n$2\r\ns1\r\n$4\r\n2500\r\n",
        ),
        (
            vec!["VIEWERS", "GETSERVERS"],
            "*2\r\n*4\r\n$1\r\n1\r\n*2\r\n$2\r\ns2\r\n$2\r\ns1\r\n$1\r\n2\r\n*1\r\n$2\r\ns1\r\n*2\r\n$2\r\ns1\r\n$4\r\n2500\r\n",
        ),
    ];

    for (request, expected) in test_cases {
        assert_eq!(env.exec(&request).await, expected, "request {:?}", request);
    }
}

#[tokio::test]
async fn test_modification_check() {
    let env = TestEnv::new();

    assert_eq!(env.exec(&["MODIF", "VERIF"]).await, "$2\r\nno\r\n");

    env.exec_ok(&["VIEWER", "ADD", "1", "10"]).await;

    assert_eq!(env.exec(&["MODIF", "VERIF"]).await, "$3\r\nyes\r\n");
    assert_eq!(env.exec(&["MODIF", "VERIF"]).await, "$2\r\nno\r\n");
}

#[tokio::test]
async fn test_invalid_requests() {
    let env = TestEnv::new();

    let test_cases = vec![
        (
            vec!["VIEWER", "ADD", "-1", "3"],
            "-VALIDATION id_viewer must not be negative, got -1\r\n",
        ),
        (
            vec!["VIEWER", "ADD", "one", "3"],
            "-VALIDATION id_viewer must be an integer, got 'one'\r\n",
        ),
        (
            vec!["VIEWER", "ADD", "1"],
            "-ERR wrong number of arguments for 'VIEWER ADD' command\r\n",
        ),
        (
            vec!["UPLOADER", "ADD", "4", ""],
            "-VALIDATION title must not be empty\r\n",
        ),
        (
            vec!["VIEWER_SERVERS", "UPDATE"],
            "-VALIDATION assignments must be present\r\n",
        ),
        (
            vec!["UPLOADER_SERVERS", "UPDATE", "4", "3", "s1"],
            "-VALIDATION expected 3 servers for '4', got 1\r\n",
        ),
        (
            vec!["SERVERS", "LOAD", "", "100"],
            "-VALIDATION server address must not be empty\r\n",
        ),
        (vec!["VIEWERS", "PURGE"], "-ERR unknown command 'VIEWERS PURGE'\r\n"),
        (vec!["FLUSHALL"], "-ERR unknown command 'FLUSHALL'\r\n"),
    ];

    for (request, expected) in test_cases {
        assert_eq!(env.exec(&request).await, expected, "request {:?}", request);
    }

    assert!(env.keys().await.is_empty());
}

#[tokio::test]
async fn test_connection_serves_pipelined_requests() {
    let directory = Directory::open(Arc::new(MemoryStore::new()), TEST_STORE_TIMEOUT);
    let (mut client, server) = tokio::io::duplex(4096);

    let connection = tokio::spawn(handle_client_connection(
        server,
        "127.0.0.1:50000".to_string(),
        directory,
    ));

    let mut requests = String::new();
    for words in [
        vec!["VIEWER", "ADD", "1", "2"],
        vec!["MODIF", "VERIF"],
        vec!["VIEWER", "ADD", "-1", "2"],
        vec!["PING"],
    ] {
        requests.push_str(&TestUtils::request(&words).encode());
    }

    client.write_all(requests.as_bytes()).await.unwrap();

    let mut buffer = BytesMut::new();
    let mut responses = Vec::new();
    while responses.len() < 4 {
        responses.extend(read_and_parse_resp(&mut client, &mut buffer).await.unwrap());
    }

    assert_eq!(
        responses,
        vec![
            RespValue::ok(),
            RespValue::BulkString("yes".to_string()),
            RespValue::Error("VALIDATION id_viewer must not be negative, got -1".to_string()),
            RespValue::SimpleString("PONG".to_string()),
        ]
    );

    drop(client);
    connection.await.unwrap();
}

#[tokio::test]
async fn test_connection_reports_protocol_errors() {
    let directory = Directory::open(Arc::new(MemoryStore::new()), TEST_STORE_TIMEOUT);
    let (mut client, server) = tokio::io::duplex(4096);

    let connection = tokio::spawn(handle_client_connection(
        server,
        "127.0.0.1:50001".to_string(),
        directory,
    ));

    client.write_all(b"?garbage\r\n").await.unwrap();

    let mut buffer = BytesMut::new();
    let responses = read_and_parse_resp(&mut client, &mut buffer).await.unwrap();

    assert_eq!(
        responses,
        vec![RespValue::Error(
            "ERR Protocol error: unknown RESP type".to_string()
        )]
    );

    client
        .write_all(TestUtils::request(&["PING"]).encode().as_bytes())
        .await
        .unwrap();

    assert_eq!(
        read_and_parse_resp(&mut client, &mut buffer).await.unwrap(),
        vec![RespValue::SimpleString("PONG".to_string())]
    );

    drop(client);
    connection.await.unwrap();
}

#[tokio::test]
async fn test_connection_rejects_oversized_frames() {
    let directory = Directory::open(Arc::new(MemoryStore::new()), TEST_STORE_TIMEOUT);
    let (mut client, server) = tokio::io::duplex(4096);

    let connection = tokio::spawn(handle_client_connection(
        server,
        "127.0.0.1:50002".to_string(),
        directory,
    ));

    client.write_all(b"*9223372036854775807\r\n").await.unwrap();

    let mut buffer = BytesMut::new();
    assert_eq!(
        read_and_parse_resp(&mut client, &mut buffer).await.unwrap(),
        vec![RespValue::Error("ERR Protocol error: invalid array".to_string())]
    );

    client
        .write_all(TestUtils::request(&["PING"]).encode().as_bytes())
        .await
        .unwrap();

    assert_eq!(
        read_and_parse_resp(&mut client, &mut buffer).await.unwrap(),
        vec![RespValue::SimpleString("PONG".to_string())]
    );

    drop(client);
    connection.await.unwrap();
}
