//! Integration tests for request pacing across tool calls.

mod common;

use common::MockPostgrest;
use postgrest_mcp_server::tools::query::{QueryInput, QueryToolHandler};
use postgrest_mcp_server::tools::rpc::{RpcInput, RpcToolHandler};
use postgrest_mcp_server::tools::write::{DeleteInput, WriteToolHandler};
use std::time::{Duration, Instant};

const INTERVAL: Duration = Duration::from_millis(100);
/// Allowance for connection setup on the first request.
const SLACK: Duration = Duration::from_millis(10);

/// Test that consecutive calls through different tools are spaced by the interval.
#[tokio::test]
async fn test_consecutive_calls_are_spaced() {
    let server = MockPostgrest::start(200, "[]").await;
    let client = server.client_with_interval(INTERVAL);
    let query = QueryToolHandler::new(client.clone());
    let write = WriteToolHandler::new(client.clone());
    let rpc = RpcToolHandler::new(client);

    query.query(QueryInput::new("users")).await.unwrap();
    write
        .delete(DeleteInput {
            table: "users".to_string(),
            filter: "id=eq.1".to_string(),
        })
        .await
        .unwrap();
    rpc.call(RpcInput {
        function_name: "noop".to_string(),
        params: "{}".to_string(),
    })
    .await
    .unwrap();

    let requests = server.requests();
    assert_eq!(requests.len(), 3);
    for pair in requests.windows(2) {
        let gap = pair[1].received_at - pair[0].received_at;
        assert!(gap >= INTERVAL - SLACK, "gap too small: {:?}", gap);
    }
}

/// Test that concurrent calls are serialized by the shared gate.
#[tokio::test]
async fn test_concurrent_calls_are_spaced() {
    let server = MockPostgrest::start(200, "[]").await;
    let client = server.client_with_interval(INTERVAL);

    let tasks: Vec<_> = (0..3)
        .map(|i| {
            let handler = QueryToolHandler::new(client.clone());
            tokio::spawn(async move { handler.query(QueryInput::new(format!("t{}", i))).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    let mut received: Vec<Instant> = server.requests().iter().map(|r| r.received_at).collect();
    received.sort();
    assert_eq!(received.len(), 3);
    for pair in received.windows(2) {
        assert!(pair[1] - pair[0] >= INTERVAL - SLACK);
    }
}

/// Test that an isolated call is not delayed by the gate.
#[tokio::test]
async fn test_single_call_has_no_added_delay() {
    let server = MockPostgrest::start(200, "[]").await;
    let handler = QueryToolHandler::new(server.client_with_interval(Duration::from_secs(5)));

    let start = Instant::now();
    handler.query(QueryInput::new("users")).await.unwrap();

    assert!(start.elapsed() < Duration::from_secs(1));
}
