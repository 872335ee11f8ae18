//! Integration tests for the notary REST API
//!
//! These tests drive the router in-process and check the JSON shapes the
//! loan platform's handlers and admin views depend on.

use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;
use microloan_ledger::api::{build_api_router, Node};
use microloan_ledger::blockchain::Ledger;
use microloan_ledger::transaction::Transaction;

fn test_server() -> (TestServer, Arc<Node>) {
    let node = Arc::new(Node::new(Ledger::new()));
    let app = build_api_router(node.clone());
    let server = TestServer::new(app).expect("Failed to create test server");
    (server, node)
}

#[tokio::test]
async fn test_diagnostic_endpoints() {
    let (server, _node) = test_server();

    let response = server.get("/api/health").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].is_string());

    let response = server.get("/api/blockchain/state").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    let blocks = json.as_array().expect("chain is a JSON array");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0]["index"], 0);
    assert_eq!(blocks[0]["previousHash"], "0");
    assert_eq!(blocks[0]["hash"], "0");

    let response = server.get("/api/blockchain/validate").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["valid"], true);

    let response = server.get("/api/blockchain/height").await;
    assert_eq!(response.status_code(), 200);
    let height: u64 = response.json();
    assert_eq!(height, 1);

    let response = server.get("/api/blockchain/stats").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["total_blocks"], 1);
    assert_eq!(json["difficulty"], 2);

    let response = server.get("/api/blockchain/block/0").await;
    assert_eq!(response.status_code(), 200);

    let response = server.get("/api/blockchain/block/999").await;
    assert_eq!(response.status_code(), 404);
    let json: Value = response.json();
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_submit_and_lookup_transaction() {
    let (server, node) = test_server();

    let tx = json!({
        "from": 7,
        "to": 3,
        "amount": 500,
        "timestamp": "2024-05-17T09:30:00Z",
        "data": {"type": "funding", "loanId": 11}
    });

    let response = server.post("/api/hash").json(&tx).await;
    assert_eq!(response.status_code(), 200);
    let precomputed: Value = response.json();

    let response = server.post("/api/transaction").json(&tx).await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["block"], 1);
    assert_eq!(json["hash"], precomputed["hash"]);

    let hash = json["hash"].as_str().unwrap().to_string();
    let response = server.get(&format!("/api/transaction/{}", hash)).await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["block"], 1);
    assert_eq!(json["transaction"]["data"]["loanId"], 11);

    assert_eq!(node.ledger.read().await.len(), 2);
    assert!(node.ledger.read().await.validate_chain());

    let response = server.get(&format!("/api/transaction/{}", "a".repeat(64))).await;
    assert_eq!(response.status_code(), 404);

    let response = server.get("/api/transaction/not-a-hash").await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_invalid_transaction_rejected() {
    let (server, node) = test_server();

    let response = server
        .post("/api/transaction")
        .json(&json!({"from": null, "to": 5, "amount": 10, "timestamp": "2024-05-17T09:30:00Z"}))
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("Invalid transaction"));

    let response = server
        .post("/api/transaction")
        .json(&json!({"from": 1, "to": 5, "amount": -1, "timestamp": "2024-05-17T09:30:00Z"}))
        .await;
    assert_eq!(response.status_code(), 400);

    let ledger = node.ledger.read().await;
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.pending_len(), 0);
    drop(ledger);

    let response = server.get("/api/stats").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["transactions_rejected"], 2);
    assert_eq!(json["transactions_submitted"], 0);
    assert!(json["failed_requests"].as_u64().unwrap() >= 2);
}

#[tokio::test]
async fn test_transaction_without_timestamp_rejected() {
    let (server, node) = test_server();

    let unstamped = json!({
        "from": 7,
        "to": 3,
        "amount": 500,
        "data": {"type": "funding", "loanId": 11}
    });

    let response = server.post("/api/hash").json(&unstamped).await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert!(json["error"].as_str().unwrap().contains("timestamp"));

    let response = server.post("/api/transaction").json(&unstamped).await;
    assert_eq!(response.status_code(), 400);
    assert_eq!(node.ledger.read().await.len(), 1);

    let mut stamped = unstamped.clone();
    stamped["timestamp"] = json!("2024-05-17T09:30:00Z");

    let precomputed: Value = server.post("/api/hash").json(&stamped).await.json();
    let submitted: Value = server.post("/api/transaction").json(&stamped).await.json();
    assert_eq!(precomputed["hash"], submitted["hash"]);

    let hash = precomputed["hash"].as_str().unwrap();
    let response = server.get(&format!("/api/transaction/{}", hash)).await;
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_concurrent_submissions_each_seal_one_block() {
    let node = Arc::new(Node::new(Ledger::with_difficulty(3).unwrap()));

    let handles: Vec<_> = (1..=4u64)
        .map(|i| {
            let node = node.clone();
            tokio::spawn(async move {
                node.submit(Transaction::new(i, i + 100, 10.0 * i as f64))
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut blocks = Vec::new();
    for handle in handles {
        blocks.push(handle.await.unwrap().block);
    }
    blocks.sort_unstable();
    assert_eq!(blocks, vec![1, 2, 3, 4]);

    let ledger = node.ledger.read().await;
    assert_eq!(ledger.len(), 5);
    assert_eq!(ledger.pending_len(), 0);
    assert!(ledger.validate_chain());
}
