//! REST API for the notary ledger
//!
//! Exposes transaction notarization plus the read-only diagnostic endpoints
//! (chain state, validation, lookups) the loan platform's admin views use.

use axum::{
    extract::{Path, Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::blockchain::{Block, ChainStats, Ledger};
use crate::crypto::is_hex_digest;
use crate::error::ChainError;
use crate::transaction::{AccountId, Transaction};

/// Shared service state. The ledger sits behind a single lock and `submit`
/// holds the write guard for the whole validate, hash, mine, append sequence.
#[derive(Clone)]
pub struct Node {
    pub ledger: Arc<RwLock<Ledger>>,
    api_stats: Arc<RwLock<ApiStats>>,
}

/// API statistics and monitoring
#[derive(Debug, Default)]
struct ApiStats {
    total_requests: u64,
    successful_requests: u64,
    failed_requests: u64,
    transactions_submitted: u64,
    transactions_rejected: u64,
    start_time: Option<Instant>,
}

impl ApiStats {
    fn new() -> Self {
        ApiStats {
            start_time: Some(Instant::now()),
            ..Default::default()
        }
    }

    fn record_request(&mut self, success: bool) {
        self.total_requests += 1;
        if success {
            self.successful_requests += 1;
        } else {
            self.failed_requests += 1;
        }
    }
}

impl Node {
    pub fn new(ledger: Ledger) -> Self {
        Self::new_shared(Arc::new(RwLock::new(ledger)))
    }

    /// Serve a ledger that other parts of the process also hold.
    pub fn new_shared(ledger: Arc<RwLock<Ledger>>) -> Self {
        Self {
            ledger,
            api_stats: Arc::new(RwLock::new(ApiStats::new())),
        }
    }

    /// Notarize a transaction, returning its digest and the sealing block.
    ///
    /// Mining runs on the blocking pool with the owned write guard moved into
    /// it, so async workers stay free while readers wait on the lock.
    pub async fn submit(&self, tx: Transaction) -> Result<SubmitResponse, ApiError> {
        let mut ledger = Arc::clone(&self.ledger).write_owned().await;
        let result = tokio::task::spawn_blocking(move || {
            ledger
                .submit(tx)
                .map(|hash| SubmitResponse { hash, block: ledger.height() })
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Mining task failed: {}", e)))?;

        let mut stats = self.api_stats.write().await;
        match &result {
            Ok(_) => stats.transactions_submitted += 1,
            Err(_) => stats.transactions_rejected += 1,
        }

        result.map_err(ApiError::from)
    }

    pub async fn get_stats(&self) -> ApiStatsResponse {
        let stats = self.api_stats.read().await;
        let uptime = stats.start_time.map(|t| t.elapsed().as_secs()).unwrap_or(0);

        ApiStatsResponse {
            total_requests: stats.total_requests,
            successful_requests: stats.successful_requests,
            failed_requests: stats.failed_requests,
            transactions_submitted: stats.transactions_submitted,
            transactions_rejected: stats.transactions_rejected,
            uptime_seconds: uptime,
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    LedgerError(ChainError),
    InvalidInput(String),
    NotFound(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::LedgerError(e @ ChainError::InvalidTransaction(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ApiError::LedgerError(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::LedgerError(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Transaction as posted by clients. The timestamp is part of the digest, so
/// the server never fills it in: `/hash` and `/transaction` must see the same
/// value for their digests to agree.
#[derive(Debug, Deserialize)]
pub struct TransactionRequest {
    pub from: Option<AccountId>,
    pub to: Option<AccountId>,
    pub amount: f64,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl TryFrom<TransactionRequest> for Transaction {
    type Error = ApiError;

    fn try_from(req: TransactionRequest) -> Result<Self, Self::Error> {
        let timestamp = req.timestamp.ok_or_else(|| {
            ApiError::InvalidInput("Transaction timestamp is required".to_string())
        })?;

        Ok(Transaction {
            from: req.from,
            to: req.to,
            amount: req.amount,
            timestamp,
            data: req.data,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub hash: String,
    pub block: u64,
}

#[derive(Serialize)]
struct HashResponse {
    hash: String,
}

#[derive(Serialize)]
struct ValidateResponse {
    valid: bool,
}

#[derive(Serialize)]
struct TransactionLookupResponse {
    block: u64,
    transaction: Transaction,
}

#[derive(Serialize)]
pub struct ApiStatsResponse {
    pub total_requests: u64,
    pub successful_requests: u64,
    pub failed_requests: u64,
    pub transactions_submitted: u64,
    pub transactions_rejected: u64,
    pub uptime_seconds: u64,
}

// ============================================================================
// Middleware
// ============================================================================

async fn stats_middleware(State(node): State<Arc<Node>>, req: Request, next: Next) -> Response {
    let response = next.run(req).await;

    let success = response.status().is_success();
    node.api_stats.write().await.record_request(success);

    response
}

async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints
pub fn build_api_router(node: Arc<Node>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![http::Method::GET, http::Method::POST, http::Method::OPTIONS])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .allow_credentials(true);

    let api_routes = Router::new()
        // Ledger endpoints
        .route("/blockchain/state", get(get_blockchain_state))
        .route("/blockchain/validate", get(validate_blockchain))
        .route("/blockchain/height", get(get_blockchain_height))
        .route("/blockchain/stats", get(get_blockchain_stats))
        .route("/blockchain/block/:index", get(get_block_by_index))
        // Transaction endpoints
        .route("/transaction", post(submit_transaction))
        .route("/transaction/:hash", get(get_transaction))
        .route("/hash", post(hash_transaction))
        // System endpoints
        .route("/health", get(health_check))
        .route("/stats", get(get_api_stats))
        // logging before stats so we always record timing
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(node.clone(), stats_middleware))
        .with_state(node);

    Router::new().nest("/api", api_routes).layer(cors)
}

/// Bind `addr` and serve the API until the process stops.
pub async fn run_api_server(node: Arc<Node>, addr: SocketAddr) -> Result<(), ChainError> {
    let app = build_api_router(node);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(%addr, "api.listening");

    axum::serve(listener, app).await?;
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn get_blockchain_state(State(node): State<Arc<Node>>) -> Json<Vec<Block>> {
    Json(node.ledger.read().await.get_blockchain_state())
}

async fn validate_blockchain(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let valid = node.ledger.read().await.validate_chain();
    Json(ValidateResponse { valid })
}

async fn get_blockchain_height(State(node): State<Arc<Node>>) -> impl IntoResponse {
    Json(node.ledger.read().await.len() as u64)
}

async fn get_blockchain_stats(State(node): State<Arc<Node>>) -> Json<ChainStats> {
    Json(node.ledger.read().await.stats())
}

async fn get_block_by_index(
    State(node): State<Arc<Node>>,
    Path(index): Path<u64>,
) -> Result<Json<Block>, ApiError> {
    node.ledger
        .read()
        .await
        .block(index)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Block {} not found", index)))
}

async fn submit_transaction(
    State(node): State<Arc<Node>>,
    Json(req): Json<TransactionRequest>,
) -> Result<Json<SubmitResponse>, ApiError> {
    node.submit(Transaction::try_from(req)?).await.map(Json)
}

async fn hash_transaction(
    Json(req): Json<TransactionRequest>,
) -> Result<Json<HashResponse>, ApiError> {
    let hash = crate::transaction::hash_transaction(&Transaction::try_from(req)?)?;
    Ok(Json(HashResponse { hash }))
}

async fn get_transaction(
    State(node): State<Arc<Node>>,
    Path(hash): Path<String>,
) -> Result<Json<TransactionLookupResponse>, ApiError> {
    if !is_hex_digest(&hash) {
        return Err(ApiError::InvalidInput(
            "Hash must be a 64-character hex string".to_string(),
        ));
    }

    let record = node
        .ledger
        .read()
        .await
        .find_transaction(&hash.to_ascii_lowercase())
        .ok_or_else(|| ApiError::NotFound(format!("Transaction {} not found", hash)))?;

    Ok(Json(TransactionLookupResponse {
        block: record.block_index,
        transaction: record.transaction,
    }))
}

async fn get_api_stats(State(node): State<Arc<Node>>) -> impl IntoResponse {
    Json(node.get_stats().await)
}
