#![forbid(unsafe_code)]
//! HTTP notary service: one in-memory ledger per process, served over the REST API

use std::net::SocketAddr;
use std::sync::Arc;
use microloan_ledger::api::{run_api_server, Node};
use microloan_ledger::blockchain::Ledger;
use microloan_ledger::cli::init_tracing;
use microloan_ledger::config::load_config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = load_config()?;
    let ledger = Ledger::with_difficulty(config.ledger.difficulty)?;
    info!(
        difficulty = ledger.difficulty(),
        genesis = %ledger.latest_block().timestamp.to_rfc3339(),
        "Starting notary ledger"
    );

    let addr: SocketAddr = format!("{}:{}", config.api.host, config.api.port)
        .parse()
        .map_err(|e| format!("Invalid listen address {}:{}: {}", config.api.host, config.api.port, e))?;

    let node = Arc::new(Node::new(ledger));
    run_api_server(node, addr).await?;

    Ok(())
}
