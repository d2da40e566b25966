//! Serving binary for the quote engine.
//!
//! Loads the published rate sheet, wires the orchestrator and serves
//! the gRPC quote service.
//!
//! Usage: quote server [path-to-rates.tsv]
//! The bind address comes from QUOTES_ADDR (default 127.0.0.1:50061).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tonic::transport::Server;
use tracing::info;

use server::service::proto::quote_service_server::QuoteServiceServer;
use server::{InMemoryRowStore, QuoteGrpcService, QuoteOrchestrator, RowStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,matcher=debug")),
        )
        .init();

    let data_path: PathBuf = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "data/rates.tsv".to_string())
        .into();
    let addr = std::env::var("QUOTES_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:50061".to_string())
        .parse()
        .context("QUOTES_ADDR must be host:port")?;

    info!("Loading rate sheet from {}", data_path.display());
    let store = Arc::new(InMemoryRowStore::load(&data_path)?);
    let snapshot = store.snapshot()?;
    info!(
        "Serving {} rows from {} insurers",
        snapshot.len(),
        snapshot.projections().companies.len()
    );

    let orchestrator = Arc::new(QuoteOrchestrator::new(store));
    let service = QuoteGrpcService::new(orchestrator);

    info!("Quote service listening on {}", addr);
    Server::builder()
        .add_service(QuoteServiceServer::new(service))
        .serve(addr)
        .await?;

    Ok(())
}
