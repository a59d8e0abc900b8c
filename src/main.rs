//! Service entry point

use anyhow::Result;
use std::sync::Arc;

use orderfile::config::ServerConfig;
use orderfile::storage::InMemoryOrderStore;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let config = ServerConfig::load()?;
    let store = Arc::new(InMemoryOrderStore::new());

    orderfile::server::serve(&config, store).await
}
