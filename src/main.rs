use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use session_directory::{
    config::ServerConfig, connection::handle_client_connection, directory::Directory,
    store::MemoryStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = ServerConfig::new(std::env::args()).context("invalid command line")?;

    let directory = Directory::open(Arc::new(MemoryStore::new()), config.store_timeout)
        .with_scan_count(config.scan_count);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_address()))?;

    tracing::info!(
        address = %config.bind_address(),
        store_timeout_ms = config.store_timeout.as_millis() as u64,
        scan_count = config.scan_count,
        "session directory listening"
    );

    loop {
        match listener.accept().await {
            Ok((stream, address)) => {
                let directory = directory.clone();

                tokio::spawn(async move {
                    handle_client_connection(stream, address.to_string(), directory).await;
                });
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to accept connection");
            }
        }
    }
}
