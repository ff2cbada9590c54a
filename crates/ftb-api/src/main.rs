//! `ftb-api` binary entrypoint.
//!
//! Loads configuration from environment variables and starts the HTTP server.

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

use std::sync::Arc;

use anyhow::{Context, Result};

use ftb_api::config::Config;
use ftb_api::server::Server;
use ftb_core::observability::{LogFormat, init_logging};
use ftb_core::{DocumentStore, MemoryDocumentStore};

fn choose_log_format(config: &Config) -> LogFormat {
    if config.debug {
        LogFormat::Pretty
    } else {
        LogFormat::Json
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    init_logging(choose_log_format(&config));

    let store: Arc<dyn DocumentStore> = if let Some(path) = config.seed_path.as_deref() {
        tracing::info!(path = %path.display(), "Seeding in-memory document store");
        Arc::new(
            MemoryDocumentStore::load(path)
                .with_context(|| format!("load seed file {}", path.display()))?,
        )
    } else {
        tracing::warn!("FTB_SEED_PATH not set; serving an empty in-memory store");
        Arc::new(MemoryDocumentStore::new())
    };

    let server = Server::with_store(config, store);
    server.serve().await?;
    Ok(())
}
