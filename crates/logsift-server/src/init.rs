// Initialization utilities
//
// Storage backend and logging/tracing setup

use std::sync::Arc;

use anyhow::{Context, Result};
use logsift_config::{LogFormat, RuntimeConfig, StorageBackend};
use logsift_storage::BlobStore;
use tracing::info;

/// Initialize the blob store from RuntimeConfig
pub(crate) fn init_store(config: &RuntimeConfig) -> Result<Arc<BlobStore>> {
    match config.storage.backend {
        StorageBackend::Fs => {
            if let Some(fs) = &config.storage.fs {
                info!("Using filesystem storage at: {}", fs.path);
            }
        }
        StorageBackend::S3 => {
            if let Some(s3) = &config.storage.s3 {
                info!(
                    "Using S3 storage: bucket={}, region={}",
                    s3.bucket, s3.region
                );
            }
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage (contents are lost on restart)");
        }
    }

    let store = BlobStore::from_config(config).context("Failed to initialize blob store")?;
    Ok(Arc::new(store))
}

/// Initialize tracing/logging from RuntimeConfig
pub(crate) fn init_tracing(config: &RuntimeConfig) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.server.log_format {
        LogFormat::Json => {
            registry.with(fmt::layer().json()).init();
        }
        LogFormat::Text => {
            registry.with(fmt::layer()).init();
        }
    }
}
