// Configuration source loading.
//
// Priority order:
// 1. Environment variables (LOGSIFT_* prefix)
// 2. Config file path from LOGSIFT_CONFIG
// 3. Default config files (./logsift.toml, ./.logsift.toml)
// 4. Built-in defaults

use crate::RuntimeConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

const ENV_PREFIX: &str = "LOGSIFT_";

const DEFAULT_FILES: &[&str] = &["./logsift.toml", "./.logsift.toml"];

/// Load configuration with graceful fallback to defaults.
pub fn load_or_default() -> Result<RuntimeConfig> {
    let mut config = match load_from_file()? {
        Some(file_config) => file_config,
        None => RuntimeConfig::default(),
    };

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific file path (for CLI --config flag).
/// Returns an error if the file doesn't exist or can't be parsed.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<RuntimeConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let mut config: RuntimeConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    apply_env_overrides(&mut config)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<RuntimeConfig>> {
    if let Ok(path) = env::var("LOGSIFT_CONFIG") {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: RuntimeConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;
        return Ok(Some(config));
    }

    for path in DEFAULT_FILES {
        if Path::new(path).exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            let config: RuntimeConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {}", path))?;
            return Ok(Some(config));
        }
    }

    Ok(None)
}

fn env_var(key: &str) -> Option<String> {
    env::var(format!("{ENV_PREFIX}{key}"))
        .ok()
        .filter(|value| !value.is_empty())
}

fn apply_env_overrides(config: &mut RuntimeConfig) -> Result<()> {
    if let Some(backend) = env_var("STORAGE_BACKEND") {
        config.storage.backend = backend
            .parse()
            .context("Invalid LOGSIFT_STORAGE_BACKEND value")?;
    }

    if let Some(bucket) = env_var("S3_BUCKET") {
        config.storage.s3.get_or_insert_with(Default::default).bucket = bucket;
    }
    if let Some(region) = env_var("S3_REGION").or_else(|| env::var("AWS_REGION").ok()) {
        config.storage.s3.get_or_insert_with(Default::default).region = region;
    }
    if let Some(endpoint) = env_var("S3_ENDPOINT") {
        config.storage.s3.get_or_insert_with(Default::default).endpoint = Some(endpoint);
    }

    if let Some(path) = env_var("FS_PATH") {
        config.storage.fs.get_or_insert_with(Default::default).path = path;
    }

    if let Some(addr) = env_var("LISTEN_ADDR") {
        config.server.listen_addr = addr;
    }
    if let Some(level) = env_var("LOG_LEVEL") {
        config.server.log_level = level;
    }

    if let Some(bytes) = env_var("MAX_PAYLOAD_BYTES") {
        config.request.max_payload_bytes = bytes
            .parse()
            .context("LOGSIFT_MAX_PAYLOAD_BYTES must be an integer")?;
    }

    Ok(())
}
