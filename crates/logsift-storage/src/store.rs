//! Blob-store construction and access

use logsift_config::{RuntimeConfig, StorageBackend};

use crate::error::StoreError;

/// Thin wrapper over an OpenDAL operator exposing the list/get/put calls the
/// aggregation pipeline needs.
#[derive(Debug, Clone)]
pub struct BlobStore {
    op: opendal::Operator,
}

impl BlobStore {
    /// Wrap an existing operator (used by tests with the memory service).
    pub fn new(op: opendal::Operator) -> Self {
        Self { op }
    }

    /// Build a store from the configured backend.
    pub fn from_config(config: &RuntimeConfig) -> Result<Self, StoreError> {
        let op = match config.storage.backend {
            StorageBackend::Fs => {
                let fs = config
                    .storage
                    .fs
                    .as_ref()
                    .ok_or_else(|| StoreError::config("fs config required for filesystem backend"))?;

                let fs_builder = opendal::services::Fs::default().root(&fs.path);
                opendal::Operator::new(fs_builder)?.finish()
            }
            StorageBackend::S3 => {
                let s3 = config
                    .storage
                    .s3
                    .as_ref()
                    .ok_or_else(|| StoreError::config("s3 config required for S3 backend"))?;

                let mut s3_builder = opendal::services::S3::default()
                    .bucket(&s3.bucket)
                    .region(&s3.region);

                if let Some(endpoint) = &s3.endpoint {
                    s3_builder = s3_builder.endpoint(endpoint);
                }

                opendal::Operator::new(s3_builder)?.finish()
            }
            StorageBackend::Memory => {
                opendal::Operator::new(opendal::services::Memory::default())?.finish()
            }
        };

        Ok(Self { op })
    }

    /// Borrow the underlying operator.
    pub fn operator(&self) -> &opendal::Operator {
        &self.op
    }

    /// List every object key under `prefix`, recursively. Directory entries
    /// are filtered out; only object keys are returned. A prefix that does
    /// not exist yet lists as empty.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let entries = match self.op.list_with(prefix).recursive(true).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == opendal::ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(entries
            .into_iter()
            .filter(|entry| !entry.path().ends_with('/'))
            .map(|entry| entry.path().to_string())
            .collect())
    }

    /// Fetch one object and decode it as UTF-8 text.
    pub async fn get(&self, key: &str) -> Result<String, StoreError> {
        let buffer = self.op.read(key).await?;
        String::from_utf8(buffer.to_vec()).map_err(|_| StoreError::NotText {
            key: key.to_string(),
        })
    }

    /// Write one text object, replacing any previous contents.
    pub async fn put(&self, key: &str, contents: String) -> Result<(), StoreError> {
        self.op.write(key, contents.into_bytes()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use logsift_config::{FsConfig, S3Config, StorageConfig};

    fn memory_store() -> BlobStore {
        let op = opendal::Operator::new(opendal::services::Memory::default())
            .unwrap()
            .finish();
        BlobStore::new(op)
    }

    #[tokio::test]
    async fn put_get_round_trip() {
        let store = memory_store();
        store
            .put("prefix/key.log", "2 - invalid token".to_string())
            .await
            .unwrap();
        assert_eq!(
            store.get("prefix/key.log").await.unwrap(),
            "2 - invalid token"
        );
    }

    #[tokio::test]
    async fn list_returns_only_objects_under_prefix() {
        let store = memory_store();
        store.put("a/b/one.log", "1 - x".to_string()).await.unwrap();
        store.put("a/b/two.log", "1 - y".to_string()).await.unwrap();
        store.put("other/three.log", "1 - z".to_string()).await.unwrap();

        let mut keys = store.list("a/").await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a/b/one.log", "a/b/two.log"]);
    }

    #[tokio::test]
    async fn missing_object_is_a_store_error() {
        let store = memory_store();
        assert!(matches!(
            store.get("absent.log").await,
            Err(StoreError::Backend(_))
        ));
    }

    #[test]
    fn from_config_requires_backend_section() {
        let mut config = logsift_config::RuntimeConfig::default();
        config.storage = StorageConfig {
            backend: logsift_config::StorageBackend::S3,
            fs: None,
            s3: None,
        };
        assert!(matches!(
            BlobStore::from_config(&config),
            Err(StoreError::Config { .. })
        ));

        config.storage = StorageConfig {
            backend: logsift_config::StorageBackend::S3,
            fs: None,
            s3: Some(S3Config {
                bucket: "logs".to_string(),
                region: "us-east-1".to_string(),
                endpoint: None,
            }),
        };
        assert!(BlobStore::from_config(&config).is_ok());

        config.storage = StorageConfig {
            backend: logsift_config::StorageBackend::Fs,
            fs: Some(FsConfig {
                path: "/tmp".to_string(),
            }),
            s3: None,
        };
        assert!(BlobStore::from_config(&config).is_ok());
    }
}
