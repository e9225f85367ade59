use std::sync::Arc;

/// Abstract interface to the object store holding employee pictures. The
/// application only ever stores final URL/key strings and asks for deletions;
/// uploads happen outside this service. Swappable per environment.
#[async_trait::async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Request deletion of a stored object by its key/URL. Failures are
    /// reported but must not abort the surrounding business operation.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;
}

/// Errors that can occur while talking to the object store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Delete error: {0}")]
    Delete(String),
}

/// Development/test adapter: logs delete requests instead of performing them.
pub struct ConsoleStorage;

#[async_trait::async_trait]
impl ObjectStorage for ConsoleStorage {
    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        tracing::info!(key, "storage delete requested");
        Ok(())
    }
}

/// Build the storage adapter from config.
pub fn from_config(
    config: &crate::app::config::Config,
) -> Result<Arc<dyn ObjectStorage>, StorageError> {
    match config.storage_adapter.as_str() {
        "console" => Ok(Arc::new(ConsoleStorage)),
        other => Err(StorageError::Config(format!(
            "Unknown STORAGE_ADAPTER: {other}"
        ))),
    }
}
