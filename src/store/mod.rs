//! Persistence layer: durable key-value backends and the form store.

pub mod file;
pub mod form_store;
pub mod libsql_backend;
pub mod memory;
pub mod migrations;
pub mod traits;

use std::sync::Arc;

use crate::config::StorageBackend;
use crate::error::StorageError;

pub use file::FileStore;
pub use form_store::FormStore;
pub use libsql_backend::LibSqlStore;
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

/// Open the configured storage backend.
pub async fn open_storage(
    backend: &StorageBackend,
) -> Result<Arc<dyn KeyValueStore>, StorageError> {
    let storage: Arc<dyn KeyValueStore> = match backend {
        StorageBackend::Memory => Arc::new(MemoryStore::new()),
        StorageBackend::File { dir } => Arc::new(FileStore::new(dir.clone()).await?),
        StorageBackend::LibSql { path } => Arc::new(LibSqlStore::new_local(path).await?),
    };
    Ok(storage)
}
