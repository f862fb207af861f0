//! Durable storage trait: a minimal string key-value interface.

use async_trait::async_trait;

use crate::error::StorageError;

/// Backend-agnostic durable key-value storage.
///
/// Values are opaque serialized strings; decoding (and deciding what to do
/// with content that does not decode) is the caller's concern.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Insert or replace the value stored under `key`.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Returns whether a value was present.
    async fn delete(&self, key: &str) -> Result<bool, StorageError>;
}
