//!
//! # Storage
//!
//! Key addressed persistence consumed by [`Store`](crate::store::Store).
//!
mod memory;

pub use memory::MemoryStorage;

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::BoxStream;
use serde::{Deserialize, Serialize};
use tracing::debug;

use svcat_object_model::core::Spec;
use svcat_object_model::{ApiObject, ApiObjectList};
use svcat_types::Revision;
use svcat_types::defaults::DEFAULT_WATCH_CACHE_CAPACITY;

use crate::StoreError;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageBackend {
    #[default]
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// events buffered per watcher before it is dropped
    pub watch_capacity: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            watch_capacity: DEFAULT_WATCH_CACHE_CAPACITY,
        }
    }
}

/// releases the resources held by a storage backend
pub type DestroyFunc = Arc<dyn Fn() + Send + Sync>;

/// computes the object to persist from the currently stored one
pub type UpdateFunc<'a, S> =
    Box<dyn FnOnce(Option<ApiObject<S>>) -> Result<ApiObject<S>, StoreError> + Send + 'a>;

#[derive(Debug, Clone, PartialEq)]
pub enum WatchEvent<S: Spec> {
    Added(ApiObject<S>),
    Modified(ApiObject<S>),
    Deleted(ApiObject<S>),
}

impl<S: Spec> WatchEvent<S> {
    pub fn object(&self) -> &ApiObject<S> {
        match self {
            Self::Added(obj) | Self::Modified(obj) | Self::Deleted(obj) => obj,
        }
    }
}

#[async_trait]
pub trait StorageInterface<S: Spec>: Debug + Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<ApiObject<S>>, StoreError>;

    /// fails with `AlreadyExists` if the key is taken
    async fn create(&self, key: &str, obj: ApiObject<S>) -> Result<ApiObject<S>, StoreError>;

    /// applies `update` to the object at `key` without interleaving other writes to it
    async fn guaranteed_update<'a>(
        &self,
        key: &str,
        update: UpdateFunc<'a, S>,
    ) -> Result<ApiObject<S>, StoreError>;

    async fn delete(&self, key: &str) -> Result<Option<ApiObject<S>>, StoreError>;

    /// objects stored under `key_root`
    async fn list(&self, key_root: &str) -> Result<ApiObjectList<S>, StoreError>;

    /// changes under `key_root` from now on
    async fn watch(&self, key_root: &str)
    -> Result<BoxStream<'static, WatchEvent<S>>, StoreError>;

    async fn current_revision(&self) -> Revision;
}

/// Builds the storage backend of one resource type
pub trait StorageDecorator: Debug + Send + Sync {
    #[allow(clippy::type_complexity)]
    fn decorate<S: Spec>(
        &self,
        config: &StorageConfig,
        resource_prefix: &str,
    ) -> Result<(Arc<dyn StorageInterface<S>>, DestroyFunc), StoreError>;
}

/// Plain storage with no caching layer in front of it
#[derive(Debug, Default, Clone, Copy)]
pub struct UndecoratedStorage;

impl StorageDecorator for UndecoratedStorage {
    fn decorate<S: Spec>(
        &self,
        config: &StorageConfig,
        resource_prefix: &str,
    ) -> Result<(Arc<dyn StorageInterface<S>>, DestroyFunc), StoreError> {
        if config.watch_capacity == 0 {
            return Err(StoreError::BadRequest(
                "watch capacity must be greater than 0".to_owned(),
            ));
        }
        debug!(
            resource_prefix,
            backend = ?config.backend,
            kind = S::label(),
            "creating storage"
        );
        let storage = Arc::new(MemoryStorage::<S>::new(config.watch_capacity));
        let destroy_storage = storage.clone();
        let destroy: DestroyFunc = Arc::new(move || destroy_storage.destroy());
        Ok((storage, destroy))
    }
}
