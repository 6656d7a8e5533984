use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use async_channel::{Sender, TrySendError, bounded};
use async_lock::RwLock;
use async_trait::async_trait;
use futures_util::StreamExt;
use futures_util::stream::BoxStream;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use svcat_object_model::core::Spec;
use svcat_object_model::{ApiObject, ApiObjectList};
use svcat_types::Revision;
use svcat_types::defaults::KEY_SEPARATOR;

use crate::StoreError;

use super::{StorageInterface, UpdateFunc, WatchEvent};

struct MemoryState<S: Spec> {
    revision: Revision,
    objects: BTreeMap<String, ApiObject<S>>,
}

struct Watcher<S: Spec> {
    key_root: String,
    sender: Sender<WatchEvent<S>>,
}

fn is_under(key: &str, key_root: &str) -> bool {
    match key.strip_prefix(key_root) {
        Some(rest) => rest.is_empty() || rest.starts_with(KEY_SEPARATOR),
        None => false,
    }
}

/// In process storage: an ordered map guarded by a read write lock.
///
/// Every write bumps a single revision counter which is stamped into the
/// `resource_version` of the written object. Watch events are sent while the
/// write lock is held, so each watcher sees changes in revision order.
pub struct MemoryStorage<S: Spec> {
    state: RwLock<MemoryState<S>>,
    watchers: Mutex<Vec<Watcher<S>>>,
    watch_capacity: usize,
    destroyed: AtomicBool,
}

impl<S: Spec> fmt::Debug for MemoryStorage<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("kind", &S::label())
            .field("watchers", &self.watchers.lock().len())
            .field("watch_capacity", &self.watch_capacity)
            .finish()
    }
}

impl<S: Spec> MemoryStorage<S> {
    pub fn new(watch_capacity: usize) -> Self {
        Self {
            state: RwLock::new(MemoryState {
                revision: 0,
                objects: BTreeMap::new(),
            }),
            watchers: Mutex::new(vec![]),
            watch_capacity,
            destroyed: AtomicBool::new(false),
        }
    }

    /// closes every watch stream, later operations fail
    pub fn destroy(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
        let mut watchers = self.watchers.lock();
        for watcher in watchers.drain(..) {
            watcher.sender.close();
        }
        debug!(kind = S::label(), "memory storage destroyed");
    }

    fn check_alive(&self) -> Result<(), StoreError> {
        if self.destroyed.load(Ordering::SeqCst) {
            Err(StoreError::Internal(format!(
                "storage for {} is destroyed",
                S::group_resource()
            )))
        } else {
            Ok(())
        }
    }

    fn notify(&self, key: &str, event: WatchEvent<S>) {
        let mut watchers = self.watchers.lock();
        watchers.retain(|watcher| {
            if !is_under(key, &watcher.key_root) {
                return true;
            }
            match watcher.sender.try_send(event.clone()) {
                Ok(()) => true,
                Err(TrySendError::Full(_)) => {
                    warn!(key_root = %watcher.key_root, "watcher is too slow, closing");
                    watcher.sender.close();
                    false
                }
                Err(TrySendError::Closed(_)) => {
                    trace!(key_root = %watcher.key_root, "watcher gone");
                    false
                }
            }
        });
    }
}

#[async_trait]
impl<S: Spec> StorageInterface<S> for MemoryStorage<S> {
    async fn get(&self, key: &str) -> Result<Option<ApiObject<S>>, StoreError> {
        self.check_alive()?;
        let state = self.state.read().await;
        Ok(state.objects.get(key).cloned())
    }

    async fn create(&self, key: &str, mut obj: ApiObject<S>) -> Result<ApiObject<S>, StoreError> {
        self.check_alive()?;
        let mut state = self.state.write().await;
        if state.objects.contains_key(key) {
            return Err(StoreError::AlreadyExists {
                resource: S::group_resource(),
                name: obj.metadata.name,
            });
        }
        state.revision += 1;
        obj.metadata.resource_version = state.revision.to_string();
        state.objects.insert(key.to_owned(), obj.clone());
        debug!(key, revision = state.revision, "created");
        self.notify(key, WatchEvent::Added(obj.clone()));
        Ok(obj)
    }

    async fn guaranteed_update<'a>(
        &self,
        key: &str,
        update: UpdateFunc<'a, S>,
    ) -> Result<ApiObject<S>, StoreError> {
        self.check_alive()?;
        let mut state = self.state.write().await;
        let existing = state.objects.get(key).cloned();
        let mut obj = update(existing.clone())?;

        let event = match existing {
            Some(existing) => {
                obj.metadata.resource_version = existing.metadata.resource_version.clone();
                if obj == existing {
                    trace!(key, "no change");
                    return Ok(existing);
                }
                state.revision += 1;
                obj.metadata.resource_version = state.revision.to_string();
                WatchEvent::Modified(obj.clone())
            }
            None => {
                state.revision += 1;
                obj.metadata.resource_version = state.revision.to_string();
                WatchEvent::Added(obj.clone())
            }
        };
        state.objects.insert(key.to_owned(), obj.clone());
        debug!(key, revision = state.revision, "updated");
        self.notify(key, event);
        Ok(obj)
    }

    async fn delete(&self, key: &str) -> Result<Option<ApiObject<S>>, StoreError> {
        self.check_alive()?;
        let mut state = self.state.write().await;
        let Some(obj) = state.objects.remove(key) else {
            return Ok(None);
        };
        state.revision += 1;
        debug!(key, revision = state.revision, "deleted");
        self.notify(key, WatchEvent::Deleted(obj.clone()));
        Ok(Some(obj))
    }

    async fn list(&self, key_root: &str) -> Result<ApiObjectList<S>, StoreError> {
        self.check_alive()?;
        let state = self.state.read().await;
        let items = state
            .objects
            .range(key_root.to_owned()..)
            .take_while(|(key, _)| key.starts_with(key_root))
            .filter(|(key, _)| is_under(key, key_root))
            .map(|(_, obj)| obj.clone())
            .collect();
        Ok(ApiObjectList::new(items, state.revision.to_string()))
    }

    async fn watch(
        &self,
        key_root: &str,
    ) -> Result<BoxStream<'static, WatchEvent<S>>, StoreError> {
        self.check_alive()?;
        let (sender, receiver) = bounded(self.watch_capacity);
        self.watchers.lock().push(Watcher {
            key_root: key_root.to_owned(),
            sender,
        });
        debug!(key_root, "watch started");
        Ok(receiver.boxed())
    }

    async fn current_revision(&self) -> Revision {
        self.state.read().await.revision
    }
}
