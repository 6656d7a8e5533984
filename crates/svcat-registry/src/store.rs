//!
//! # Store
//!
//! Generic create, get, update, delete, list and watch for one resource type.
//! Runs the strategy hooks of the resource around a single call into its
//! [`StorageInterface`].
//!
use std::fmt;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::future;
use futures_util::stream::BoxStream;
use tracing::{debug, error, instrument, trace};

use svcat_object_model::core::{GroupResource, Object, Spec};
use svcat_object_model::{ApiObject, ApiObjectList, ObjectError};
use svcat_types::StorageKey;

use crate::StoreError;
use crate::context::RequestContext;
use crate::options::ListOptions;
use crate::predicate::{PredicateFunc, SelectionPredicate};
use crate::rest::{RestCreateStrategy, RestDeleteStrategy, RestUpdateStrategy};
use crate::rest::{before_create, before_update};
use crate::storage::{DestroyFunc, StorageInterface, WatchEvent};

pub type KeyRootFunc = Box<dyn Fn(&RequestContext) -> StorageKey + Send + Sync>;

pub type KeyFunc = Box<dyn Fn(&RequestContext, &str) -> Result<StorageKey, StoreError> + Send + Sync>;

pub type ObjectNameFunc = fn(&dyn Object) -> Result<String, ObjectError>;

const MISSING_RESOURCE_VERSION: &str = "metadata.resourceVersion must be specified for an update";
const STALE_RESOURCE_VERSION: &str =
    "the object has been modified; please apply your changes to the latest version and try again";

/// Storage handle of one resource type, assembled by its registry
pub struct Store<S: Spec> {
    pub new_func: fn() -> ApiObject<S>,
    pub new_list_func: fn() -> ApiObjectList<S>,
    pub key_root_func: KeyRootFunc,
    pub key_func: KeyFunc,
    pub object_name_func: ObjectNameFunc,
    pub predicate_func: PredicateFunc,
    /// plural resource name used in errors
    pub qualified_resource: GroupResource,
    pub create_strategy: Arc<dyn RestCreateStrategy>,
    pub update_strategy: Arc<dyn RestUpdateStrategy>,
    pub delete_strategy: Arc<dyn RestDeleteStrategy>,
    pub storage: Arc<dyn StorageInterface<S>>,
    pub destroy_func: Option<DestroyFunc>,
}

impl<S: Spec> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("qualified_resource", &self.qualified_resource)
            .field("create_strategy", &self.create_strategy)
            .field("update_strategy", &self.update_strategy)
            .field("storage", &self.storage)
            .finish()
    }
}

impl<S: Spec> Store<S> {
    fn not_found(&self, name: &str) -> StoreError {
        StoreError::NotFound {
            resource: self.qualified_resource.clone(),
            name: name.to_owned(),
        }
    }

    fn conflict(&self, name: &str, reason: impl Into<String>) -> StoreError {
        StoreError::Conflict {
            resource: self.qualified_resource.clone(),
            name: name.to_owned(),
            reason: reason.into(),
        }
    }

    /// errors raised by the storage name its own resource, report ours instead
    fn qualify(&self, err: StoreError) -> StoreError {
        match err {
            StoreError::AlreadyExists { name, .. } => StoreError::AlreadyExists {
                resource: self.qualified_resource.clone(),
                name,
            },
            other => other,
        }
    }

    pub fn new_object(&self) -> ApiObject<S> {
        (self.new_func)()
    }

    pub fn new_list(&self) -> ApiObjectList<S> {
        (self.new_list_func)()
    }

    #[instrument(skip_all, fields(resource = %self.qualified_resource))]
    pub async fn create(
        &self,
        ctx: &RequestContext,
        mut obj: ApiObject<S>,
    ) -> Result<ApiObject<S>, StoreError> {
        before_create(self.create_strategy.as_ref(), ctx, &mut obj)?;
        let name = (self.object_name_func)(&obj)?;
        let key = (self.key_func)(ctx, &name)?;
        debug!(%key, %name, "create");
        let created = self
            .storage
            .create(&key, obj)
            .await
            .map_err(|err| self.qualify(err))?;
        Ok(created)
    }

    #[instrument(skip(self, ctx), fields(resource = %self.qualified_resource))]
    pub async fn get(&self, ctx: &RequestContext, name: &str) -> Result<ApiObject<S>, StoreError> {
        let key = (self.key_func)(ctx, name)?;
        self.storage
            .get(&key)
            .await?
            .ok_or_else(|| self.not_found(name))
    }

    /// replace the object `name`, guarded by the resource version of `obj`
    #[instrument(skip(self, ctx, obj), fields(resource = %self.qualified_resource))]
    pub async fn update(
        &self,
        ctx: &RequestContext,
        name: &str,
        mut obj: ApiObject<S>,
    ) -> Result<ApiObject<S>, StoreError> {
        if obj.metadata.name != name {
            return Err(StoreError::BadRequest(format!(
                "the name of the object ({}) does not match the name on the URL ({})",
                obj.metadata.name, name
            )));
        }
        let key = (self.key_func)(ctx, name)?;
        debug!(%key, resource_version = %obj.metadata.resource_version, "update");

        let updated = self
            .storage
            .guaranteed_update(
                &key,
                Box::new(move |existing: Option<ApiObject<S>>| {
                    let Some(old) = existing else {
                        if obj.metadata.has_resource_version()
                            || !self.update_strategy.allow_create_on_update()
                        {
                            return Err(self.not_found(name));
                        }
                        trace!("creating on update");
                        before_create(self.create_strategy.as_ref(), ctx, &mut obj)?;
                        return Ok(obj);
                    };

                    let resource_version = &obj.metadata.resource_version;
                    if resource_version.is_empty() {
                        if !self.update_strategy.allow_unconditional_update() {
                            return Err(self.conflict(name, MISSING_RESOURCE_VERSION));
                        }
                    } else if *resource_version != old.metadata.resource_version {
                        return Err(self.conflict(name, STALE_RESOURCE_VERSION));
                    }

                    if !obj.metadata.uid.is_empty() && obj.metadata.uid != old.metadata.uid {
                        return Err(self.conflict(
                            name,
                            format!(
                                "Precondition failed: UID in precondition: {}, UID in object meta: {}",
                                obj.metadata.uid, old.metadata.uid
                            ),
                        ));
                    }

                    before_update(self.update_strategy.as_ref(), ctx, &mut obj, &old)?;
                    Ok(obj)
                }),
            )
            .await
            .map_err(|err| self.qualify(err))?;
        Ok(updated)
    }

    #[instrument(skip(self, ctx), fields(resource = %self.qualified_resource))]
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
    ) -> Result<ApiObject<S>, StoreError> {
        let key = (self.key_func)(ctx, name)?;
        let existing = self
            .storage
            .get(&key)
            .await?
            .ok_or_else(|| self.not_found(name))?;
        let kinds = self.delete_strategy.object_kinds(&existing)?;
        let deleted = self
            .storage
            .delete(&key)
            .await?
            .ok_or_else(|| self.not_found(name))?;
        debug!(%key, ?kinds, "deleted");
        Ok(deleted)
    }

    fn predicate(&self, options: &ListOptions) -> SelectionPredicate {
        (self.predicate_func)(options.label_selector.clone(), options.field_selector.clone())
    }

    /// objects under the key root of `ctx` matching both selectors of `options`
    #[instrument(skip(self, ctx), fields(resource = %self.qualified_resource))]
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<ApiObjectList<S>, StoreError> {
        let predicate = self.predicate(options);

        // a pinned name that forms a valid key is a single key lookup,
        // anything else falls back to the scan
        if let Some(name) = options.field_selector.required_value("metadata.name")
            && let Ok(key) = (self.key_func)(ctx, name)
        {
            let revision = self.storage.current_revision().await;
            let mut list = self.new_list();
            list.metadata.resource_version = revision.to_string();
            if let Some(obj) = self.storage.get(&key).await? {
                if predicate.matches(&obj)? {
                    list.items.push(obj);
                }
            }
            return Ok(list);
        }

        let key_root = (self.key_root_func)(ctx);
        let mut list = self.storage.list(&key_root).await?;
        if !predicate.empty() {
            let mut items = Vec::with_capacity(list.items.len());
            for obj in list.items {
                if predicate.matches(&obj)? {
                    items.push(obj);
                }
            }
            list.items = items;
        }
        debug!(%key_root, items = list.items.len(), "list");
        Ok(list)
    }

    /// changes under the key root of `ctx` to objects matching `options`
    #[instrument(skip(self, ctx), fields(resource = %self.qualified_resource))]
    pub async fn watch(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<BoxStream<'static, WatchEvent<S>>, StoreError> {
        let predicate = self.predicate(options);
        let key_root = (self.key_root_func)(ctx);
        let stream = self.storage.watch(&key_root).await?;
        if predicate.empty() {
            return Ok(stream);
        }
        Ok(stream
            .filter(move |event| {
                let selected = match predicate.matches(event.object()) {
                    Ok(selected) => selected,
                    Err(err) => {
                        error!(%err, "unable to select watch event");
                        false
                    }
                };
                future::ready(selected)
            })
            .boxed())
    }

    /// release the storage backend
    pub fn destroy(&self) {
        if let Some(destroy) = &self.destroy_func {
            debug!(resource = %self.qualified_resource, "destroying store");
            destroy();
        }
    }
}
