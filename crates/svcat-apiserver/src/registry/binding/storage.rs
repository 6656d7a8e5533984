//!
//! # Binding storage
//!
//! Wires the binding strategy, key layout and selection into a generic [`Store`].
//!
use std::sync::Arc;

use tracing::info;

use svcat_object_model::ObjectError;
use svcat_object_model::core::{Object, Spec, downcast_ref};
use svcat_object_model::{ApiObject, ApiObjectList};
use svcat_object_model::{fields, labels};
use svcat_registry::StoreError;
use svcat_registry::context::RequestContext;
use svcat_registry::key::{no_namespace_key_func, no_namespace_key_root_func};
use svcat_registry::options::RestOptions;
use svcat_registry::predicate::{SelectionPredicate, merge_fields_sets, object_meta_fields_set};
use svcat_registry::storage::StorageDecorator;
use svcat_registry::store::Store;

use crate::apis::servicecatalog::{Binding, BindingSpec};

use super::BindingStrategy;

/// fields a binding can be selected by
pub fn to_selectable_fields(binding: &Binding) -> fields::Set {
    merge_fields_sets(object_meta_fields_set(&binding.metadata, true), None)
}

pub fn get_attrs(obj: &dyn Object) -> Result<(labels::Set, fields::Set), ObjectError> {
    let binding = downcast_ref::<BindingSpec>(obj)?;
    Ok((
        labels::Set::from(binding.metadata.labels.clone()),
        to_selectable_fields(binding),
    ))
}

pub fn matcher(label: labels::Selector, field: fields::Selector) -> SelectionPredicate {
    SelectionPredicate::new(label, field, get_attrs)
}

fn binding_name(obj: &dyn Object) -> Result<String, ObjectError> {
    Ok(downcast_ref::<BindingSpec>(obj)?.metadata.name.clone())
}

/// store for bindings, keyed by name under `/<resource prefix>`
pub fn new_storage<D: StorageDecorator>(
    opts: &RestOptions<D>,
    strategy: Arc<BindingStrategy>,
) -> Result<Store<BindingSpec>, StoreError> {
    let prefix = format!("/{}", opts.resource_prefix);

    let (storage, destroy) = opts
        .decorator
        .decorate::<BindingSpec>(&opts.storage_config, &opts.resource_prefix)?;

    let root_prefix = prefix.clone();
    let key_prefix = prefix.clone();

    info!(%prefix, "binding storage ready");
    Ok(Store {
        new_func: ApiObject::empty,
        new_list_func: ApiObjectList::empty,
        key_root_func: Box::new(move |ctx: &RequestContext| {
            no_namespace_key_root_func(ctx, &root_prefix)
        }),
        key_func: Box::new(move |ctx: &RequestContext, name: &str| {
            no_namespace_key_func(ctx, &key_prefix, name)
        }),
        object_name_func: binding_name,
        predicate_func: matcher,
        qualified_resource: BindingSpec::group_resource(),
        create_strategy: strategy.clone(),
        update_strategy: strategy.clone(),
        delete_strategy: strategy,
        storage,
        destroy_func: Some(destroy),
    })
}

#[cfg(test)]
mod test {

    use futures_util::StreamExt;

    use svcat_object_model::ObjectMeta;
    use svcat_object_model::fixture::test_object;
    use svcat_registry::names::SimpleNameGenerator;
    use svcat_registry::options::ListOptions;
    use svcat_registry::scheme::Scheme;
    use svcat_registry::storage::{StorageConfig, WatchEvent};

    use crate::apis::servicecatalog::{
        BindingCondition, BindingConditionType, ConditionStatus, LocalObjectReference,
        add_to_scheme,
    };

    use super::*;

    fn binding_store() -> Store<BindingSpec> {
        let mut scheme = Scheme::new();
        add_to_scheme(&mut scheme);
        let strategy = Arc::new(BindingStrategy::new(
            Arc::new(scheme),
            Arc::new(SimpleNameGenerator),
        ));
        let opts = RestOptions::undecorated(StorageConfig::default(), "servicecatalog.k8s.io/bindings");
        new_storage(&opts, strategy).expect("storage")
    }

    fn binding(name: &str, app: &str) -> Binding {
        Binding::new(name, BindingSpec::new("db", "db-secret"))
            .with_metadata(ObjectMeta::new(name).set_labels(vec![("app", app)]))
    }

    #[test]
    fn test_get_attrs() {
        let mut obj = binding("b1", "foo");
        obj.metadata.namespace = "ns1".to_owned();
        let (labels, fields) = get_attrs(&obj).expect("binding");
        assert_eq!(labels.get("app"), Some("foo"));
        assert_eq!(fields.get("metadata.name"), Some("b1"));
        assert_eq!(fields.get("metadata.namespace"), Some("ns1"));
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_get_attrs_other_kind() {
        let err = get_attrs(&test_object("t1", 1)).expect_err("not a binding");
        assert_eq!(
            err,
            ObjectError::TypeMismatch {
                expected: "Binding",
                found: "Test".to_owned()
            }
        );

        let predicate = matcher("app=foo".parse().expect("selector"), fields::Selector::everything());
        assert!(predicate.matches(&test_object("t1", 1)).is_err());
    }

    #[test]
    fn test_keys_ignore_namespace() {
        let store = binding_store();
        let ctx = RequestContext::new().with_namespace("ns1");
        assert_eq!((store.key_root_func)(&ctx), "/servicecatalog.k8s.io/bindings");
        assert_eq!(
            (store.key_root_func)(&RequestContext::new()),
            "/servicecatalog.k8s.io/bindings"
        );
        assert_eq!(
            (store.key_func)(&ctx, "b1").expect("key"),
            "/servicecatalog.k8s.io/bindings/b1"
        );
        assert_eq!(store.qualified_resource.to_string(), "bindings.servicecatalog.k8s.io");
        assert_eq!(store.new_object().type_meta.kind, "Binding");
        assert_eq!(store.new_list().type_meta.kind, "BindingList");
    }

    #[fluvio_future::test]
    async fn test_create_clears_status() {
        fluvio_future::subscriber::init_logger();

        let store = binding_store();
        let ctx = RequestContext::new().with_namespace("ns1");
        let mut obj = binding("b1", "foo");
        obj.status.conditions = vec![BindingCondition::new(
            BindingConditionType::Ready,
            ConditionStatus::True,
        )];

        let created = store.create(&ctx, obj).await.expect("create");
        assert!(created.status.conditions.is_empty());
        assert_eq!(created.metadata.namespace, "");
        assert!(!created.metadata.uid.is_empty());

        let stored = store.get(&ctx, "b1").await.expect("get");
        assert!(stored.status.conditions.is_empty());
    }

    #[fluvio_future::test]
    async fn test_update_keeps_instance_ref() {
        let store = binding_store();
        let ctx = RequestContext::new();
        let created = store.create(&ctx, binding("b1", "foo")).await.expect("create");

        let mut obj = created.clone();
        obj.spec.service_instance_ref = LocalObjectReference::new("other-db");
        obj.metadata.labels.insert("tier".to_owned(), "backend".to_owned());
        let updated = store.update(&ctx, "b1", obj).await.expect("update");

        assert_eq!(updated.spec.service_instance_ref, LocalObjectReference::new("db"));
        assert_eq!(updated.status, created.status);
        assert_eq!(updated.metadata.labels.get("tier").map(String::as_str), Some("backend"));

        let stored = store.get(&ctx, "b1").await.expect("get");
        assert_eq!(stored.spec, created.spec);
    }

    #[fluvio_future::test]
    async fn test_list_by_label() {
        let store = binding_store();
        let ctx = RequestContext::new();
        for (name, app) in [("b1", "foo"), ("b2", "bar"), ("b3", "foo")] {
            store.create(&ctx, binding(name, app)).await.expect("create");
        }

        let options = ListOptions::parse("app=foo", "").expect("options");
        let list = store.list(&ctx, &options).await.expect("list");
        let names: Vec<&str> = list.items.iter().map(|obj| obj.name()).collect();
        assert_eq!(names, vec!["b1", "b3"]);
        assert_eq!(list.type_meta.kind, "BindingList");

        let all = store
            .list(&RequestContext::new().with_namespace("ns1"), &ListOptions::default())
            .await
            .expect("list");
        assert_eq!(all.len(), 3);
    }

    #[fluvio_future::test]
    async fn test_list_by_name_that_is_not_a_key() {
        let store = binding_store();
        let ctx = RequestContext::new();
        store.create(&ctx, binding("b1", "foo")).await.expect("create");

        for selector in ["metadata.name=", "metadata.name=..", "metadata.name=a/b"] {
            let options = ListOptions::parse("", selector).expect("options");
            let list = store.list(&ctx, &options).await.expect("list");
            assert!(list.items.is_empty(), "{selector}");
        }

        let options = ListOptions::parse("", "metadata.name=b1").expect("options");
        assert_eq!(store.list(&ctx, &options).await.expect("list").len(), 1);
    }

    #[fluvio_future::test]
    async fn test_update_without_matching_version() {
        let store = binding_store();
        let ctx = RequestContext::new();
        let created = store.create(&ctx, binding("b1", "foo")).await.expect("create");

        let mut stale = created.clone();
        stale.metadata.resource_version = "0".to_owned();
        stale.metadata.labels.insert("app".to_owned(), "bar".to_owned());
        let err = store.update(&ctx, "b1", stale).await.expect_err("stale");
        assert!(err.is_conflict());

        let mut missing = created.clone();
        missing.metadata.resource_version.clear();
        let err = store.update(&ctx, "b1", missing).await.expect_err("missing");
        assert!(err.is_conflict());

        assert_eq!(store.get(&ctx, "b1").await.expect("get"), created);
    }

    #[fluvio_future::test]
    async fn test_update_missing_binding() {
        let store = binding_store();
        let err = store
            .update(&RequestContext::new(), "b1", binding("b1", "foo"))
            .await
            .expect_err("missing");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "bindings.servicecatalog.k8s.io \"b1\" not found");
    }

    #[fluvio_future::test]
    async fn test_watch_and_delete() {
        let store = binding_store();
        let ctx = RequestContext::new();
        let options = ListOptions::parse("", "metadata.name=b2").expect("options");
        let mut stream = store.watch(&ctx, &options).await.expect("watch");

        store.create(&ctx, binding("b1", "foo")).await.expect("create");
        store.create(&ctx, binding("b2", "foo")).await.expect("create");
        store.delete(&ctx, "b2").await.expect("delete");

        match stream.next().await.expect("event") {
            WatchEvent::Added(obj) => assert_eq!(obj.name(), "b2"),
            other => panic!("unexpected event: {other:?}"),
        }
        match stream.next().await.expect("event") {
            WatchEvent::Deleted(obj) => assert_eq!(obj.name(), "b2"),
            other => panic!("unexpected event: {other:?}"),
        }
        store.destroy();
    }
}
