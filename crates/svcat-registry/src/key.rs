//! Storage key builders.
//!
//! Keys are `<prefix>/<namespace>/<name>` for namespaced resources and
//! `<prefix>/<name>` for cluster scoped ones.

use svcat_object_model::validation::names::is_valid_path_segment_name;
use svcat_types::defaults::KEY_SEPARATOR;
use svcat_types::StorageKey;

use crate::StoreError;
use crate::context::RequestContext;

fn check_name(name: &str) -> Result<(), StoreError> {
    if name.is_empty() {
        return Err(StoreError::BadRequest("name parameter required.".to_owned()));
    }
    let errors = is_valid_path_segment_name(name);
    if !errors.is_empty() {
        return Err(StoreError::BadRequest(format!(
            "Name parameter invalid: {:?}: {}",
            name,
            errors.join(";")
        )));
    }
    Ok(())
}

fn join(root: &str, segment: &str) -> StorageKey {
    format!("{root}{KEY_SEPARATOR}{segment}")
}

/// list root for a namespaced resource, the whole prefix when no namespace is requested
pub fn namespace_key_root_func(ctx: &RequestContext, prefix: &str) -> StorageKey {
    match ctx.namespace() {
        Some(namespace) => join(prefix, namespace),
        None => prefix.to_owned(),
    }
}

pub fn namespace_key_func(
    ctx: &RequestContext,
    prefix: &str,
    name: &str,
) -> Result<StorageKey, StoreError> {
    let Some(namespace) = ctx.namespace() else {
        return Err(StoreError::BadRequest(
            "Namespace parameter required.".to_owned(),
        ));
    };
    check_name(name)?;
    Ok(join(&join(prefix, namespace), name))
}

pub fn no_namespace_key_root_func(_ctx: &RequestContext, prefix: &str) -> StorageKey {
    prefix.to_owned()
}

pub fn no_namespace_key_func(
    _ctx: &RequestContext,
    prefix: &str,
    name: &str,
) -> Result<StorageKey, StoreError> {
    check_name(name)?;
    Ok(join(prefix, name))
}
