//! Validation shared by every resource type's metadata

use std::collections::BTreeMap;

use crate::meta::ObjectMeta;

use super::field::{ErrorList, FieldError, Path, validate_immutable_field};
use super::names::{is_dns1123_label, is_dns1123_subdomain, is_qualified_name, is_valid_label_value};

const TOTAL_ANNOTATION_SIZE_LIMIT: usize = 256 * 1024;

/// validates a name, `prefix` is set when validating `generateName`
pub type ValidateNameFunc = fn(&str, bool) -> Vec<String>;

/// generated names get a random suffix, so a trailing dash is acceptable
fn mask_trailing_dash(name: &str) -> String {
    match name.strip_suffix('-') {
        Some(stripped) if !stripped.is_empty() => format!("{stripped}a"),
        _ => name.to_owned(),
    }
}

pub fn name_is_dns_subdomain(name: &str, prefix: bool) -> Vec<String> {
    if prefix {
        is_dns1123_subdomain(&mask_trailing_dash(name))
    } else {
        is_dns1123_subdomain(name)
    }
}

pub fn name_is_dns_label(name: &str, prefix: bool) -> Vec<String> {
    if prefix {
        is_dns1123_label(&mask_trailing_dash(name))
    } else {
        is_dns1123_label(name)
    }
}

pub fn validate_labels(labels: &BTreeMap<String, String>, path: &Path) -> ErrorList {
    let mut errors = vec![];
    for (key, value) in labels {
        for msg in is_qualified_name(key) {
            errors.push(FieldError::invalid(path, key, msg));
        }
        for msg in is_valid_label_value(value) {
            errors.push(FieldError::invalid(path, value, msg));
        }
    }
    errors
}

pub fn validate_annotations(annotations: &BTreeMap<String, String>, path: &Path) -> ErrorList {
    let mut errors = vec![];
    let mut total_size = 0;
    for (key, value) in annotations {
        for msg in is_qualified_name(&key.to_lowercase()) {
            errors.push(FieldError::invalid(path, key, msg));
        }
        total_size += key.len() + value.len();
    }
    if total_size > TOTAL_ANNOTATION_SIZE_LIMIT {
        errors.push(FieldError::too_long(path, TOTAL_ANNOTATION_SIZE_LIMIT));
    }
    errors
}

pub fn validate_object_meta(
    meta: &ObjectMeta,
    requires_namespace: bool,
    name_fn: ValidateNameFunc,
    path: &Path,
) -> ErrorList {
    let mut errors = vec![];

    if !meta.generate_name.is_empty() {
        for msg in name_fn(&meta.generate_name, true) {
            errors.push(FieldError::invalid(
                &path.child("generateName"),
                &meta.generate_name,
                msg,
            ));
        }
    }

    if meta.name.is_empty() {
        if meta.generate_name.is_empty() {
            errors.push(FieldError::required(
                &path.child("name"),
                "name or generateName is required",
            ));
        }
    } else {
        for msg in name_fn(&meta.name, false) {
            errors.push(FieldError::invalid(&path.child("name"), &meta.name, msg));
        }
    }

    if requires_namespace {
        if meta.namespace.is_empty() {
            errors.push(FieldError::required(&path.child("namespace"), ""));
        } else {
            for msg in is_dns1123_label(&meta.namespace) {
                errors.push(FieldError::invalid(
                    &path.child("namespace"),
                    &meta.namespace,
                    msg,
                ));
            }
        }
    } else if !meta.namespace.is_empty() {
        errors.push(FieldError::forbidden(
            &path.child("namespace"),
            "not allowed on this type",
        ));
    }

    if meta.generation < 0 {
        errors.push(FieldError::invalid(
            &path.child("generation"),
            meta.generation,
            "must be greater than or equal to 0",
        ));
    }

    errors.extend(validate_labels(&meta.labels, &path.child("labels")));
    errors.extend(validate_annotations(
        &meta.annotations,
        &path.child("annotations"),
    ));
    errors
}

/// identity fields may not change once an object is stored
pub fn validate_object_meta_update(new: &ObjectMeta, old: &ObjectMeta, path: &Path) -> ErrorList {
    let mut errors = vec![];
    errors.extend(validate_immutable_field(&new.name, &old.name, &path.child("name")));
    errors.extend(validate_immutable_field(
        &new.namespace,
        &old.namespace,
        &path.child("namespace"),
    ));
    errors.extend(validate_immutable_field(&new.uid, &old.uid, &path.child("uid")));
    errors.extend(validate_immutable_field(
        &new.creation_timestamp,
        &old.creation_timestamp,
        &path.child("creationTimestamp"),
    ));
    if new.generation < old.generation {
        errors.push(FieldError::invalid(
            &path.child("generation"),
            new.generation,
            "must not be decremented",
        ));
    }
    errors.extend(validate_labels(&new.labels, &path.child("labels")));
    errors.extend(validate_annotations(
        &new.annotations,
        &path.child("annotations"),
    ));
    errors
}
