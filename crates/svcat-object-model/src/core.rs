use std::any::Any;
use std::fmt;
use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::ObjectError;
use crate::meta::{ApiObject, ObjectMeta};

/// Static description of a resource type
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Crd {
    pub group: &'static str,
    pub version: &'static str,
    pub names: CrdNames,
}

#[derive(Debug, PartialEq, Eq, Hash)]
pub struct CrdNames {
    pub kind: &'static str,
    pub plural: &'static str,
    pub singular: &'static str,
}

pub trait Status:
    Sized + Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Desired state of a resource
pub trait Spec:
    Sized + Debug + Clone + Default + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    type Status: Status;

    /// if true, objects are partitioned by namespace
    const NAME_SPACED: bool = true;

    fn metadata() -> &'static Crd;

    fn label() -> &'static str {
        Self::metadata().names.kind
    }

    fn kind() -> String {
        Self::metadata().names.kind.to_owned()
    }

    fn api_version() -> String {
        let metadata = Self::metadata();
        if metadata.group.is_empty() {
            return metadata.version.to_owned();
        }
        format!("{}/{}", metadata.group, metadata.version)
    }

    fn group_version_kind() -> GroupVersionKind {
        let metadata = Self::metadata();
        GroupVersionKind::new(metadata.group, metadata.version, metadata.names.kind)
    }

    /// plural resource name qualified by group
    fn group_resource() -> GroupResource {
        let metadata = Self::metadata();
        GroupResource::new(metadata.group, metadata.names.plural)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupVersionKind {
    pub group: String,
    pub version: String,
    pub kind: String,
}

impl GroupVersionKind {
    pub fn new(group: impl Into<String>, version: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            version: version.into(),
            kind: kind.into(),
        }
    }
}

impl fmt::Display for GroupVersionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}, Kind={}", self.version, self.kind)
        } else {
            write!(f, "{}/{}, Kind={}", self.group, self.version, self.kind)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GroupResource {
    pub group: String,
    pub resource: String,
}

impl GroupResource {
    pub fn new(group: impl Into<String>, resource: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            resource: resource.into(),
        }
    }
}

impl fmt::Display for GroupResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.group.is_empty() {
            write!(f, "{}", self.resource)
        } else {
            write!(f, "{}.{}", self.resource, self.group)
        }
    }
}

/// Type-erased view of a stored object.
///
/// Registry hooks receive objects through this trait so that a misrouted
/// object surfaces as an [`ObjectError`] rather than a crash.
pub trait Object: Any + Debug + Send + Sync {
    /// kind label of the concrete type
    fn kind(&self) -> &str;

    fn metadata(&self) -> &ObjectMeta;

    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<S: Spec> Object for ApiObject<S> {
    fn kind(&self) -> &str {
        S::label()
    }

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub fn downcast_ref<S: Spec>(obj: &dyn Object) -> Result<&ApiObject<S>, ObjectError> {
    let found = obj.kind();
    obj.as_any()
        .downcast_ref::<ApiObject<S>>()
        .ok_or_else(|| ObjectError::TypeMismatch {
            expected: S::label(),
            found: found.to_owned(),
        })
}

pub fn downcast_mut<S: Spec>(obj: &mut dyn Object) -> Result<&mut ApiObject<S>, ObjectError> {
    let found = obj.kind().to_owned();
    obj.as_any_mut()
        .downcast_mut::<ApiObject<S>>()
        .ok_or(ObjectError::TypeMismatch {
            expected: S::label(),
            found,
        })
}
