//!
//! # Scheme
//!
//! Type identification service: maps concrete object types to their kind.
//!

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;

use tracing::debug;

use svcat_object_model::ApiObject;
use svcat_object_model::ObjectError;
use svcat_object_model::core::{GroupVersionKind, Object, Spec};

pub trait ObjectTyper: Debug + Send + Sync {
    /// kinds the object is registered under
    fn object_kinds(&self, obj: &dyn Object) -> Result<Vec<GroupVersionKind>, ObjectError>;

    fn recognizes(&self, gvk: &GroupVersionKind) -> bool;
}

#[derive(Debug, Default)]
pub struct Scheme {
    kinds: HashMap<TypeId, GroupVersionKind>,
    known: HashSet<GroupVersionKind>,
}

impl Scheme {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_known_type<S: Spec>(&mut self) -> &mut Self {
        let gvk = S::group_version_kind();
        debug!(%gvk, "registering kind");
        self.kinds.insert(TypeId::of::<ApiObject<S>>(), gvk.clone());
        self.known.insert(gvk);
        self
    }

    pub fn is_registered<S: Spec>(&self) -> bool {
        self.kinds.contains_key(&TypeId::of::<ApiObject<S>>())
    }
}

impl ObjectTyper for Scheme {
    fn object_kinds(&self, obj: &dyn Object) -> Result<Vec<GroupVersionKind>, ObjectError> {
        let type_id = Any::type_id(obj.as_any());
        self.kinds
            .get(&type_id)
            .map(|gvk| vec![gvk.clone()])
            .ok_or_else(|| ObjectError::NotRegistered {
                kind: obj.kind().to_owned(),
            })
    }

    fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.known.contains(gvk)
    }
}
