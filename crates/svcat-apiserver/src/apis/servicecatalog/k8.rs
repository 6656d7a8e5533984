use svcat_object_model::core::{Crd, CrdNames, Spec, Status};
use svcat_types::defaults::{BINDINGS_RESOURCE, SERVICE_CATALOG_GROUP, SERVICE_CATALOG_VERSION};

use super::{BindingSpec, BindingStatus};

const BINDING_API: Crd = Crd {
    group: SERVICE_CATALOG_GROUP,
    version: SERVICE_CATALOG_VERSION,
    names: CrdNames {
        kind: "Binding",
        plural: BINDINGS_RESOURCE,
        singular: "binding",
    },
};

impl Spec for BindingSpec {
    type Status = BindingStatus;
    const NAME_SPACED: bool = false;

    fn metadata() -> &'static Crd {
        &BINDING_API
    }
}

impl Status for BindingStatus {}
