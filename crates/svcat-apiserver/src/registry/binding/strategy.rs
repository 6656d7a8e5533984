use std::sync::Arc;

use tracing::trace;

use svcat_object_model::ObjectError;
use svcat_object_model::core::{GroupVersionKind, Object, downcast_mut, downcast_ref};
use svcat_object_model::validation::ErrorList;
use svcat_registry::context::RequestContext;
use svcat_registry::names::NameGenerator;
use svcat_registry::rest::{
    ObjectStrategy, RestCreateStrategy, RestDeleteStrategy, RestUpdateStrategy,
};
use svcat_registry::scheme::ObjectTyper;

use crate::apis::servicecatalog::validation::{validate_binding, validate_binding_update};
use crate::apis::servicecatalog::{BindingSpec, BindingStatus};

/// Lifecycle rules of bindings.
///
/// Spec and status are fixed at creation: updates keep the stored values
/// and only metadata changes are persisted.
#[derive(Debug, Clone)]
pub struct BindingStrategy {
    typer: Arc<dyn ObjectTyper>,
    names: Arc<dyn NameGenerator>,
}

impl BindingStrategy {
    pub fn new(typer: Arc<dyn ObjectTyper>, names: Arc<dyn NameGenerator>) -> Self {
        Self { typer, names }
    }
}

impl ObjectTyper for BindingStrategy {
    fn object_kinds(&self, obj: &dyn Object) -> Result<Vec<GroupVersionKind>, ObjectError> {
        self.typer.object_kinds(obj)
    }

    fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
        self.typer.recognizes(gvk)
    }
}

impl NameGenerator for BindingStrategy {
    fn generate_name(&self, base: &str) -> String {
        self.names.generate_name(base)
    }
}

impl ObjectStrategy for BindingStrategy {
    fn namespace_scoped(&self) -> bool {
        false
    }

    fn canonicalize(&self, obj: &mut dyn Object) -> Result<(), ObjectError> {
        downcast_mut::<BindingSpec>(obj)?;
        Ok(())
    }
}

impl RestCreateStrategy for BindingStrategy {
    fn prepare_for_create(
        &self,
        _ctx: &RequestContext,
        obj: &mut dyn Object,
    ) -> Result<(), ObjectError> {
        let binding = downcast_mut::<BindingSpec>(obj)?;
        trace!(name = %binding.metadata.name, "clearing status");
        binding.status = BindingStatus { conditions: vec![] };
        Ok(())
    }

    fn validate(&self, _ctx: &RequestContext, obj: &dyn Object) -> Result<ErrorList, ObjectError> {
        Ok(validate_binding(downcast_ref::<BindingSpec>(obj)?))
    }
}

impl RestUpdateStrategy for BindingStrategy {
    fn allow_create_on_update(&self) -> bool {
        false
    }

    fn prepare_for_update(
        &self,
        _ctx: &RequestContext,
        obj: &mut dyn Object,
        old: &dyn Object,
    ) -> Result<(), ObjectError> {
        let old = downcast_ref::<BindingSpec>(old)?;
        let binding = downcast_mut::<BindingSpec>(obj)?;
        binding.spec = old.spec.clone();
        binding.status = old.status.clone();
        Ok(())
    }

    fn validate_update(
        &self,
        _ctx: &RequestContext,
        obj: &dyn Object,
        old: &dyn Object,
    ) -> Result<ErrorList, ObjectError> {
        let new = downcast_ref::<BindingSpec>(obj)?;
        let old = downcast_ref::<BindingSpec>(old)?;
        Ok(validate_binding_update(new, old))
    }

    fn allow_unconditional_update(&self) -> bool {
        false
    }
}

impl RestDeleteStrategy for BindingStrategy {}
