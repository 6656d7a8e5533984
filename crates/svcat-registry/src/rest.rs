//!
//! # Rest strategies
//!
//! Per resource lifecycle hooks and the generic steps run around them.
//!
use chrono::Utc;
use tracing::{debug, trace};
use uuid::Uuid;

use svcat_object_model::ObjectError;
use svcat_object_model::core::Object;
use svcat_object_model::validation::ErrorList;

use crate::StoreError;
use crate::context::RequestContext;
use crate::names::NameGenerator;
use crate::scheme::ObjectTyper;

/// Behavior shared by create and update
pub trait ObjectStrategy: ObjectTyper {
    /// if false, objects of this kind live outside any namespace
    fn namespace_scoped(&self) -> bool;

    /// normalize an object before it is persisted
    fn canonicalize(&self, obj: &mut dyn Object) -> Result<(), ObjectError>;
}

pub trait RestCreateStrategy: ObjectStrategy + NameGenerator {
    /// clear fields that clients may not set on create
    fn prepare_for_create(
        &self,
        ctx: &RequestContext,
        obj: &mut dyn Object,
    ) -> Result<(), ObjectError>;

    fn validate(&self, ctx: &RequestContext, obj: &dyn Object) -> Result<ErrorList, ObjectError>;
}

pub trait RestUpdateStrategy: ObjectStrategy {
    /// if true, updating a missing object creates it
    fn allow_create_on_update(&self) -> bool;

    /// restore fields that clients may not change from the stored object
    fn prepare_for_update(
        &self,
        ctx: &RequestContext,
        obj: &mut dyn Object,
        old: &dyn Object,
    ) -> Result<(), ObjectError>;

    fn validate_update(
        &self,
        ctx: &RequestContext,
        obj: &dyn Object,
        old: &dyn Object,
    ) -> Result<ErrorList, ObjectError>;

    /// if true, an update without resource version overwrites the stored object
    fn allow_unconditional_update(&self) -> bool;
}

pub trait RestDeleteStrategy: ObjectTyper {}

/// A strategy usable for every verb
pub trait RestStrategy: RestCreateStrategy + RestUpdateStrategy + RestDeleteStrategy {}

impl<T> RestStrategy for T where T: RestCreateStrategy + RestUpdateStrategy + RestDeleteStrategy {}

fn check_kind<T: ObjectTyper + ?Sized>(strategy: &T, obj: &dyn Object) -> Result<(), StoreError> {
    let kinds = strategy.object_kinds(obj)?;
    trace!(kind = obj.kind(), ?kinds, "object kinds");
    Ok(())
}

fn check_scope(
    namespace_scoped: bool,
    ctx: &RequestContext,
    obj: &mut dyn Object,
) -> Result<(), StoreError> {
    let meta = obj.metadata_mut();
    if namespace_scoped {
        let Some(namespace) = ctx.namespace() else {
            return Err(StoreError::BadRequest(
                "namespace is required for a namespaced resource".to_owned(),
            ));
        };
        if meta.namespace.is_empty() {
            meta.namespace = namespace.to_owned();
        } else if meta.namespace != namespace {
            return Err(StoreError::BadRequest(format!(
                "the namespace of the object ({}) does not match the namespace on the request ({})",
                meta.namespace, namespace
            )));
        }
    } else {
        meta.namespace.clear();
    }
    Ok(())
}

fn invalid(obj: &dyn Object, errors: ErrorList) -> StoreError {
    StoreError::Invalid {
        kind: obj.kind().to_owned(),
        name: obj.metadata().name.clone(),
        errors,
    }
}

/// Runs the generic create steps and the create hooks of `strategy` on `obj`
pub fn before_create(
    strategy: &dyn RestCreateStrategy,
    ctx: &RequestContext,
    obj: &mut dyn Object,
) -> Result<(), StoreError> {
    check_kind(strategy, obj)?;
    check_scope(strategy.namespace_scoped(), ctx, obj)?;

    {
        let meta = obj.metadata_mut();
        if meta.has_resource_version() {
            return Err(StoreError::BadRequest(
                "resourceVersion should not be set on objects to be created".to_owned(),
            ));
        }
        meta.deletion_timestamp = None;
        meta.deletion_grace_period_seconds = None;
        meta.uid = Uuid::new_v4().to_string();
        meta.creation_timestamp = Some(Utc::now());
        meta.generation = 1;
    }

    strategy.prepare_for_create(ctx, obj)?;

    let meta = obj.metadata_mut();
    if meta.name.is_empty() && !meta.generate_name.is_empty() {
        meta.name = strategy.generate_name(&meta.generate_name);
        debug!(name = %meta.name, "generated name");
    }

    let errors = strategy.validate(ctx, obj)?;
    if !errors.is_empty() {
        return Err(invalid(obj, errors));
    }

    strategy.canonicalize(obj)?;
    Ok(())
}

/// Runs the generic update steps and the update hooks of `strategy` on `obj`
pub fn before_update(
    strategy: &dyn RestUpdateStrategy,
    ctx: &RequestContext,
    obj: &mut dyn Object,
    old: &dyn Object,
) -> Result<(), StoreError> {
    check_kind(strategy, obj)?;
    check_scope(strategy.namespace_scoped(), ctx, obj)?;

    {
        let old_meta = old.metadata();
        let meta = obj.metadata_mut();
        meta.uid = old_meta.uid.clone();
        meta.creation_timestamp = old_meta.creation_timestamp;
        meta.generation = old_meta.generation;
    }

    strategy.prepare_for_update(ctx, obj, old)?;

    let errors = strategy.validate_update(ctx, obj, old)?;
    if !errors.is_empty() {
        return Err(invalid(obj, errors));
    }

    strategy.canonicalize(obj)?;
    Ok(())
}

#[cfg(any(test, feature = "fixture"))]
pub mod fixture {

    use std::sync::Arc;

    use svcat_object_model::ObjectError;
    use svcat_object_model::core::{GroupVersionKind, Object, downcast_mut, downcast_ref};
    use svcat_object_model::fixture::{TestSpec, TestStatus};
    use svcat_object_model::validation::{ErrorList, FieldError, Path};
    use svcat_object_model::validation::meta::{
        name_is_dns_subdomain, validate_object_meta, validate_object_meta_update,
    };

    use crate::context::RequestContext;
    use crate::names::{NameGenerator, SimpleNameGenerator};
    use crate::scheme::{ObjectTyper, Scheme};

    use super::*;

    /// Strategy over the fixture `Test` kind. Replica count must be below 100.
    #[derive(Debug)]
    pub struct TestStrategy {
        typer: Arc<dyn ObjectTyper>,
        names: Arc<dyn NameGenerator>,
        pub namespaced: bool,
        pub create_on_update: bool,
        pub unconditional_update: bool,
    }

    impl TestStrategy {
        pub fn new() -> Self {
            let mut scheme = Scheme::new();
            scheme.add_known_type::<TestSpec>();
            Self::with_typer(Arc::new(scheme))
        }

        pub fn with_typer(typer: Arc<dyn ObjectTyper>) -> Self {
            Self {
                typer,
                names: Arc::new(SimpleNameGenerator),
                namespaced: true,
                create_on_update: false,
                unconditional_update: false,
            }
        }

        fn validate_spec(spec: &TestSpec) -> ErrorList {
            let mut errors = vec![];
            if spec.replica >= 100 {
                errors.push(FieldError::invalid(
                    &Path::new("spec").child("replica"),
                    spec.replica,
                    "must be less than 100",
                ));
            }
            errors
        }
    }

    impl Default for TestStrategy {
        fn default() -> Self {
            Self::new()
        }
    }

    impl ObjectTyper for TestStrategy {
        fn object_kinds(&self, obj: &dyn Object) -> Result<Vec<GroupVersionKind>, ObjectError> {
            self.typer.object_kinds(obj)
        }

        fn recognizes(&self, gvk: &GroupVersionKind) -> bool {
            self.typer.recognizes(gvk)
        }
    }

    impl NameGenerator for TestStrategy {
        fn generate_name(&self, base: &str) -> String {
            self.names.generate_name(base)
        }
    }

    impl ObjectStrategy for TestStrategy {
        fn namespace_scoped(&self) -> bool {
            self.namespaced
        }

        fn canonicalize(&self, obj: &mut dyn Object) -> Result<(), ObjectError> {
            downcast_mut::<TestSpec>(obj).map(|_| ())
        }
    }

    impl RestCreateStrategy for TestStrategy {
        fn prepare_for_create(
            &self,
            _ctx: &RequestContext,
            obj: &mut dyn Object,
        ) -> Result<(), ObjectError> {
            downcast_mut::<TestSpec>(obj)?.status = TestStatus::default();
            Ok(())
        }

        fn validate(
            &self,
            _ctx: &RequestContext,
            obj: &dyn Object,
        ) -> Result<ErrorList, ObjectError> {
            let test = downcast_ref::<TestSpec>(obj)?;
            let mut errors = validate_object_meta(
                &test.metadata,
                self.namespaced,
                name_is_dns_subdomain,
                &Path::new("metadata"),
            );
            errors.extend(Self::validate_spec(&test.spec));
            Ok(errors)
        }
    }

    impl RestUpdateStrategy for TestStrategy {
        fn allow_create_on_update(&self) -> bool {
            self.create_on_update
        }

        fn prepare_for_update(
            &self,
            _ctx: &RequestContext,
            obj: &mut dyn Object,
            old: &dyn Object,
        ) -> Result<(), ObjectError> {
            let old = downcast_ref::<TestSpec>(old)?;
            downcast_mut::<TestSpec>(obj)?.status = old.status.clone();
            Ok(())
        }

        fn validate_update(
            &self,
            _ctx: &RequestContext,
            obj: &dyn Object,
            old: &dyn Object,
        ) -> Result<ErrorList, ObjectError> {
            let test = downcast_ref::<TestSpec>(obj)?;
            let old = downcast_ref::<TestSpec>(old)?;
            let mut errors =
                validate_object_meta_update(&test.metadata, &old.metadata, &Path::new("metadata"));
            errors.extend(Self::validate_spec(&test.spec));
            Ok(errors)
        }

        fn allow_unconditional_update(&self) -> bool {
            self.unconditional_update
        }
    }

    impl RestDeleteStrategy for TestStrategy {}
}
