//! Field validation of service catalog resources

use std::collections::HashSet;

use uuid::Uuid;

use svcat_object_model::core::Spec;
use svcat_object_model::validation::meta::{
    name_is_dns_subdomain, validate_object_meta, validate_object_meta_update,
};
use svcat_object_model::validation::names::is_dns1123_subdomain;
use svcat_object_model::validation::{ErrorList, FieldError, Path};
use svcat_object_model::validation::field::validate_immutable_field;

use super::{Binding, BindingSpec, BindingStatus};

pub fn validate_binding_name(name: &str, prefix: bool) -> Vec<String> {
    name_is_dns_subdomain(name, prefix)
}

fn validate_binding_spec(spec: &BindingSpec, path: &Path) -> ErrorList {
    let mut errors = vec![];

    let instance_path = path.child("instanceRef").child("name");
    let instance = &spec.service_instance_ref.name;
    if instance.is_empty() {
        errors.push(FieldError::required(&instance_path, "instance name is required"));
    } else {
        for msg in is_dns1123_subdomain(instance) {
            errors.push(FieldError::invalid(&instance_path, instance, msg));
        }
    }

    if !spec.secret_name.is_empty() {
        for msg in is_dns1123_subdomain(&spec.secret_name) {
            errors.push(FieldError::invalid(
                &path.child("secretName"),
                &spec.secret_name,
                msg,
            ));
        }
    }

    if !spec.external_id.is_empty() && Uuid::parse_str(&spec.external_id).is_err() {
        errors.push(FieldError::invalid(
            &path.child("externalID"),
            &spec.external_id,
            "must be a valid UUID",
        ));
    }

    if let Some(parameters) = &spec.parameters {
        if !parameters.is_object() {
            errors.push(FieldError::invalid(
                &path.child("parameters"),
                parameters,
                "must be a JSON object",
            ));
        }
    }

    errors
}

fn validate_binding_status(status: &BindingStatus, path: &Path) -> ErrorList {
    let mut errors = vec![];
    let mut seen = HashSet::new();
    for (index, condition) in status.conditions.iter().enumerate() {
        if !seen.insert(condition.type_) {
            errors.push(FieldError::duplicate(
                &path.child("conditions").index(index).child("type"),
                condition.type_,
            ));
        }
    }
    errors
}

pub fn validate_binding(binding: &Binding) -> ErrorList {
    let mut errors = validate_object_meta(
        &binding.metadata,
        BindingSpec::NAME_SPACED,
        validate_binding_name,
        &Path::new("metadata"),
    );
    errors.extend(validate_binding_spec(&binding.spec, &Path::new("spec")));
    errors.extend(validate_binding_status(&binding.status, &Path::new("status")));
    errors
}

/// identity and the referenced instance must not change
pub fn validate_binding_update(new: &Binding, old: &Binding) -> ErrorList {
    let mut errors =
        validate_object_meta_update(&new.metadata, &old.metadata, &Path::new("metadata"));
    let spec_path = Path::new("spec");
    errors.extend(validate_binding_spec(&new.spec, &spec_path));
    errors.extend(validate_immutable_field(
        &new.spec.service_instance_ref,
        &old.spec.service_instance_ref,
        &spec_path.child("instanceRef"),
    ));
    errors.extend(validate_binding_status(&new.status, &Path::new("status")));
    errors
}

#[cfg(test)]
mod test {

    use svcat_object_model::validation::ErrorType;

    use super::super::{BindingCondition, BindingConditionType, ConditionStatus};
    use super::*;

    fn binding(name: &str, instance: &str) -> Binding {
        Binding::new(name, BindingSpec::new(instance, "secret"))
    }

    #[test]
    fn test_valid_binding() {
        let mut binding = binding("b1", "db");
        binding.spec.external_id = "1b8a5e0a-8b37-4f8e-9c4e-0d1d3b6c2f11".to_owned();
        binding.spec.parameters = Some(serde_json::json!({ "plan": "small" }));
        assert_eq!(validate_binding(&binding), vec![]);
    }

    #[test]
    fn test_invalid_binding() {
        let mut binding = binding("B_1", "");
        binding.metadata.namespace = "ns1".to_owned();
        binding.spec.secret_name = "Bad Secret".to_owned();
        binding.spec.external_id = "not-a-uuid".to_owned();
        binding.spec.parameters = Some(serde_json::json!([1, 2]));

        let errors = validate_binding(&binding);
        let fields: Vec<&str> = errors.iter().map(|err| err.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "metadata.name",
                "metadata.namespace",
                "spec.instanceRef.name",
                "spec.secretName",
                "spec.externalID",
                "spec.parameters",
            ]
        );
        assert_eq!(errors[2].error_type, ErrorType::Required);
    }

    #[test]
    fn test_duplicate_conditions() {
        let mut binding = binding("b1", "db");
        binding.status.conditions = vec![
            BindingCondition::new(BindingConditionType::Ready, ConditionStatus::False),
            BindingCondition::new(BindingConditionType::Ready, ConditionStatus::True),
        ];
        let errors = validate_binding(&binding);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].error_type, ErrorType::Duplicate);
        assert_eq!(errors[0].field, "status.conditions[1].type");
    }

    #[test]
    fn test_instance_ref_is_immutable() {
        let old = binding("b1", "db");
        let new = binding("b1", "other-db");
        let errors = validate_binding_update(&new, &old);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "spec.instanceRef");
        assert_eq!(errors[0].detail, "field is immutable");

        assert_eq!(validate_binding_update(&old.clone(), &old), vec![]);
    }
}
