use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use svcat_object_model::{ApiObject, ApiObjectList};

pub type Binding = ApiObject<BindingSpec>;
pub type BindingList = ApiObjectList<BindingSpec>;

/// Reference to an object in the same scope as the referrer
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalObjectReference {
    #[serde(default)]
    pub name: String,
}

impl LocalObjectReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Request of an application to use a service instance.
///
/// Immutable once created.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingSpec {
    /// instance being bound to
    #[serde(rename = "instanceRef", default)]
    pub service_instance_ref: LocalObjectReference,

    /// passed to the broker as is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<serde_json::Value>,

    /// secret receiving the credentials of the binding
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub secret_name: String,

    /// identity of the binding at the broker
    #[serde(rename = "externalID", default, skip_serializing_if = "String::is_empty")]
    pub external_id: String,
}

impl BindingSpec {
    pub fn new(instance: impl Into<String>, secret_name: impl Into<String>) -> Self {
        Self {
            service_instance_ref: LocalObjectReference::new(instance),
            secret_name: secret_name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingStatus {
    #[serde(default)]
    pub conditions: Vec<BindingCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindingCondition {
    #[serde(rename = "type")]
    pub type_: BindingConditionType,
    pub status: ConditionStatus,
    pub last_transition_time: DateTime<Utc>,
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub message: String,
}

impl BindingCondition {
    pub fn new(type_: BindingConditionType, status: ConditionStatus) -> Self {
        Self {
            type_,
            status,
            last_transition_time: Utc::now(),
            reason: String::new(),
            message: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>, message: impl Into<String>) -> Self {
        self.reason = reason.into();
        self.message = message.into();
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingConditionType {
    Ready,
}

impl fmt::Display for BindingConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionStatus {
    True,
    False,
    Unknown,
}

#[cfg(test)]
mod test {

    use svcat_object_model::core::Spec;

    use super::*;

    #[test]
    fn test_binding_kind() {
        assert_eq!(BindingSpec::kind(), "Binding");
        assert_eq!(BindingSpec::api_version(), "servicecatalog.k8s.io/v1alpha1");
        assert_eq!(
            BindingSpec::group_resource().to_string(),
            "bindings.servicecatalog.k8s.io"
        );
        assert!(!BindingSpec::NAME_SPACED);
    }

    #[test]
    fn test_binding_json() {
        let json = r#"{
            "apiVersion": "servicecatalog.k8s.io/v1alpha1",
            "kind": "Binding",
            "metadata": { "name": "b1", "labels": { "app": "foo" } },
            "spec": {
                "instanceRef": { "name": "db" },
                "secretName": "db-secret",
                "externalID": "1b8a5e0a-8b37-4f8e-9c4e-0d1d3b6c2f11",
                "parameters": { "size": 3 }
            },
            "status": {
                "conditions": [{
                    "type": "Ready",
                    "status": "True",
                    "lastTransitionTime": "2017-03-01T10:00:00Z",
                    "reason": "Injected"
                }]
            }
        }"#;
        let binding: Binding = serde_json::from_str(json).expect("parse");
        assert_eq!(binding.name(), "b1");
        assert_eq!(binding.metadata.labels.get("app").map(String::as_str), Some("foo"));
        assert_eq!(binding.spec.service_instance_ref.name, "db");
        assert_eq!(binding.spec.secret_name, "db-secret");
        assert_eq!(
            binding.spec.parameters,
            Some(serde_json::json!({ "size": 3 }))
        );
        assert_eq!(binding.status.conditions.len(), 1);
        assert_eq!(binding.status.conditions[0].type_, BindingConditionType::Ready);
        assert_eq!(binding.status.conditions[0].status, ConditionStatus::True);
    }
}
