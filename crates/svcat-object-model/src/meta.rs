use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Serialize, Deserialize};

use svcat_types::{Name, NameSpace, ResourceVersion, Uid};

use crate::core::Spec;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeMeta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub api_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
}

impl TypeMeta {
    pub fn of<S: Spec>() -> Self {
        Self {
            api_version: S::api_version(),
            kind: S::kind(),
        }
    }
}

/// Identity metadata. System fields (uid, version, timestamps) are owned by the store.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ObjectMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: Name,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub generate_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub namespace: NameSpace,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub uid: Uid,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: ResourceVersion,
    #[serde(skip_serializing_if = "is_zero")]
    pub generation: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_timestamp: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deletion_grace_period_seconds: Option<i64>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
}

fn is_zero(value: &i64) -> bool {
    *value == 0
}

impl ObjectMeta {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn named<S: Into<String>>(name: S, namespace: S) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            ..Default::default()
        }
    }

    pub fn set_labels<T: Into<String>>(mut self, labels: Vec<(T, T)>) -> Self {
        for (key, value) in labels {
            self.labels.insert(key.into(), value.into());
        }
        self
    }

    pub fn is_being_deleted(&self) -> bool {
        self.deletion_timestamp.is_some()
    }

    pub fn has_resource_version(&self) -> bool {
        !self.resource_version.is_empty()
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListMeta {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub resource_version: ResourceVersion,
}

/// A resource instance: identity metadata plus desired and observed state
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct ApiObject<S: Spec> {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: S,
    #[serde(default)]
    pub status: S::Status,
}

impl<S: Spec> ApiObject<S> {
    pub fn new<N: Into<String>>(name: N, spec: S) -> Self {
        Self {
            type_meta: TypeMeta::of::<S>(),
            metadata: ObjectMeta::new(name),
            spec,
            status: S::Status::default(),
        }
    }

    /// empty instance carrying the type information of `S`
    pub fn empty() -> Self {
        Self {
            type_meta: TypeMeta::of::<S>(),
            ..Default::default()
        }
    }

    pub fn with_metadata(mut self, metadata: ObjectMeta) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_status(mut self, status: S::Status) -> Self {
        self.status = status;
        self
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", bound = "")]
pub struct ApiObjectList<S: Spec> {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ListMeta,
    #[serde(default)]
    pub items: Vec<ApiObject<S>>,
}

impl<S: Spec> ApiObjectList<S> {
    pub fn new(items: Vec<ApiObject<S>>, resource_version: ResourceVersion) -> Self {
        Self {
            type_meta: TypeMeta {
                api_version: S::api_version(),
                kind: format!("{}List", S::kind()),
            },
            metadata: ListMeta { resource_version },
            items,
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![], ResourceVersion::default())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod test {

    use crate::fixture::{TestSpec, TestStatus, test_object};

    use super::*;

    #[test]
    fn test_object_yaml_shape() {
        let obj = test_object("t1", 2).with_status(TestStatus { up: true });
        let value = serde_json::to_value(&obj).expect("serialize");
        assert_eq!(value["apiVersion"], "test.svcat/v1");
        assert_eq!(value["kind"], "Test");
        assert_eq!(value["metadata"]["name"], "t1");
        assert_eq!(value["spec"]["replica"], 2);

        let decoded: ApiObject<TestSpec> = serde_json::from_value(value).expect("deserialize");
        assert_eq!(decoded, obj);
    }

    #[test]
    fn test_list_kind() {
        let list = ApiObjectList::<TestSpec>::empty();
        assert_eq!(list.type_meta.kind, "TestList");
        assert!(list.is_empty());
    }

    #[test]
    fn test_set_labels() {
        let meta = ObjectMeta::new("t1").set_labels(vec![("app", "foo"), ("tier", "db")]);
        assert_eq!(meta.labels.get("app").map(String::as_str), Some("foo"));
        assert_eq!(meta.labels.len(), 2);
        assert!(!meta.has_resource_version());
    }
}
