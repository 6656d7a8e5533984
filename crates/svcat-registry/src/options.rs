use svcat_object_model::{fields, labels};

use crate::StoreError;
use crate::storage::{StorageConfig, StorageDecorator, UndecoratedStorage};

/// Selection applied by list and watch
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ListOptions {
    pub label_selector: labels::Selector,
    pub field_selector: fields::Selector,
}

impl ListOptions {
    /// parse selectors in their query string form, empty strings select everything
    pub fn parse(label_selector: &str, field_selector: &str) -> Result<Self, StoreError> {
        let label_selector = label_selector
            .parse()
            .map_err(|err| StoreError::BadRequest(format!("invalid label selector: {err}")))?;
        let field_selector = field_selector
            .parse()
            .map_err(|err| StoreError::BadRequest(format!("invalid field selector: {err}")))?;
        Ok(Self {
            label_selector,
            field_selector,
        })
    }

    pub fn with_labels(mut self, selector: labels::Selector) -> Self {
        self.label_selector = selector;
        self
    }

    pub fn with_fields(mut self, selector: fields::Selector) -> Self {
        self.field_selector = selector;
        self
    }
}

/// What a resource registry needs to build its storage
#[derive(Debug, Clone)]
pub struct RestOptions<D: StorageDecorator = UndecoratedStorage> {
    pub storage_config: StorageConfig,
    pub decorator: D,
    pub resource_prefix: String,
}

impl RestOptions<UndecoratedStorage> {
    pub fn undecorated(storage_config: StorageConfig, resource_prefix: impl Into<String>) -> Self {
        Self {
            storage_config,
            decorator: UndecoratedStorage,
            resource_prefix: resource_prefix.into(),
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_parse_list_options() {
        let options = ListOptions::parse("app=foo", "metadata.name=b1").expect("parse");
        assert!(!options.label_selector.is_empty());
        assert_eq!(
            options.field_selector.required_value("metadata.name"),
            Some("b1")
        );

        let options = ListOptions::parse("", "").expect("parse");
        assert_eq!(options, ListOptions::default());

        let err = ListOptions::parse("app in (foo", "").expect_err("malformed");
        assert!(matches!(err, StoreError::BadRequest(_)));
    }
}
