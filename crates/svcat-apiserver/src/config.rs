//!
//! # Api server configuration
//!
//! Loaded from TOML. Every field is optional.
//!
//! ```toml
//! [storage]
//! watchCapacity = 1000
//!
//! [resources]
//! bindings = "servicecatalog.k8s.io/bindings"
//! ```
use std::env;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

use svcat_registry::options::RestOptions;
use svcat_registry::storage::{StorageConfig, UndecoratedStorage};
use svcat_types::config_file::SaveLoadConfig;
use svcat_types::defaults::{BINDINGS_RESOURCE, CONFIG_FILE_ENV, SERVICE_CATALOG_GROUP};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiServerConfig {
    pub storage: StorageConfig,
    pub resources: ResourcePrefixes,
}

/// storage prefix of each resource, without the leading separator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResourcePrefixes {
    pub bindings: String,
}

impl Default for ResourcePrefixes {
    fn default() -> Self {
        Self {
            bindings: format!("{SERVICE_CATALOG_GROUP}/{BINDINGS_RESOURCE}"),
        }
    }
}

impl ApiServerConfig {
    /// load from `path`, or from the file named by `SVCAT_CONFIG`, or use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from(path)
                .with_context(|| format!("loading config from {}", path.display()));
        }
        match env::var(CONFIG_FILE_ENV) {
            Ok(path) if !path.is_empty() => {
                debug!(%path, "config from environment");
                Self::load_from(&path).with_context(|| format!("loading config from {path}"))
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn rest_options(&self, resource: &str) -> Result<RestOptions<UndecoratedStorage>> {
        let prefix = match resource {
            BINDINGS_RESOURCE => &self.resources.bindings,
            other => return Err(anyhow!("unknown resource: {other}")),
        };
        if prefix.is_empty() {
            return Err(anyhow!("storage prefix of {resource} is empty"));
        }
        Ok(RestOptions::undecorated(
            self.storage.clone(),
            prefix.as_str(),
        ))
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiServerConfig::load_str("").expect("parse");
        assert_eq!(config, ApiServerConfig::default());
        assert_eq!(config.resources.bindings, "servicecatalog.k8s.io/bindings");
        assert_eq!(config.storage.watch_capacity, 1000);
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("apiserver.toml");
        std::fs::write(
            &path,
            "[storage]\nwatchCapacity = 5\n\n[resources]\nbindings = \"svcat/bindings\"\n",
        )
        .expect("write");

        let config = ApiServerConfig::load(Some(path.as_path())).expect("load");
        assert_eq!(config.storage.watch_capacity, 5);

        let opts = config.rest_options("bindings").expect("bindings");
        assert_eq!(opts.resource_prefix, "svcat/bindings");
        assert_eq!(opts.storage_config.watch_capacity, 5);
        assert!(config.rest_options("instances").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("apiserver.toml");
        let mut config = ApiServerConfig::default();
        config.storage.watch_capacity = 42;
        config.save_to(&path).expect("save");

        assert_eq!(ApiServerConfig::load(Some(path.as_path())).expect("load"), config);
        assert!(ApiServerConfig::load(Some(dir.path().join("missing.toml").as_path())).is_err());
    }
}
