//!
//! # Startup
//!
//! Builds the type scheme, the strategies and the storage of every resource.
//!
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use svcat_registry::names::SimpleNameGenerator;
use svcat_registry::scheme::Scheme;
use svcat_registry::store::Store;
use svcat_types::defaults::BINDINGS_RESOURCE;

use crate::apis::servicecatalog::{BindingSpec, add_to_scheme};
use crate::config::ApiServerConfig;
use crate::registry::binding::{BindingStrategy, storage};

/// log to stderr, filtered by `RUST_LOG`
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Resource registries of a running api server
#[derive(Debug)]
pub struct ServiceCatalogRegistry {
    scheme: Arc<Scheme>,
    bindings: Store<BindingSpec>,
}

impl ServiceCatalogRegistry {
    pub fn start(config: &ApiServerConfig) -> Result<Self> {
        let mut scheme = Scheme::new();
        add_to_scheme(&mut scheme);
        let scheme = Arc::new(scheme);

        let strategy = Arc::new(BindingStrategy::new(
            scheme.clone(),
            Arc::new(SimpleNameGenerator),
        ));
        let bindings = storage::new_storage(&config.rest_options(BINDINGS_RESOURCE)?, strategy)
            .context("creating binding storage")?;

        info!(
            resources = ?[bindings.qualified_resource.to_string()],
            "service catalog registry started"
        );
        Ok(Self { scheme, bindings })
    }

    pub fn scheme(&self) -> &Scheme {
        &self.scheme
    }

    pub fn bindings(&self) -> &Store<BindingSpec> {
        &self.bindings
    }

    pub fn shutdown(&self) {
        self.bindings.destroy();
        info!("service catalog registry stopped");
    }
}

#[cfg(test)]
mod test {

    use svcat_registry::context::RequestContext;

    use crate::apis::servicecatalog::{Binding, BindingSpec};

    use super::*;

    #[fluvio_future::test]
    async fn test_start_registry() {
        init_tracing();

        let registry = ServiceCatalogRegistry::start(&ApiServerConfig::default()).expect("start");
        assert!(registry.scheme().is_registered::<BindingSpec>());

        let ctx = RequestContext::new();
        let mut binding = Binding::new("", BindingSpec::new("db", "db-secret"));
        binding.metadata.generate_name = "db-binding-".to_owned();
        let created = registry
            .bindings()
            .create(&ctx, binding)
            .await
            .expect("create");
        assert!(created.name().starts_with("db-binding-"));

        registry.shutdown();
        assert!(registry.bindings().get(&ctx, created.name()).await.is_err());
    }
}
