//!
//! # Defaults
//!
//! Well known names and limits shared by the registry crates.
//!

// API group
pub const SERVICE_CATALOG_GROUP: &str = "servicecatalog.k8s.io";
pub const SERVICE_CATALOG_VERSION: &str = "v1alpha1";

// Resources
pub const BINDINGS_RESOURCE: &str = "bindings";

// Storage
pub const DEFAULT_WATCH_CACHE_CAPACITY: usize = 1000;
pub const KEY_SEPARATOR: char = '/';

// Names
pub const MAX_NAME_LENGTH: usize = 63;
pub const MAX_GENERATED_NAME_RANDOM_LENGTH: usize = 5;
pub const MAX_GENERATED_NAME_LENGTH: usize = MAX_NAME_LENGTH - MAX_GENERATED_NAME_RANDOM_LENGTH;

// Config
pub const CONFIG_FILE_ENV: &str = "SVCAT_CONFIG";
