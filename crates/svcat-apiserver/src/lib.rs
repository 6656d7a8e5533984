pub mod apis;
pub mod registry;
pub mod config;

mod init;

pub use init::{ServiceCatalogRegistry, init_tracing};
