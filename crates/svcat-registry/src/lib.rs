pub mod context;
pub mod scheme;
pub mod names;
pub mod rest;
pub mod key;
pub mod predicate;
pub mod storage;
pub mod store;
pub mod options;

mod error;

pub use error::{StoreError, StatusReason};
