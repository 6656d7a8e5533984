pub mod field;
pub mod meta;
pub mod names;

pub use field::{ErrorList, FieldError, ErrorType, Path};
