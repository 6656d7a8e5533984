use thiserror::Error;

/// Failures raised when an object reaches code written for a different kind
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ObjectError {
    #[error("given object is not a {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: String,
    },
    #[error("no kind is registered for the type {kind}")]
    NotRegistered { kind: String },
}
