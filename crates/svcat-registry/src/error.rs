use svcat_object_model::ObjectError;
use svcat_object_model::core::GroupResource;
use svcat_object_model::validation::ErrorList;

/// machine readable classification of a failed request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusReason {
    NotFound,
    AlreadyExists,
    Conflict,
    Invalid,
    BadRequest,
    InternalError,
}

impl StatusReason {
    pub fn code(&self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::AlreadyExists | Self::Conflict => 409,
            Self::Invalid => 422,
            Self::BadRequest => 400,
            Self::InternalError => 500,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{resource} {name:?} not found")]
    NotFound { resource: GroupResource, name: String },
    #[error("{resource} {name:?} already exists")]
    AlreadyExists { resource: GroupResource, name: String },
    #[error("Operation cannot be fulfilled on {resource} {name:?}: {reason}")]
    Conflict {
        resource: GroupResource,
        name: String,
        reason: String,
    },
    #[error("{kind} {name:?} is invalid: {}", format_errors(.errors))]
    Invalid {
        kind: String,
        name: String,
        errors: ErrorList,
    },
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("internal error: {0}")]
    Object(#[from] svcat_object_model::ObjectError),
    #[error("internal error: {0}")]
    Internal(String),
}

fn format_errors(errors: &ErrorList) -> String {
    let messages: Vec<String> = errors.iter().map(|err| err.to_string()).collect();
    format!("[{}]", messages.join(", "))
}

impl StoreError {
    pub fn reason(&self) -> StatusReason {
        match self {
            Self::NotFound { .. } => StatusReason::NotFound,
            Self::AlreadyExists { .. } => StatusReason::AlreadyExists,
            Self::Conflict { .. } => StatusReason::Conflict,
            Self::Invalid { .. } => StatusReason::Invalid,
            Self::BadRequest(_) => StatusReason::BadRequest,
            Self::Object(_) | Self::Internal(_) => StatusReason::InternalError,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reason() == StatusReason::NotFound
    }

    pub fn is_conflict(&self) -> bool {
        self.reason() == StatusReason::Conflict
    }

    pub fn is_invalid(&self) -> bool {
        self.reason() == StatusReason::Invalid
    }

    pub fn is_internal(&self) -> bool {
        self.reason() == StatusReason::InternalError
    }

    /// type mismatch, if this error was caused by one
    pub fn object_error(&self) -> Option<&ObjectError> {
        match self {
            Self::Object(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {

    use svcat_object_model::validation::{FieldError, Path};

    use super::*;

    #[test]
    fn test_messages() {
        let resource = GroupResource::new("servicecatalog.k8s.io", "bindings");
        let err = StoreError::NotFound {
            resource: resource.clone(),
            name: "b1".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "bindings.servicecatalog.k8s.io \"b1\" not found"
        );
        assert_eq!(err.reason().code(), 404);

        let err = StoreError::Invalid {
            kind: "Binding".to_owned(),
            name: "b1".to_owned(),
            errors: vec![FieldError::required(
                &Path::new("spec").child("secretName"),
                "",
            )],
        };
        assert_eq!(
            err.to_string(),
            "Binding \"b1\" is invalid: [spec.secretName: Required value]"
        );
        assert!(err.is_invalid());
    }

    #[test]
    fn test_type_mismatch_is_internal() {
        let err: StoreError = ObjectError::TypeMismatch {
            expected: "Binding",
            found: "Test".to_owned(),
        }
        .into();
        assert!(err.is_internal());
        assert!(err.object_error().is_some());
        assert_eq!(err.reason().code(), 500);
    }
}
