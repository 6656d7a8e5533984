use std::fmt;

/// Path to a field, rendered as `spec.serviceInstanceRef.name` or `status.conditions[0]`
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Path(String);

impl Path {
    pub fn new(root: &str) -> Self {
        Self(root.to_owned())
    }

    pub fn child(&self, name: &str) -> Self {
        if self.0.is_empty() {
            Self(name.to_owned())
        } else {
            Self(format!("{}.{}", self.0, name))
        }
    }

    pub fn index(&self, index: usize) -> Self {
        Self(format!("{}[{}]", self.0, index))
    }

    pub fn key(&self, key: &str) -> Self {
        Self(format!("{}[{}]", self.0, key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    NotFound,
    Required,
    Duplicate,
    Invalid,
    NotSupported,
    Forbidden,
    TooLong,
    Internal,
}

impl ErrorType {
    /// offending value is meaningless for these
    fn omits_value(&self) -> bool {
        matches!(
            self,
            Self::Required | Self::Forbidden | Self::TooLong | Self::Internal
        )
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NotFound => "Not found",
            Self::Required => "Required value",
            Self::Duplicate => "Duplicate value",
            Self::Invalid => "Invalid value",
            Self::NotSupported => "Unsupported value",
            Self::Forbidden => "Forbidden",
            Self::TooLong => "Too long",
            Self::Internal => "Internal error",
        };
        write!(f, "{text}")
    }
}

/// A validation failure scoped to a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub error_type: ErrorType,
    pub field: String,
    pub bad_value: String,
    pub detail: String,
}

pub type ErrorList = Vec<FieldError>;

impl FieldError {
    fn new(error_type: ErrorType, path: &Path, bad_value: String, detail: String) -> Self {
        Self {
            error_type,
            field: path.to_string(),
            bad_value,
            detail,
        }
    }

    pub fn not_found(path: &Path, value: impl fmt::Display) -> Self {
        Self::new(ErrorType::NotFound, path, value.to_string(), String::new())
    }

    pub fn required(path: &Path, detail: impl Into<String>) -> Self {
        Self::new(ErrorType::Required, path, String::new(), detail.into())
    }

    pub fn duplicate(path: &Path, value: impl fmt::Display) -> Self {
        Self::new(ErrorType::Duplicate, path, value.to_string(), String::new())
    }

    pub fn invalid(path: &Path, value: impl fmt::Display, detail: impl Into<String>) -> Self {
        Self::new(ErrorType::Invalid, path, value.to_string(), detail.into())
    }

    pub fn not_supported(path: &Path, value: impl fmt::Display, valid_values: &[&str]) -> Self {
        let detail = if valid_values.is_empty() {
            String::new()
        } else {
            let quoted: Vec<String> = valid_values.iter().map(|v| format!("{v:?}")).collect();
            format!("supported values: {}", quoted.join(", "))
        };
        Self::new(ErrorType::NotSupported, path, value.to_string(), detail)
    }

    pub fn forbidden(path: &Path, detail: impl Into<String>) -> Self {
        Self::new(ErrorType::Forbidden, path, String::new(), detail.into())
    }

    pub fn too_long(path: &Path, max_length: usize) -> Self {
        Self::new(
            ErrorType::TooLong,
            path,
            String::new(),
            format!("must have at most {max_length} characters"),
        )
    }

    pub fn internal(path: &Path, detail: impl Into<String>) -> Self {
        Self::new(ErrorType::Internal, path, String::new(), detail.into())
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error_type)?;
        if !self.error_type.omits_value() {
            write!(f, ": {:?}", self.bad_value)?;
        }
        if !self.detail.is_empty() {
            write!(f, ": {}", self.detail)?;
        }
        Ok(())
    }
}

/// rejects any change between `new` and `old`
pub fn validate_immutable_field<T>(new: &T, old: &T, path: &Path) -> ErrorList
where
    T: PartialEq + fmt::Debug,
{
    if new == old {
        vec![]
    } else {
        vec![FieldError::invalid(
            path,
            format!("{new:?}"),
            "field is immutable",
        )]
    }
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_path_rendering() {
        let path = Path::new("spec").child("serviceInstanceRef").child("name");
        assert_eq!(path.as_str(), "spec.serviceInstanceRef.name");
        assert_eq!(
            Path::new("status").child("conditions").index(2).to_string(),
            "status.conditions[2]"
        );
        assert_eq!(
            Path::new("metadata").child("labels").key("app").to_string(),
            "metadata.labels[app]"
        );
    }

    #[test]
    fn test_error_display() {
        let path = Path::new("spec").child("secretName");
        assert_eq!(
            FieldError::invalid(&path, "Bad_Name", "must be lower case").to_string(),
            "spec.secretName: Invalid value: \"Bad_Name\": must be lower case"
        );
        assert_eq!(
            FieldError::required(&Path::new("metadata").child("name"), "").to_string(),
            "metadata.name: Required value"
        );
        assert_eq!(
            FieldError::not_supported(&Path::new("type"), "Gone", &["Ready"]).to_string(),
            "type: Unsupported value: \"Gone\": supported values: \"Ready\""
        );
    }

    #[test]
    fn test_immutable_field() {
        let path = Path::new("metadata").child("name");
        assert!(validate_immutable_field(&"a", &"a", &path).is_empty());
        let errors = validate_immutable_field(&"a", &"b", &path);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].detail, "field is immutable");
    }
}
