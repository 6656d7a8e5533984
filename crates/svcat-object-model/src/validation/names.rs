//! Syntax checks for names, label keys and label values.
//! Each check returns the list of violations, empty when valid.

use once_cell::sync::Lazy;
use regex::Regex;

const DNS1123_LABEL_FMT: &str = "[a-z0-9]([-a-z0-9]*[a-z0-9])?";
const DNS1123_LABEL_MAX_LENGTH: usize = 63;
const DNS1123_SUBDOMAIN_MAX_LENGTH: usize = 253;
const QUALIFIED_NAME_FMT: &str = "([A-Za-z0-9][-A-Za-z0-9_.]*)?[A-Za-z0-9]";
const QUALIFIED_NAME_MAX_LENGTH: usize = 63;
const LABEL_VALUE_MAX_LENGTH: usize = 63;

static DNS1123_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{DNS1123_LABEL_FMT}$")).expect("valid regex"));

static DNS1123_SUBDOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{DNS1123_LABEL_FMT}(\\.{DNS1123_LABEL_FMT})*$")).expect("valid regex")
});

static QUALIFIED_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(&format!("^{QUALIFIED_NAME_FMT}$")).expect("valid regex"));

fn max_len_error(length: usize) -> String {
    format!("must be no more than {length} characters")
}

pub fn is_dns1123_label(value: &str) -> Vec<String> {
    let mut errors = vec![];
    if value.len() > DNS1123_LABEL_MAX_LENGTH {
        errors.push(max_len_error(DNS1123_LABEL_MAX_LENGTH));
    }
    if !DNS1123_LABEL.is_match(value) {
        errors.push(
            "a DNS-1123 label must consist of lower case alphanumeric characters or '-', \
             and must start and end with an alphanumeric character"
                .to_owned(),
        );
    }
    errors
}

pub fn is_dns1123_subdomain(value: &str) -> Vec<String> {
    let mut errors = vec![];
    if value.len() > DNS1123_SUBDOMAIN_MAX_LENGTH {
        errors.push(max_len_error(DNS1123_SUBDOMAIN_MAX_LENGTH));
    }
    if !DNS1123_SUBDOMAIN.is_match(value) {
        errors.push(
            "a DNS-1123 subdomain must consist of lower case alphanumeric characters, '-' or '.', \
             and must start and end with an alphanumeric character"
                .to_owned(),
        );
    }
    errors
}

/// `[prefix/]name` where prefix is a DNS-1123 subdomain
pub fn is_qualified_name(value: &str) -> Vec<String> {
    let mut errors = vec![];
    let name = match value.split_once('/') {
        None => value,
        Some((prefix, name)) => {
            if prefix.is_empty() {
                errors.push("prefix part must be non-empty".to_owned());
            } else {
                errors.extend(
                    is_dns1123_subdomain(prefix)
                        .into_iter()
                        .map(|msg| format!("prefix part {msg}")),
                );
            }
            if name.contains('/') {
                errors.push("a qualified name must contain at most one '/'".to_owned());
            }
            name
        }
    };

    if name.is_empty() {
        errors.push("name part must be non-empty".to_owned());
    } else {
        if name.len() > QUALIFIED_NAME_MAX_LENGTH {
            errors.push(format!("name part {}", max_len_error(QUALIFIED_NAME_MAX_LENGTH)));
        }
        if !QUALIFIED_NAME.is_match(name) {
            errors.push(
                "name part must consist of alphanumeric characters, '-', '_' or '.', \
                 and must start and end with an alphanumeric character"
                    .to_owned(),
            );
        }
    }
    errors
}

pub fn is_valid_label_value(value: &str) -> Vec<String> {
    let mut errors = vec![];
    if value.len() > LABEL_VALUE_MAX_LENGTH {
        errors.push(max_len_error(LABEL_VALUE_MAX_LENGTH));
    }
    if !value.is_empty() && !QUALIFIED_NAME.is_match(value) {
        errors.push(
            "a valid label must be an empty string or consist of alphanumeric characters, \
             '-', '_' or '.', and must start and end with an alphanumeric character"
                .to_owned(),
        );
    }
    errors
}

/// names that can be used as a single segment of a storage path
pub fn is_valid_path_segment_name(name: &str) -> Vec<String> {
    if name == "." || name == ".." {
        return vec![format!("may not be '{name}'")];
    }
    ["/", "%"]
        .into_iter()
        .filter(|illegal| name.contains(illegal))
        .map(|illegal| format!("may not contain '{illegal}'"))
        .collect()
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_dns1123_label() {
        assert!(is_dns1123_label("my-binding-1").is_empty());
        assert!(!is_dns1123_label("My-Binding").is_empty());
        assert!(!is_dns1123_label("-front").is_empty());
        assert!(!is_dns1123_label("a.b").is_empty());
        assert!(!is_dns1123_label(&"a".repeat(64)).is_empty());
    }

    #[test]
    fn test_dns1123_subdomain() {
        assert!(is_dns1123_subdomain("db.example.com").is_empty());
        assert!(!is_dns1123_subdomain("db..example").is_empty());
        assert!(!is_dns1123_subdomain("").is_empty());
        assert!(!is_dns1123_subdomain(&"a".repeat(254)).is_empty());
    }

    #[test]
    fn test_qualified_name() {
        assert!(is_qualified_name("app").is_empty());
        assert!(is_qualified_name("servicecatalog.k8s.io/Owner_Ref").is_empty());
        assert!(!is_qualified_name("/app").is_empty());
        assert!(!is_qualified_name("a/b/c").is_empty());
        assert!(!is_qualified_name("bad key").is_empty());
    }

    #[test]
    fn test_label_value() {
        assert!(is_valid_label_value("").is_empty());
        assert!(is_valid_label_value("Foo.bar-1").is_empty());
        assert!(!is_valid_label_value("in valid").is_empty());
    }

    #[test]
    fn test_path_segment() {
        assert!(is_valid_path_segment_name("b1").is_empty());
        assert_eq!(is_valid_path_segment_name("..").len(), 1);
        assert_eq!(is_valid_path_segment_name("a/b%c").len(), 2);
    }
}
