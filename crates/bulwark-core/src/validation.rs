use std::fmt;

use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

/// Key under which `validator` reports struct-level (schema) errors
const SCHEMA_KEY: &str = "__all__";

/// One step in the path to an invalid field
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// A single schema-validation problem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: Vec<PathSegment>, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }

    /// Path segments joined with `.`, e.g. `items.0.name`
    pub fn dotted_path(&self) -> String {
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Client-facing form of a [`ValidationIssue`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueDetail {
    pub path: String,
    pub message: String,
}

/// Structured failure reported by the schema validator
///
/// Issues keep the order they were added in. When built from
/// `validator::ValidationErrors` (which is hash-ordered) they are sorted by
/// path so responses are deterministic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request validation failed with {} issue(s)", .issues.len())]
pub struct ValidationFailure {
    issues: Vec<ValidationIssue>,
}

impl ValidationFailure {
    pub const fn new(issues: Vec<ValidationIssue>) -> Self {
        Self { issues }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Issues flattened to `{path, message}` pairs, in order
    pub fn details(&self) -> Vec<IssueDetail> {
        self.issues
            .iter()
            .map(|issue| IssueDetail {
                path: issue.dotted_path(),
                message: issue.message.clone(),
            })
            .collect()
    }
}

impl From<ValidationErrors> for ValidationFailure {
    fn from(errors: ValidationErrors) -> Self {
        let mut issues = Vec::new();
        collect_issues(&errors, &mut Vec::new(), &mut issues);
        issues.sort_by(|a, b| a.path.cmp(&b.path));
        Self { issues }
    }
}

fn collect_issues(errors: &ValidationErrors, prefix: &mut Vec<PathSegment>, out: &mut Vec<ValidationIssue>) {
    for (key, kind) in errors.errors() {
        let key = key.to_string();
        let pushed = key != SCHEMA_KEY;
        if pushed {
            prefix.push(PathSegment::Key(key));
        }

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    let message = error
                        .message
                        .as_ref()
                        .map_or_else(|| format!("failed `{}` validation", error.code), ToString::to_string);
                    out.push(ValidationIssue::new(prefix.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_issues(nested, prefix, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    prefix.push(PathSegment::Index(*index));
                    collect_issues(nested, prefix, out);
                    prefix.pop();
                }
            }
        }

        if pushed {
            prefix.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;

    #[derive(Validate)]
    struct Item {
        #[validate(length(min = 1, message = "Required"))]
        name: String,
    }

    #[derive(Validate)]
    struct Order {
        #[validate(email(message = "Invalid email"))]
        email: String,
        #[validate(range(min = 1))]
        quantity: u32,
        #[validate(nested)]
        items: Vec<Item>,
    }

    #[test]
    fn single_issue_detail() {
        let failure = ValidationFailure::new(vec![ValidationIssue::new(
            vec![PathSegment::Key("email".to_owned())],
            "Required",
        )]);
        assert_eq!(
            failure.details(),
            vec![IssueDetail {
                path: "email".to_owned(),
                message: "Required".to_owned(),
            }]
        );
    }

    #[test]
    fn nested_paths_are_dotted() {
        let issue = ValidationIssue::new(
            vec![
                PathSegment::Key("items".to_owned()),
                PathSegment::Index(2),
                PathSegment::Key("name".to_owned()),
            ],
            "Required",
        );
        assert_eq!(issue.dotted_path(), "items.2.name");
    }

    #[test]
    fn converts_validator_errors() {
        let order = Order {
            email: "not-an-email".to_owned(),
            quantity: 0,
            items: vec![
                Item { name: "ok".to_owned() },
                Item { name: String::new() },
            ],
        };
        let failure = ValidationFailure::from(order.validate().unwrap_err());
        let details = failure.details();

        let paths: Vec<&str> = details.iter().map(|d| d.path.as_str()).collect();
        assert_eq!(paths, ["email", "items.1.name", "quantity"]);
        assert_eq!(details[0].message, "Invalid email");
        assert_eq!(details[1].message, "Required");
        assert_eq!(details[2].message, "failed `range` validation");
    }
}
