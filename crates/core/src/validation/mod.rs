//! Schema validation of untyped JSON into the typed models.
//!
//! Validators never stop at the first problem inside an object: every field is checked
//! and each failure becomes an [`Issue`] carrying the JSON path of the offending value.
//! The one exception is the entry discriminant, which is read first and ends validation
//! immediately when it is missing or unknown.
//!
//! - [`EntrySchema`]: `type`-tagged clinical entries.
//! - [`PatientSchema`]: patient registration.

mod entry;
mod fields;
mod patient;

pub use entry::EntrySchema;
pub use patient::PatientSchema;

use serde::Serialize;
use std::fmt;
use utoipa::openapi::{ObjectBuilder, OneOfBuilder, RefOr, Schema, SchemaType};
use utoipa::ToSchema;

/// One step in the path to an offending value: an object key or an array index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_owned())
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

impl<'s> ToSchema<'s> for PathSegment {
    fn schema() -> (&'s str, RefOr<Schema>) {
        (
            "PathSegment",
            OneOfBuilder::new()
                .item(ObjectBuilder::new().schema_type(SchemaType::String))
                .item(ObjectBuilder::new().schema_type(SchemaType::Integer))
                .description(Some("object key or array index"))
                .into(),
        )
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => f.write_str(key),
            PathSegment::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Machine-readable category of an [`Issue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// Missing value, or a value of the wrong JSON type.
    InvalidType,
    /// The entry `type` tag is missing or not a known variant.
    InvalidUnionDiscriminator,
    /// A string that does not have the required format (dates).
    InvalidString,
    /// A value outside a closed set (ratings, genders).
    InvalidEnumValue,
    /// Blank text.
    TooSmall,
    /// Keys that no schema names, under [`crate::UnknownFieldPolicy::Reject`].
    UnrecognizedKeys,
    /// Cross-field rules.
    Custom,
}

/// A single field-level validation failure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Issue {
    pub code: IssueCode,
    pub path: Vec<PathSegment>,
    pub message: String,
}

impl Issue {
    /// Dotted form of the path, or `<root>` for the value itself.
    pub fn path_string(&self) -> String {
        if self.path.is_empty() {
            return "<root>".into();
        }
        self.path
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// True when any segment of the path is the key `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.path
            .iter()
            .any(|segment| matches!(segment, PathSegment::Key(key) if key == field))
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path_string(), self.message)
    }
}

/// Rejected input, with at least one [`Issue`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    issues: Vec<Issue>,
}

impl ValidationError {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        debug_assert!(!issues.is_empty(), "validation error without issues");
        Self { issues }
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<Issue> {
        self.issues
    }

    /// True when some issue points at the key `field`.
    pub fn mentions(&self, field: &str) -> bool {
        self.issues.iter().any(|issue| issue.mentions(field))
    }

    /// Prefix every issue path, used when a nested document is validated on its own.
    pub(crate) fn nested_under(mut self, prefix: &[PathSegment]) -> Self {
        for issue in &mut self.issues {
            let mut path = prefix.to_vec();
            path.append(&mut issue.path);
            issue.path = path;
        }
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("validation failed")?;
        for (i, issue) in self.issues.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(path: Vec<PathSegment>) -> Issue {
        Issue {
            code: IssueCode::InvalidType,
            path,
            message: "Required".into(),
        }
    }

    #[test]
    fn path_string_joins_keys_and_indices() {
        assert_eq!(issue(vec![]).path_string(), "<root>");
        assert_eq!(
            issue(vec!["diagnosisCodes".into(), 2usize.into()]).path_string(),
            "diagnosisCodes.2"
        );
    }

    #[test]
    fn display_lists_every_issue() {
        let err = ValidationError::new(vec![
            issue(vec!["discharge".into()]),
            issue(vec!["specialist".into()]),
        ]);
        assert_eq!(
            err.to_string(),
            "validation failed: discharge: Required; specialist: Required"
        );
        assert!(err.mentions("discharge"));
        assert!(!err.mentions("date"));
    }

    #[test]
    fn issues_serialise_with_mixed_paths() {
        let value =
            serde_json::to_value(issue(vec!["entries".into(), 0usize.into(), "date".into()]))
                .unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "code": "invalid_type",
                "path": ["entries", 0, "date"],
                "message": "Required"
            })
        );
    }

    #[test]
    fn nested_under_prefixes_paths() {
        let err = ValidationError::new(vec![issue(vec!["date".into()])])
            .nested_under(&["entries".into(), 1usize.into()]);
        assert_eq!(err.issues()[0].path_string(), "entries.1.date");
    }
}
