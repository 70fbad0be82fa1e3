//! Field readers shared by the schemas.
//!
//! Each reader checks one key of a JSON object, records an [`Issue`] on failure and
//! returns `None`, so a schema can read every field before deciding whether the whole
//! value is valid.

use super::{Issue, IssueCode, PathSegment, ValidationError};
use patientor_types::{IsoDate, NonEmptyText};
use serde_json::{Map, Value};

/// Accumulates issues while a value is being read.
#[derive(Debug, Default)]
pub(crate) struct Collector {
    issues: Vec<Issue>,
}

impl Collector {
    pub(crate) fn push(
        &mut self,
        code: IssueCode,
        path: Vec<PathSegment>,
        message: impl Into<String>,
    ) {
        self.issues.push(Issue {
            code,
            path,
            message: message.into(),
        });
    }

    pub(crate) fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub(crate) fn into_error(mut self) -> ValidationError {
        if self.issues.is_empty() {
            self.push(IssueCode::Custom, Vec::new(), "Invalid input");
        }
        ValidationError::new(self.issues)
    }

    /// `Ok` only when a value was produced and nothing was reported along the way.
    pub(crate) fn finish<T>(self, value: Option<T>) -> Result<T, ValidationError> {
        match value {
            Some(value) if self.is_clean() => Ok(value),
            _ => Err(self.into_error()),
        }
    }
}

/// JSON type name used in messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Value as shown in enum messages: bare for strings, JSON text otherwise.
fn received(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Read access to one JSON object, positioned at `path` within the document.
#[derive(Clone, Debug)]
pub(crate) struct Fields<'v> {
    object: &'v Map<String, Value>,
    path: Vec<PathSegment>,
}

impl<'v> Fields<'v> {
    pub(crate) fn object_at(
        value: &'v Value,
        path: Vec<PathSegment>,
        c: &mut Collector,
    ) -> Option<Self> {
        match value {
            Value::Object(object) => Some(Self { object, path }),
            other => {
                c.push(
                    IssueCode::InvalidType,
                    path,
                    format!("Expected object, received {}", kind_of(other)),
                );
                None
            }
        }
    }

    pub(crate) fn path_to(&self, key: &str) -> Vec<PathSegment> {
        let mut path = self.path.clone();
        path.push(key.into());
        path
    }

    pub(crate) fn get(&self, key: &str) -> Option<&'v Value> {
        self.object.get(key)
    }

    fn required(&self, key: &str, c: &mut Collector) -> Option<&'v Value> {
        let value = self.get(key);
        if value.is_none() {
            c.push(IssueCode::InvalidType, self.path_to(key), "Required");
        }
        value
    }

    fn string(&self, key: &str, c: &mut Collector) -> Option<&'v str> {
        match self.required(key, c)? {
            Value::String(s) => Some(s),
            other => {
                c.push(
                    IssueCode::InvalidType,
                    self.path_to(key),
                    format!("Expected string, received {}", kind_of(other)),
                );
                None
            }
        }
    }

    /// Required string with at least one non-whitespace character.
    pub(crate) fn text(&self, key: &str, c: &mut Collector) -> Option<NonEmptyText> {
        let raw = self.string(key, c)?;
        match NonEmptyText::new(raw) {
            Ok(text) => Some(text),
            Err(_) => {
                c.push(
                    IssueCode::TooSmall,
                    self.path_to(key),
                    "String must contain at least 1 non-whitespace character(s)",
                );
                None
            }
        }
    }

    /// Required `YYYY-MM-DD` calendar date.
    pub(crate) fn date(&self, key: &str, c: &mut Collector) -> Option<IsoDate> {
        let raw = self.string(key, c)?;
        match IsoDate::parse(raw) {
            Ok(date) => Some(date),
            Err(e) => {
                tracing::debug!(field = key, error = %e, "rejected date");
                c.push(IssueCode::InvalidString, self.path_to(key), "Invalid date");
                None
            }
        }
    }

    /// Optional array of strings. The outer `None` means the field was present but invalid.
    pub(crate) fn optional_string_list(
        &self,
        key: &str,
        c: &mut Collector,
    ) -> Option<Option<Vec<String>>> {
        let Some(items) = self.optional_array(key, c)? else {
            return Some(None);
        };

        let mut out = Vec::with_capacity(items.len());
        let mut ok = true;
        for (i, item) in items.iter().enumerate() {
            match item {
                Value::String(s) => out.push(s.clone()),
                other => {
                    let mut path = self.path_to(key);
                    path.push(i.into());
                    c.push(
                        IssueCode::InvalidType,
                        path,
                        format!("Expected string, received {}", kind_of(other)),
                    );
                    ok = false;
                }
            }
        }
        ok.then_some(Some(out))
    }

    /// Optional array. The outer `None` means the field was present but not an array.
    pub(crate) fn optional_array(
        &self,
        key: &str,
        c: &mut Collector,
    ) -> Option<Option<&'v [Value]>> {
        match self.get(key) {
            None => Some(None),
            Some(Value::Array(items)) => Some(Some(items.as_slice())),
            Some(other) => {
                c.push(
                    IssueCode::InvalidType,
                    self.path_to(key),
                    format!("Expected array, received {}", kind_of(other)),
                );
                None
            }
        }
    }

    /// Required nested object.
    pub(crate) fn nested(&self, key: &str, c: &mut Collector) -> Option<Fields<'v>> {
        let value = self.required(key, c)?;
        Fields::object_at(value, self.path_to(key), c)
    }

    /// Optional nested object. The outer `None` means the field was present but invalid.
    pub(crate) fn optional_nested(
        &self,
        key: &str,
        c: &mut Collector,
    ) -> Option<Option<Fields<'v>>> {
        match self.get(key) {
            None => Some(None),
            Some(value) => Fields::object_at(value, self.path_to(key), c).map(Some),
        }
    }

    /// Required value drawn from a closed set.
    ///
    /// `expected` lists the accepted values for the message, e.g. `0 | 1 | 2 | 3`.
    pub(crate) fn choice<T>(
        &self,
        key: &str,
        c: &mut Collector,
        expected: &str,
        parse: impl Fn(&Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.required(key, c)?;
        let parsed = parse(value);
        if parsed.is_none() {
            c.push(
                IssueCode::InvalidEnumValue,
                self.path_to(key),
                format!(
                    "Invalid enum value. Expected {expected}, received '{}'",
                    received(value)
                ),
            );
        }
        parsed
    }

    /// Report keys not listed in `allowed` as a single issue at this object.
    pub(crate) fn reject_unknown(&self, allowed: &[&str], c: &mut Collector) {
        let unknown: Vec<String> = self
            .object
            .keys()
            .filter(|key| !allowed.contains(&key.as_str()))
            .map(|key| format!("'{key}'"))
            .collect();

        if !unknown.is_empty() {
            c.push(
                IssueCode::UnrecognizedKeys,
                self.path.clone(),
                format!("Unrecognized key(s) in object: {}", unknown.join(", ")),
            );
        }
    }
}
