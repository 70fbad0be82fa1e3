use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Body of every error response: `{"error": ...}`.
///
/// Validation failures carry the list of field issues; every other error carries a
/// message string.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    #[schema(value_type = Object)]
    pub error: Value,
}

impl ErrorBody {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            error: Value::String(message.into()),
        }
    }

    /// # Errors
    ///
    /// Returns the serialisation error if an issue cannot be turned into JSON.
    pub fn issues<T: Serialize>(issues: &[T]) -> serde_json::Result<Self> {
        Ok(Self {
            error: serde_json::to_value(issues)?,
        })
    }
}
