use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Read-only reference entry mapping a diagnosis code to its name.
///
/// Entries refer to diagnoses by code only. A code that is missing here is still a valid
/// entry code; it simply renders without a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct Diagnosis {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}
