//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services.
//! Nothing in this crate reads environment variables during request handling; binaries read
//! the variables and hand the raw values to the `*_from_env_value` helpers below.

use crate::{PatientError, PatientResult};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What the validators do with object keys that no schema names.
///
/// `Strip` drops them silently (an `id` sent by a client, or fields belonging to another
/// entry variant, never reach the typed value). `Reject` reports them as an
/// `unrecognized_keys` issue instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnknownFieldPolicy {
    #[default]
    Strip,
    Reject,
}

impl FromStr for UnknownFieldPolicy {
    type Err = PatientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strip" => Ok(Self::Strip),
            "reject" | "strict" => Ok(Self::Reject),
            other => Err(PatientError::InvalidInput(format!(
                "unknown field policy must be 'strip' or 'reject', got '{other}'"
            ))),
        }
    }
}

impl fmt::Display for UnknownFieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Strip => f.write_str("strip"),
            Self::Reject => f.write_str("reject"),
        }
    }
}

/// Core configuration resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct CoreConfig {
    seed_path: Option<PathBuf>,
    unknown_fields: UnknownFieldPolicy,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::InvalidInput`] if `seed_path` is given but is not a file.
    pub fn new(
        seed_path: Option<PathBuf>,
        unknown_fields: UnknownFieldPolicy,
    ) -> PatientResult<Self> {
        if let Some(path) = &seed_path {
            if !path.is_file() {
                return Err(PatientError::InvalidInput(format!(
                    "seed file does not exist: {}",
                    path.display()
                )));
            }
        }

        Ok(Self {
            seed_path,
            unknown_fields,
        })
    }

    /// Seed file to load instead of the built-in seed, if any.
    pub fn seed_path(&self) -> Option<&Path> {
        self.seed_path.as_deref()
    }

    pub fn unknown_fields(&self) -> UnknownFieldPolicy {
        self.unknown_fields
    }
}

/// Parse the unknown-field policy from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`UnknownFieldPolicy::Strip`].
pub fn unknown_field_policy_from_env_value(
    value: Option<String>,
) -> PatientResult<UnknownFieldPolicy> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
    let parsed = value.map(|v| v.parse::<UnknownFieldPolicy>()).transpose()?;

    Ok(parsed.unwrap_or_default())
}

/// Turn an optional seed path value into a path, treating blank as unset.
pub fn seed_path_from_env_value(value: Option<String>) -> Option<PathBuf> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
