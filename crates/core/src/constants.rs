//! Constants used throughout the Patientor core crate.

/// Default bind address for the REST server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Environment variable naming the REST bind address.
pub const REST_ADDR_ENV: &str = "PATIENTOR_REST_ADDR";

/// Environment variable naming an optional YAML seed file.
pub const SEED_FILE_ENV: &str = "PATIENTOR_SEED_FILE";

/// Environment variable selecting how unknown JSON keys are treated (`strip` or `reject`).
pub const UNKNOWN_FIELDS_ENV: &str = "PATIENTOR_UNKNOWN_FIELDS";

/// Seed compiled into the binary, used when no seed file is configured.
pub const BUILTIN_SEED_YAML: &str = include_str!("../seed/patientor.yaml");

/// Name of the discriminant field on entries.
pub const ENTRY_DISCRIMINATOR: &str = "type";
