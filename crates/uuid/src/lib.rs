//! Record identifiers.
//!
//! Patients and entries are identified by UUIDs written in their *canonical* form:
//! **36 characters, lowercase hexadecimal, hyphenated** (`8-4-4-4-12`).
//!
//! Example: `d2773336-f723-11e9-8f0b-362b9e155667`
//!
//! - [`RecordId::new`] allocates a fresh random (v4) identifier.
//! - [`RecordId::parse`] validates an externally supplied identifier. Uppercase, braced,
//!   URN or simple (unhyphenated) forms are rejected rather than normalised, so the same
//!   record can never be addressed by two different strings.
//!
//! Any UUID version is accepted on parse; seed data carries v1 identifiers.

mod service;

pub use service::RecordId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
