//! Typed patient-record models.
//!
//! These are the *validated* shapes: every value here has been through
//! [`crate::validation`] (or was built directly in code), so text fields are non-blank,
//! dates are real calendar dates and each entry carries exactly the fields of its variant.
//!
//! Serialisation uses the camelCase wire names clients already speak
//! (`dateOfBirth`, `healthCheckRating`, `sickLeave`, ...).

pub mod diagnosis;
pub mod entry;
pub mod patient;

pub use diagnosis::Diagnosis;
pub use entry::{
    Discharge, Entry, EntryDetails, EntryKind, HealthCheckRating, NewEntry, SickLeave,
};
pub use patient::{Gender, NewPatient, Patient, PublicPatient};
