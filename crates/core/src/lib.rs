//! # Patientor Core
//!
//! Core business logic for the Patientor patient record service.
//!
//! This crate contains pure data operations:
//! - Typed patient, entry and diagnosis models
//! - Schema validation of untyped JSON into those models, with field-level issues
//! - The in-memory patient record store and the diagnosis catalogue
//! - Plain-text rendering of patients and their entries
//!
//! **No API concerns**: HTTP servers and CLI parsing belong in `api-rest` and `patientor-cli`.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod render;
pub mod repositories;
pub mod seed;
pub mod validation;

pub use config::{CoreConfig, UnknownFieldPolicy};
pub use error::{PatientError, PatientResult};
pub use models::{
    Diagnosis, Discharge, Entry, EntryDetails, EntryKind, Gender, HealthCheckRating, NewEntry,
    NewPatient, Patient, PublicPatient, SickLeave,
};
pub use repositories::{DiagnosisService, PatientService};
pub use validation::{EntrySchema, Issue, IssueCode, PathSegment, PatientSchema, ValidationError};

pub use patientor_types::{IsoDate, NonEmptyText, TextError};
pub use patientor_uuid::RecordId;

/// Everything a front end needs, built once from a [`CoreConfig`].
///
/// Cloning is cheap: the stores are reference counted and share state.
#[derive(Clone, Debug)]
pub struct Services {
    pub patients: PatientService,
    pub diagnoses: DiagnosisService,
    pub entry_schema: EntrySchema,
    pub patient_schema: PatientSchema,
}

impl Services {
    /// Loads the configured seed and wires up the stores and validators.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError`] if the seed cannot be read or does not validate.
    pub fn from_config(cfg: &CoreConfig) -> PatientResult<Self> {
        let entry_schema = EntrySchema::new(cfg.unknown_fields());
        let patient_schema = PatientSchema::new(cfg.unknown_fields());
        let seed = seed::load(cfg, &patient_schema)?;

        tracing::info!(
            patients = seed.patients.len(),
            diagnoses = seed.diagnoses.len(),
            "loaded seed data"
        );

        Ok(Self {
            patients: PatientService::with_patients(seed.patients),
            diagnoses: DiagnosisService::new(seed.diagnoses),
            entry_schema,
            patient_schema,
        })
    }
}
