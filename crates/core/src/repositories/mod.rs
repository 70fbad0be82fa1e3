//! In-memory stores.
//!
//! - [`patients`]: the patient record store (list, get, register, append entry)
//! - [`diagnoses`]: the read-only diagnosis catalogue

pub mod diagnoses;
pub mod patients;

pub use diagnoses::DiagnosisService;
pub use patients::PatientService;
