//! Patient record store.
//!
//! Records live in a single in-process list guarded by one `RwLock`. Every operation takes
//! the lock for the duration of a short synchronous step and never suspends while holding
//! it. Patients are never removed and entries are only ever appended.
//!
//! Identifiers arriving from outside are opaque strings: anything that is not a known id
//! (including strings that are not ids at all) resolves to [`PatientError::NotFound`].

use crate::error::{PatientError, PatientResult};
use crate::models::{NewEntry, NewPatient, Patient, PublicPatient};
use patientor_uuid::RecordId;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared handle to the patient list. Clones see the same records.
#[derive(Clone, Debug, Default)]
pub struct PatientService {
    patients: Arc<RwLock<Vec<Patient>>>,
}

impl PatientService {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `patients`, in the given order.
    pub fn with_patients(patients: Vec<Patient>) -> Self {
        Self {
            patients: Arc::new(RwLock::new(patients)),
        }
    }

    fn read(&self) -> PatientResult<RwLockReadGuard<'_, Vec<Patient>>> {
        self.patients.read().map_err(|_| PatientError::LockPoisoned)
    }

    fn write(&self) -> PatientResult<RwLockWriteGuard<'_, Vec<Patient>>> {
        self.patients.write().map_err(|_| PatientError::LockPoisoned)
    }

    /// All patients without their national id.
    pub fn list(&self) -> PatientResult<Vec<PublicPatient>> {
        Ok(self.read()?.iter().map(PublicPatient::from).collect())
    }

    /// One full record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if `id` does not resolve.
    pub fn get(&self, id: &str) -> PatientResult<Patient> {
        let key = resolve(id)?;
        self.read()?
            .iter()
            .find(|p| p.id == key)
            .cloned()
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))
    }

    /// Registers a patient under a fresh id and returns the stored record.
    pub fn add_patient(&self, patient: NewPatient) -> PatientResult<Patient> {
        let patient = patient.with_id(RecordId::new());
        self.write()?.push(patient.clone());
        tracing::info!(patient_id = %patient.id, "registered patient");
        Ok(patient)
    }

    /// Appends `entry` under a fresh id to the patient's entries and returns the updated
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`PatientError::NotFound`] if `id` does not resolve; the store is untouched.
    pub fn append_entry(&self, id: &str, entry: NewEntry) -> PatientResult<Patient> {
        let key = resolve(id)?;
        let mut patients = self.write()?;
        let patient = patients
            .iter_mut()
            .find(|p| p.id == key)
            .ok_or_else(|| PatientError::NotFound(id.to_owned()))?;

        let entry = entry.with_id(RecordId::new());
        tracing::info!(
            patient_id = %patient.id,
            entry_id = %entry.id,
            kind = %entry.kind(),
            "appended entry"
        );
        patient.entries.push(entry);
        Ok(patient.clone())
    }
}

fn resolve(id: &str) -> PatientResult<RecordId> {
    RecordId::parse(id).map_err(|e| {
        tracing::debug!(id, error = %e, "unresolvable patient id");
        PatientError::NotFound(id.to_owned())
    })
}
