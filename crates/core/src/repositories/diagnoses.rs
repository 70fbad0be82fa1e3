use crate::models::Diagnosis;
use std::sync::Arc;

/// Read-only diagnosis catalogue, shared between clones.
#[derive(Clone, Debug, Default)]
pub struct DiagnosisService {
    diagnoses: Arc<Vec<Diagnosis>>,
}

impl DiagnosisService {
    pub fn new(diagnoses: Vec<Diagnosis>) -> Self {
        Self {
            diagnoses: Arc::new(diagnoses),
        }
    }

    pub fn list(&self) -> &[Diagnosis] {
        &self.diagnoses
    }

    /// Exact match on the code. Unknown codes are not an error.
    pub fn lookup(&self, code: &str) -> Option<&Diagnosis> {
        self.diagnoses.iter().find(|d| d.code == code)
    }

    /// Name for `code`, or an empty string when the catalogue does not know it.
    pub fn name_of(&self, code: &str) -> &str {
        self.lookup(code).map(|d| d.name.as_str()).unwrap_or("")
    }
}
