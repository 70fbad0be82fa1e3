//! Startup seed data.
//!
//! The store starts from a YAML document holding `diagnoses` and `patients`. Unless a seed
//! file is configured, the document compiled into the binary is used.
//!
//! The document's outer structure (ids, lists, diagnosis rows) is parsed with serde and
//! `serde_path_to_error`, so a malformed file reports where it went wrong. Patient and
//! entry bodies are then handed to the same schemas that validate API input, keeping a
//! single definition of what a valid record is. Ids come from the file and must be
//! unique across patients and entries.

use crate::config::CoreConfig;
use crate::constants::BUILTIN_SEED_YAML;
use crate::error::{PatientError, PatientResult};
use crate::models::{Diagnosis, Patient};
use crate::validation::{PathSegment, PatientSchema, ValidationError};
use patientor_uuid::RecordId;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Records loaded at startup.
#[derive(Clone, Debug, Default)]
pub struct Seed {
    pub patients: Vec<Patient>,
    pub diagnoses: Vec<Diagnosis>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    #[serde(default)]
    diagnoses: Vec<Diagnosis>,
    #[serde(default)]
    patients: Vec<SeedPatient>,
}

#[derive(Deserialize)]
struct SeedPatient {
    id: RecordId,
    #[serde(default)]
    entries: Vec<SeedEntry>,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

#[derive(Deserialize)]
struct SeedEntry {
    id: RecordId,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

/// Load the seed selected by `cfg`.
///
/// # Errors
///
/// Returns [`PatientError::FileRead`] if the configured file cannot be read and
/// [`PatientError::Seed`] if its content is invalid.
pub fn load(cfg: &CoreConfig, schema: &PatientSchema) -> PatientResult<Seed> {
    match cfg.seed_path() {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading seed file");
            let text = std::fs::read_to_string(path).map_err(PatientError::FileRead)?;
            parse(&text, schema)
        }
        None => parse(BUILTIN_SEED_YAML, schema),
    }
}

/// Parse and validate a seed document.
///
/// # Errors
///
/// Returns [`PatientError::Seed`] naming the path of the first structural problem, every
/// validation issue of the first invalid record, or a duplicated id or code.
pub fn parse(yaml_text: &str, schema: &PatientSchema) -> PatientResult<Seed> {
    let deserializer = serde_yaml::Deserializer::from_str(yaml_text);
    let file: SeedFile = match serde_path_to_error::deserialize(deserializer) {
        Ok(parsed) => parsed,
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() || path == "." {
                "<root>"
            } else {
                path.as_str()
            };
            return Err(PatientError::Seed(format!(
                "schema mismatch at {path}: {source}"
            )));
        }
    };

    let mut codes = HashSet::new();
    for diagnosis in &file.diagnoses {
        if !codes.insert(diagnosis.code.as_str()) {
            return Err(PatientError::Seed(format!(
                "duplicate diagnosis code {}",
                diagnosis.code
            )));
        }
    }

    let entry_schema = schema.entry_schema();
    let mut ids = HashSet::new();
    let mut patients = Vec::with_capacity(file.patients.len());

    for (i, raw) in file.patients.into_iter().enumerate() {
        let at: Vec<PathSegment> = vec!["patients".into(), i.into()];
        claim(&mut ids, raw.id)?;

        let mut patient = schema
            .parse(&Value::Object(raw.fields))
            .map_err(|e| invalid_record(e, &at))?
            .with_id(raw.id);

        for (j, entry) in raw.entries.into_iter().enumerate() {
            let mut entry_at = at.clone();
            entry_at.extend([PathSegment::from("entries"), PathSegment::from(j)]);
            claim(&mut ids, entry.id)?;

            let new_entry = entry_schema
                .parse(&Value::Object(entry.fields))
                .map_err(|e| invalid_record(e, &entry_at))?;
            patient.entries.push(new_entry.with_id(entry.id));
        }

        patients.push(patient);
    }

    Ok(Seed {
        patients,
        diagnoses: file.diagnoses,
    })
}

fn claim(ids: &mut HashSet<RecordId>, id: RecordId) -> PatientResult<()> {
    if ids.insert(id) {
        Ok(())
    } else {
        Err(PatientError::Seed(format!("duplicate id {id}")))
    }
}

fn invalid_record(err: ValidationError, at: &[PathSegment]) -> PatientError {
    PatientError::Seed(err.nested_under(at).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnknownFieldPolicy;
    use crate::models::EntryKind;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn schema() -> PatientSchema {
        PatientSchema::default()
    }

    #[test]
    fn builtin_seed_is_valid() {
        let seed = parse(BUILTIN_SEED_YAML, &schema()).expect("builtin seed should load");
        assert_eq!(seed.patients.len(), 5);
        assert_eq!(seed.diagnoses.len(), 15);

        let john = &seed.patients[0];
        assert_eq!(john.id.to_string(), "d2773336-f723-11e9-8f0b-362b9e155667");
        assert_eq!(john.entries.len(), 1);
        assert_eq!(john.entries[0].kind(), EntryKind::Hospital);
        assert_eq!(
            john.entries[0].id.to_string(),
            "d811e46d-70b3-4d90-b090-4535c7cf8fb1"
        );
    }

    #[test]
    fn builtin_seed_is_valid_under_reject_policy() {
        let strict = PatientSchema::new(UnknownFieldPolicy::Reject);
        assert!(parse(BUILTIN_SEED_YAML, &strict).is_ok());
    }

    #[test]
    fn structural_errors_report_their_path() {
        let yaml = r#"
patients:
  - id: "not-an-id"
    name: "X"
"#;
        let err = parse(yaml, &schema()).expect_err("bad id");
        assert!(
            matches!(&err, PatientError::Seed(msg) if msg.contains("patients[0]")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn invalid_entries_report_nested_paths() {
        let yaml = r#"
patients:
  - id: "d27736ec-f723-11e9-8f0b-362b9e155667"
    name: "Hans Gruber"
    dateOfBirth: "1970-04-25"
    ssn: "250470-555L"
    gender: "other"
    occupation: "Technician"
    entries:
      - id: "d811e46d-70b3-4d90-b090-4535c7cf8fb1"
        type: "Hospital"
        date: "2015-01-02"
        specialist: "MD House"
        description: "x"
"#;
        let err = parse(yaml, &schema()).expect_err("missing discharge");
        assert!(
            matches!(&err, PatientError::Seed(msg) if msg.contains("patients.0.entries.0.discharge")),
            "unexpected error: {err}"
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let yaml = r#"
patients:
  - id: "d27736ec-f723-11e9-8f0b-362b9e155667"
    name: "A"
    dateOfBirth: "1970-04-25"
    ssn: "1"
    gender: "other"
    occupation: "B"
  - id: "d27736ec-f723-11e9-8f0b-362b9e155667"
    name: "C"
    dateOfBirth: "1970-04-25"
    ssn: "2"
    gender: "other"
    occupation: "D"
"#;
        let err = parse(yaml, &schema()).expect_err("duplicate id");
        assert!(matches!(err, PatientError::Seed(msg) if msg.contains("duplicate id")));
    }

    #[test]
    fn load_reads_configured_file() {
        let mut file = NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "diagnoses:\n  - code: \"L20\"\n    name: \"Atopic dermatitis\"\npatients: []"
        )
        .expect("write seed");

        let cfg = CoreConfig::new(Some(file.path().to_path_buf()), UnknownFieldPolicy::Strip)
            .expect("config");
        let seed = load(&cfg, &schema()).expect("seed file should load");
        assert!(seed.patients.is_empty());
        assert_eq!(seed.diagnoses[0].code, "L20");
    }
}
