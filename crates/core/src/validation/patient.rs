use super::entry::EntrySchema;
use super::fields::{Collector, Fields};
use super::ValidationError;
use crate::config::UnknownFieldPolicy;
use crate::models::{Gender, NewPatient};
use serde_json::Value;

const PATIENT_KEYS: [&str; 6] = [
    "name",
    "dateOfBirth",
    "ssn",
    "gender",
    "occupation",
    "entries",
];

/// Validates untyped JSON into a [`NewPatient`].
///
/// `entries` is optional; when present each element goes through [`EntrySchema`] and its
/// issues are reported under `entries.<index>`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatientSchema {
    unknown_fields: UnknownFieldPolicy,
    entries: EntrySchema,
}

impl PatientSchema {
    pub fn new(unknown_fields: UnknownFieldPolicy) -> Self {
        Self {
            unknown_fields,
            entries: EntrySchema::new(unknown_fields),
        }
    }

    /// The schema applied to each element of `entries`.
    pub fn entry_schema(&self) -> EntrySchema {
        self.entries
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every problem found, including those inside
    /// nested entries.
    pub fn parse(&self, value: &Value) -> Result<NewPatient, ValidationError> {
        let mut c = Collector::default();
        let patient = self.read(value, &mut c);
        c.finish(patient)
    }

    fn read(&self, value: &Value, c: &mut Collector) -> Option<NewPatient> {
        let fields = Fields::object_at(value, Vec::new(), c)?;

        let name = fields.text("name", c);
        let date_of_birth = fields.date("dateOfBirth", c);
        let ssn = fields.text("ssn", c);
        let expected = Gender::ALL
            .iter()
            .map(|g| format!("'{g}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        let gender = fields.choice("gender", c, &expected, |value| {
            value.as_str().and_then(Gender::from_wire)
        });
        let occupation = fields.text("occupation", c);

        let entries = fields.optional_array("entries", c).and_then(|items| {
            let items = items.unwrap_or_default();
            let mut entries = Vec::with_capacity(items.len());
            let mut ok = true;
            for (i, item) in items.iter().enumerate() {
                let mut path = fields.path_to("entries");
                path.push(i.into());
                match self.entries.read(item, path, c) {
                    Some(entry) => entries.push(entry),
                    None => ok = false,
                }
            }
            ok.then_some(entries)
        });

        if self.unknown_fields == UnknownFieldPolicy::Reject {
            fields.reject_unknown(&PATIENT_KEYS, c);
        }

        Some(NewPatient {
            name: name?,
            date_of_birth: date_of_birth?,
            ssn: ssn?,
            gender: gender?,
            occupation: occupation?,
            entries: entries?,
        })
    }
}
