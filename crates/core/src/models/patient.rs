use crate::models::entry::{Entry, NewEntry};
use patientor_types::{IsoDate, NonEmptyText};
use patientor_uuid::RecordId;
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        }
    }

    pub fn from_wire(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated registration request. Any entries it carries have no ids yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct NewPatient {
    #[schema(value_type = String)]
    pub name: NonEmptyText,
    #[serde(rename = "dateOfBirth")]
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: IsoDate,
    #[schema(value_type = String)]
    pub ssn: NonEmptyText,
    pub gender: Gender,
    #[schema(value_type = String)]
    pub occupation: NonEmptyText,
    pub entries: Vec<NewEntry>,
}

/// A full patient record, including the national id (`ssn`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Patient {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[schema(value_type = String)]
    pub name: NonEmptyText,
    #[serde(rename = "dateOfBirth")]
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: IsoDate,
    #[schema(value_type = String)]
    pub ssn: NonEmptyText,
    pub gender: Gender,
    #[schema(value_type = String)]
    pub occupation: NonEmptyText,
    pub entries: Vec<Entry>,
}

impl NewPatient {
    /// Attach an identity to the patient and fresh identities to each of its entries.
    pub fn with_id(self, id: RecordId) -> Patient {
        Patient {
            id,
            name: self.name,
            date_of_birth: self.date_of_birth,
            ssn: self.ssn,
            gender: self.gender,
            occupation: self.occupation,
            entries: self
                .entries
                .into_iter()
                .map(|entry| entry.with_id(RecordId::new()))
                .collect(),
        }
    }
}

/// Public view of a patient: everything except the national id.
///
/// This is a separate type (not a serde skip) so the `ssn` cannot leak through any
/// serialiser.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct PublicPatient {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[schema(value_type = String)]
    pub name: NonEmptyText,
    #[serde(rename = "dateOfBirth")]
    #[schema(value_type = String, format = Date)]
    pub date_of_birth: IsoDate,
    pub gender: Gender,
    #[schema(value_type = String)]
    pub occupation: NonEmptyText,
    pub entries: Vec<Entry>,
}

impl From<&Patient> for PublicPatient {
    fn from(patient: &Patient) -> Self {
        Self {
            id: patient.id,
            name: patient.name.clone(),
            date_of_birth: patient.date_of_birth,
            gender: patient.gender,
            occupation: patient.occupation.clone(),
            entries: patient.entries.clone(),
        }
    }
}
