//! Clinical entries: a tagged union over three variants.
//!
//! Common fields live on [`NewEntry`]/[`Entry`]; the variant-specific fields live in
//! [`EntryDetails`], which serialises flattened next to them with a `type` tag.

use patientor_types::{IsoDate, NonEmptyText};
use patientor_uuid::RecordId;
use serde::Serialize;
use std::fmt;
use utoipa::openapi::{ObjectBuilder, RefOr, Schema, SchemaType};
use utoipa::ToSchema;

/// Discriminant of an entry, as it appears in the `type` field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EntryKind {
    HealthCheck,
    OccupationalHealthcare,
    Hospital,
}

impl EntryKind {
    pub const ALL: [EntryKind; 3] = [
        EntryKind::HealthCheck,
        EntryKind::OccupationalHealthcare,
        EntryKind::Hospital,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EntryKind::HealthCheck => "HealthCheck",
            EntryKind::OccupationalHealthcare => "OccupationalHealthcare",
            EntryKind::Hospital => "Hospital",
        }
    }

    /// Exact, case-sensitive match on the wire tag.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == tag)
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a health check, serialised as its numeric value (0..=3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    pub const ALL: [HealthCheckRating; 4] = [
        HealthCheckRating::Healthy,
        HealthCheckRating::LowRisk,
        HealthCheckRating::HighRisk,
        HealthCheckRating::CriticalRisk,
    ];

    pub fn from_value(value: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|r| u64::from(u8::from(*r)) == value)
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthCheckRating::Healthy => "Healthy",
            HealthCheckRating::LowRisk => "LowRisk",
            HealthCheckRating::HighRisk => "HighRisk",
            HealthCheckRating::CriticalRisk => "CriticalRisk",
        }
    }
}

impl From<HealthCheckRating> for u8 {
    fn from(rating: HealthCheckRating) -> Self {
        rating as u8
    }
}

impl<'s> ToSchema<'s> for HealthCheckRating {
    fn schema() -> (&'s str, RefOr<Schema>) {
        (
            "HealthCheckRating",
            ObjectBuilder::new()
                .schema_type(SchemaType::Integer)
                .enum_values(Some([0, 1, 2, 3]))
                .description(Some(
                    "0 = Healthy, 1 = LowRisk, 2 = HighRisk, 3 = CriticalRisk",
                ))
                .into(),
        )
    }
}

/// A period of sick leave granted at an occupational healthcare visit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct SickLeave {
    #[serde(rename = "startDate")]
    #[schema(value_type = String, format = Date)]
    pub start_date: IsoDate,
    #[serde(rename = "endDate")]
    #[schema(value_type = String, format = Date)]
    pub end_date: IsoDate,
}

/// Discharge from a hospital stay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Discharge {
    #[schema(value_type = String, format = Date)]
    pub date: IsoDate,
    #[schema(value_type = String)]
    pub criteria: NonEmptyText,
}

/// Variant-specific part of an entry.
///
/// The `type` tag is written by serde; a value of one variant can never carry
/// another variant's fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "type")]
pub enum EntryDetails {
    HealthCheck {
        #[serde(rename = "healthCheckRating")]
        health_check_rating: HealthCheckRating,
    },
    OccupationalHealthcare {
        #[serde(rename = "employerName")]
        #[schema(value_type = String)]
        employer_name: NonEmptyText,
        #[serde(rename = "sickLeave", skip_serializing_if = "Option::is_none")]
        sick_leave: Option<SickLeave>,
    },
    Hospital {
        discharge: Discharge,
    },
}

impl EntryDetails {
    pub fn kind(&self) -> EntryKind {
        match self {
            EntryDetails::HealthCheck { .. } => EntryKind::HealthCheck,
            EntryDetails::OccupationalHealthcare { .. } => EntryKind::OccupationalHealthcare,
            EntryDetails::Hospital { .. } => EntryKind::Hospital,
        }
    }
}

/// A validated entry that has not been assigned an id yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct NewEntry {
    #[schema(value_type = String)]
    pub description: NonEmptyText,
    #[schema(value_type = String, format = Date)]
    pub date: IsoDate,
    #[schema(value_type = String)]
    pub specialist: NonEmptyText,
    #[serde(rename = "diagnosisCodes", skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl NewEntry {
    /// Attach an identity, producing a stored entry.
    pub fn with_id(self, id: RecordId) -> Entry {
        Entry {
            id,
            description: self.description,
            date: self.date,
            specialist: self.specialist,
            diagnosis_codes: self.diagnosis_codes,
            details: self.details,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.details.kind()
    }
}

/// A stored entry. The id is assigned once and never changes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct Entry {
    #[schema(value_type = String)]
    pub id: RecordId,
    #[schema(value_type = String)]
    pub description: NonEmptyText,
    #[schema(value_type = String, format = Date)]
    pub date: IsoDate,
    #[schema(value_type = String)]
    pub specialist: NonEmptyText,
    #[serde(rename = "diagnosisCodes", skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
    #[serde(flatten)]
    pub details: EntryDetails,
}

impl Entry {
    pub fn kind(&self) -> EntryKind {
        self.details.kind()
    }

    /// Diagnosis codes, treating an absent list as empty.
    pub fn codes(&self) -> &[String] {
        self.diagnosis_codes.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text(s: &str) -> NonEmptyText {
        NonEmptyText::new(s).unwrap()
    }

    fn date(s: &str) -> IsoDate {
        IsoDate::parse(s).unwrap()
    }

    #[test]
    fn entry_kind_tags_are_exact() {
        assert_eq!(EntryKind::from_tag("Hospital"), Some(EntryKind::Hospital));
        assert_eq!(EntryKind::from_tag("hospital"), None);
        assert_eq!(EntryKind::from_tag(""), None);
        for kind in EntryKind::ALL {
            assert_eq!(EntryKind::from_tag(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn rating_maps_only_known_values() {
        assert_eq!(HealthCheckRating::from_value(0), Some(HealthCheckRating::Healthy));
        assert_eq!(
            HealthCheckRating::from_value(3),
            Some(HealthCheckRating::CriticalRisk)
        );
        assert_eq!(HealthCheckRating::from_value(4), None);
    }

    #[test]
    fn entry_serialises_flat_with_type_tag() {
        let id = RecordId::parse("fcd59fa6-c4b4-4fec-ac4d-df4fe1f85f62").unwrap();
        let entry = NewEntry {
            description: text("Yearly control visit."),
            date: date("2019-10-20"),
            specialist: text("MD House"),
            diagnosis_codes: None,
            details: EntryDetails::HealthCheck {
                health_check_rating: HealthCheckRating::Healthy,
            },
        }
        .with_id(id);

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "fcd59fa6-c4b4-4fec-ac4d-df4fe1f85f62",
                "description": "Yearly control visit.",
                "date": "2019-10-20",
                "specialist": "MD House",
                "type": "HealthCheck",
                "healthCheckRating": 0
            })
        );
    }

    #[test]
    fn occupational_entry_omits_absent_sick_leave() {
        let entry = NewEntry {
            description: text("Strained back."),
            date: date("2019-08-05"),
            specialist: text("MD House"),
            diagnosis_codes: Some(vec!["Z57.1".into()]),
            details: EntryDetails::OccupationalHealthcare {
                employer_name: text("HyPD"),
                sick_leave: None,
            },
        };

        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["type"], "OccupationalHealthcare");
        assert_eq!(value["employerName"], "HyPD");
        assert_eq!(value["diagnosisCodes"], json!(["Z57.1"]));
        assert!(value.get("sickLeave").is_none());
        assert_eq!(entry.kind(), EntryKind::OccupationalHealthcare);
    }
}
