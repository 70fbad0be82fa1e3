use super::fields::{Collector, Fields};
use super::{IssueCode, PathSegment, ValidationError};
use crate::config::UnknownFieldPolicy;
use crate::constants::ENTRY_DISCRIMINATOR;
use crate::models::{Discharge, EntryDetails, EntryKind, HealthCheckRating, NewEntry, SickLeave};
use serde_json::Value;

const COMMON_KEYS: [&str; 5] = [
    ENTRY_DISCRIMINATOR,
    "description",
    "date",
    "specialist",
    "diagnosisCodes",
];

/// Validates untyped JSON into a [`NewEntry`].
///
/// The `type` discriminant is read before anything else. A missing or unknown tag fails
/// immediately with a single `invalid_union_discriminator` issue; the input is never
/// matched against the variant shapes structurally. Once the variant is known, all common
/// and variant fields are checked and every failure is reported.
#[derive(Clone, Copy, Debug, Default)]
pub struct EntrySchema {
    unknown_fields: UnknownFieldPolicy,
}

impl EntrySchema {
    pub fn new(unknown_fields: UnknownFieldPolicy) -> Self {
        Self { unknown_fields }
    }

    /// Validate a whole document as an entry.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every problem found.
    pub fn parse(&self, value: &Value) -> Result<NewEntry, ValidationError> {
        let mut c = Collector::default();
        let entry = self.read(value, Vec::new(), &mut c);
        c.finish(entry)
    }

    /// Validate an entry nested at `path` inside a larger document, reporting into `c`.
    pub(crate) fn read(
        &self,
        value: &Value,
        path: Vec<PathSegment>,
        c: &mut Collector,
    ) -> Option<NewEntry> {
        let fields = Fields::object_at(value, path, c)?;
        let kind = discriminant(&fields, c)?;

        let description = fields.text("description", c);
        let date = fields.date("date", c);
        let specialist = fields.text("specialist", c);
        let diagnosis_codes = fields.optional_string_list("diagnosisCodes", c);

        // No wildcard arm: a new variant must get its own reader here.
        let details = match kind {
            EntryKind::HealthCheck => health_check(&fields, c),
            EntryKind::OccupationalHealthcare => occupational_healthcare(&fields, c),
            EntryKind::Hospital => hospital(&fields, c),
        };

        if self.unknown_fields == UnknownFieldPolicy::Reject {
            let mut allowed = COMMON_KEYS.to_vec();
            allowed.extend_from_slice(variant_keys(kind));
            fields.reject_unknown(&allowed, c);
        }

        Some(NewEntry {
            description: description?,
            date: date?,
            specialist: specialist?,
            diagnosis_codes: diagnosis_codes?,
            details: details?,
        })
    }
}

/// Keys owned by one variant, on top of the common ones.
fn variant_keys(kind: EntryKind) -> &'static [&'static str] {
    match kind {
        EntryKind::HealthCheck => &["healthCheckRating"],
        EntryKind::OccupationalHealthcare => &["employerName", "sickLeave"],
        EntryKind::Hospital => &["discharge"],
    }
}

fn discriminant(fields: &Fields<'_>, c: &mut Collector) -> Option<EntryKind> {
    let kind = fields
        .get(ENTRY_DISCRIMINATOR)
        .and_then(Value::as_str)
        .and_then(EntryKind::from_tag);

    if kind.is_none() {
        let expected = EntryKind::ALL
            .iter()
            .map(|k| format!("'{k}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        tracing::debug!(tag = ?fields.get(ENTRY_DISCRIMINATOR), "unhandled entry variant");
        c.push(
            IssueCode::InvalidUnionDiscriminator,
            fields.path_to(ENTRY_DISCRIMINATOR),
            format!("Invalid discriminator value. Expected {expected}"),
        );
    }
    kind
}

fn health_check(fields: &Fields<'_>, c: &mut Collector) -> Option<EntryDetails> {
    let rating = fields.choice("healthCheckRating", c, "0 | 1 | 2 | 3", |value| {
        rating_value(value).and_then(HealthCheckRating::from_value)
    })?;
    Some(EntryDetails::HealthCheck {
        health_check_rating: rating,
    })
}

/// Whole-number JSON value, accepting integral floats such as `1.0`.
fn rating_value(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    (f.is_finite() && f.fract() == 0.0 && (0.0..=3.0).contains(&f)).then_some(f as u64)
}

fn occupational_healthcare(fields: &Fields<'_>, c: &mut Collector) -> Option<EntryDetails> {
    let employer_name = fields.text("employerName", c);
    let sick_leave = fields
        .optional_nested("sickLeave", c)
        .and_then(|leave| match leave {
            None => Some(None),
            Some(leave) => sick_leave(&leave, c).map(Some),
        });

    Some(EntryDetails::OccupationalHealthcare {
        employer_name: employer_name?,
        sick_leave: sick_leave?,
    })
}

fn sick_leave(fields: &Fields<'_>, c: &mut Collector) -> Option<SickLeave> {
    let start_date = fields.date("startDate", c);
    let end_date = fields.date("endDate", c);
    let (start_date, end_date) = (start_date?, end_date?);

    if end_date < start_date {
        c.push(
            IssueCode::Custom,
            fields.path_to("endDate"),
            "endDate must not be before startDate",
        );
        return None;
    }

    Some(SickLeave {
        start_date,
        end_date,
    })
}

fn hospital(fields: &Fields<'_>, c: &mut Collector) -> Option<EntryDetails> {
    let discharge = fields.nested("discharge", c)?;
    let date = discharge.date("date", c);
    let criteria = discharge.text("criteria", c);

    Some(EntryDetails::Hospital {
        discharge: Discharge {
            date: date?,
            criteria: criteria?,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Issue;
    use serde_json::json;

    fn strip() -> EntrySchema {
        EntrySchema::default()
    }

    fn issues(value: Value) -> Vec<Issue> {
        strip()
            .parse(&value)
            .expect_err("input should be rejected")
            .into_issues()
    }

    #[test]
    fn accepts_health_check_example() {
        let entry = strip()
            .parse(&json!({
                "type": "HealthCheck",
                "description": "check",
                "date": "2024-01-01",
                "specialist": "Dr. X",
                "healthCheckRating": 0
            }))
            .expect("valid health check");

        assert_eq!(entry.description.as_str(), "check");
        assert_eq!(entry.date.to_string(), "2024-01-01");
        assert_eq!(entry.specialist.as_str(), "Dr. X");
        assert_eq!(entry.diagnosis_codes, None);
        assert_eq!(
            entry.details,
            EntryDetails::HealthCheck {
                health_check_rating: HealthCheckRating::Healthy
            }
        );
    }

    #[test]
    fn accepts_occupational_healthcare_with_sick_leave() {
        let entry = strip()
            .parse(&json!({
                "type": "OccupationalHealthcare",
                "description": "Strained back",
                "date": "2019-08-05",
                "specialist": "MD House",
                "diagnosisCodes": ["Z57.1", "Z74.3", "M51.2"],
                "employerName": "HyPD",
                "sickLeave": { "startDate": "2019-08-05", "endDate": "2019-08-28" }
            }))
            .expect("valid occupational entry");

        assert_eq!(entry.diagnosis_codes.as_ref().map(Vec::len), Some(3));
        match entry.details {
            EntryDetails::OccupationalHealthcare {
                employer_name,
                sick_leave: Some(leave),
            } => {
                assert_eq!(employer_name.as_str(), "HyPD");
                assert_eq!(leave.start_date.to_string(), "2019-08-05");
                assert_eq!(leave.end_date.to_string(), "2019-08-28");
            }
            other => panic!("unexpected details: {other:?}"),
        }
    }

    #[test]
    fn accepts_occupational_healthcare_without_sick_leave() {
        let entry = strip()
            .parse(&json!({
                "type": "OccupationalHealthcare",
                "description": "Visit",
                "date": "2019-08-05",
                "specialist": "MD House",
                "employerName": "FBI"
            }))
            .expect("sick leave is optional");
        assert!(matches!(
            entry.details,
            EntryDetails::OccupationalHealthcare {
                sick_leave: None,
                ..
            }
        ));
    }

    #[test]
    fn accepts_hospital() {
        let entry = strip()
            .parse(&json!({
                "type": "Hospital",
                "description": "Healing time appr. 2 weeks.",
                "date": "2015-01-02",
                "specialist": "MD House",
                "diagnosisCodes": ["S62.5"],
                "discharge": { "date": "2015-01-16", "criteria": "Thumb has healed." }
            }))
            .expect("valid hospital entry");
        assert_eq!(entry.kind(), EntryKind::Hospital);
    }

    #[test]
    fn unknown_tag_fails_fast_with_single_issue() {
        let found = issues(json!({
            "type": "Dental",
            "description": "",
            "date": "nope",
        }));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].code, IssueCode::InvalidUnionDiscriminator);
        assert_eq!(found[0].path_string(), "type");
        assert!(found[0].message.contains("'HealthCheck' | 'OccupationalHealthcare' | 'Hospital'"));
    }

    #[test]
    fn missing_or_non_string_tag_is_a_discriminator_error() {
        for input in [
            json!({"description": "x", "date": "2020-01-01", "specialist": "y", "healthCheckRating": 0}),
            json!({"type": 1}),
            json!({"type": null}),
            json!({"type": "healthcheck"}),
        ] {
            let found = issues(input);
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].code, IssueCode::InvalidUnionDiscriminator);
        }
    }

    #[test]
    fn tag_is_not_inferred_from_shape() {
        // Looks exactly like a hospital entry except for the tag.
        let found = issues(json!({
            "type": "Hospitalization",
            "description": "x",
            "date": "2015-01-02",
            "specialist": "y",
            "discharge": { "date": "2015-01-16", "criteria": "ok" }
        }));
        assert_eq!(found[0].code, IssueCode::InvalidUnionDiscriminator);
    }

    #[test]
    fn hospital_without_discharge_names_the_field() {
        let err = strip()
            .parse(&json!({
                "type": "Hospital",
                "description": "x",
                "date": "2015-01-02",
                "specialist": "y"
            }))
            .expect_err("discharge is required");
        assert!(err.mentions("discharge"));
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].message, "Required");
    }

    #[test]
    fn reports_every_problem_not_just_the_first() {
        let found = issues(json!({
            "type": "Hospital",
            "description": 42,
            "date": "2015-02-30",
            "discharge": { "date": "16.1.2015" }
        }));
        let paths: Vec<String> = found.iter().map(Issue::path_string).collect();
        assert_eq!(
            paths,
            vec![
                "description",
                "date",
                "specialist",
                "discharge.date",
                "discharge.criteria"
            ]
        );
    }

    #[test]
    fn rating_outside_enum_is_rejected() {
        for bad in [json!(4), json!(-1), json!(1.5), json!("0"), json!(null)] {
            let found = issues(json!({
                "type": "HealthCheck",
                "description": "x",
                "date": "2020-01-01",
                "specialist": "y",
                "healthCheckRating": bad
            }));
            assert_eq!(found.len(), 1);
            assert_eq!(found[0].code, IssueCode::InvalidEnumValue);
            assert_eq!(found[0].path_string(), "healthCheckRating");
        }
    }

    #[test]
    fn integral_float_rating_is_accepted() {
        let entry = strip()
            .parse(&json!({
                "type": "HealthCheck",
                "description": "x",
                "date": "2020-01-01",
                "specialist": "y",
                "healthCheckRating": 1.0
            }))
            .expect("1.0 is the same rating as 1");
        assert_eq!(
            entry.details,
            EntryDetails::HealthCheck {
                health_check_rating: HealthCheckRating::LowRisk
            }
        );

        for bad in [json!(3.5), json!(4.0), json!(-0.5)] {
            let found = issues(json!({
                "type": "HealthCheck",
                "description": "x",
                "date": "2020-01-01",
                "specialist": "y",
                "healthCheckRating": bad
            }));
            assert_eq!(found[0].code, IssueCode::InvalidEnumValue);
        }
    }

    #[test]
    fn text_fields_are_stored_as_sent() {
        let entry = strip()
            .parse(&json!({
                "type": "HealthCheck",
                "description": " check ",
                "date": "2024-01-01",
                "specialist": "Dr. X ",
                "healthCheckRating": 0
            }))
            .expect("surrounding whitespace is allowed");
        assert_eq!(entry.description.as_str(), " check ");
        assert_eq!(entry.specialist.as_str(), "Dr. X ");

        let found = issues(json!({
            "type": "HealthCheck",
            "description": "   ",
            "date": "2024-01-01",
            "specialist": "Dr. X",
            "healthCheckRating": 0
        }));
        assert_eq!(found[0].code, IssueCode::TooSmall);
        assert_eq!(found[0].path_string(), "description");
    }

    #[test]
    fn sick_leave_dates_are_checked() {
        let found = issues(json!({
            "type": "OccupationalHealthcare",
            "description": "x",
            "date": "2020-01-01",
            "specialist": "y",
            "employerName": "z",
            "sickLeave": { "startDate": "2020-01-10" }
        }));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "sickLeave.endDate");

        let found = issues(json!({
            "type": "OccupationalHealthcare",
            "description": "x",
            "date": "2020-01-01",
            "specialist": "y",
            "employerName": "z",
            "sickLeave": { "startDate": "2020-01-10", "endDate": "2020-01-01" }
        }));
        assert_eq!(found[0].code, IssueCode::Custom);
    }

    #[test]
    fn bad_diagnosis_codes_are_reported_by_index() {
        let found = issues(json!({
            "type": "HealthCheck",
            "description": "x",
            "date": "2020-01-01",
            "specialist": "y",
            "healthCheckRating": 1,
            "diagnosisCodes": ["J10.1", 7]
        }));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].path_string(), "diagnosisCodes.1");
    }

    #[test]
    fn strip_policy_drops_foreign_fields() {
        let entry = strip()
            .parse(&json!({
                "id": "client-chosen",
                "type": "HealthCheck",
                "description": "x",
                "date": "2020-01-01",
                "specialist": "y",
                "healthCheckRating": 2,
                "discharge": { "date": "2020-01-02", "criteria": "ok" }
            }))
            .expect("extra keys are ignored");
        assert_eq!(entry.kind(), EntryKind::HealthCheck);
        let json = serde_json::to_value(&entry).unwrap();
        assert!(json.get("discharge").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn reject_policy_reports_foreign_fields() {
        let err = EntrySchema::new(UnknownFieldPolicy::Reject)
            .parse(&json!({
                "type": "HealthCheck",
                "description": "x",
                "date": "2020-01-01",
                "specialist": "y",
                "healthCheckRating": 2,
                "employerName": "FBI"
            }))
            .expect_err("foreign variant field");
        assert_eq!(err.issues().len(), 1);
        assert_eq!(err.issues()[0].code, IssueCode::UnrecognizedKeys);
        assert!(err.issues()[0].message.contains("'employerName'"));
    }

    #[test]
    fn non_object_input_is_rejected() {
        let found = issues(json!("HealthCheck"));
        assert_eq!(found[0].code, IssueCode::InvalidType);
        assert_eq!(found[0].path_string(), "<root>");
    }
}
