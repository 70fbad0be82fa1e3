//! Plain-text rendering of patients and their entries.
//!
//! Variant-specific output goes through [`render_entry_details`], which matches every
//! [`EntryDetails`] variant explicitly. There is no fallback arm, so adding a variant does
//! not compile until it has a rendering here.

use crate::models::{Entry, EntryDetails, Patient};
use crate::repositories::DiagnosisService;

/// Details line(s) for one entry, chosen by its variant.
pub fn render_entry_details(entry: &Entry) -> String {
    match &entry.details {
        EntryDetails::HealthCheck {
            health_check_rating,
        } => format!(
            "Health check rating: {} ({})\n",
            u8::from(*health_check_rating),
            health_check_rating.label()
        ),
        EntryDetails::OccupationalHealthcare {
            employer_name,
            sick_leave,
        } => {
            let mut output = format!("Employer: {employer_name}\n");
            if let Some(leave) = sick_leave {
                output.push_str(&format!(
                    "Sick leave: {} - {}\n",
                    leave.start_date, leave.end_date
                ));
            }
            output
        }
        EntryDetails::Hospital { discharge } => format!(
            "Discharge: {} {}\n",
            discharge.date, discharge.criteria
        ),
    }
}

/// An entry list with diagnosis names resolved through `diagnoses`.
///
/// Codes the catalogue does not know are printed with a blank name.
pub fn render_entries(entries: &[Entry], diagnoses: &DiagnosisService) -> String {
    if entries.is_empty() {
        return "No entries\n".to_owned();
    }

    let mut output = String::new();
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&format!("{} {}\n", entry.date, entry.description));
        for code in entry.codes() {
            output.push_str(&format!("  {} {}\n", code, diagnoses.name_of(code)));
        }
        output.push_str(&render_entry_details(entry));
        output.push_str(&format!("Diagnosed by {}\n", entry.specialist));
    }
    output
}

/// A whole patient page: demographics, then entries.
pub fn render_patient(patient: &Patient, diagnoses: &DiagnosisService) -> String {
    let mut output = format!("{}\n", patient.name);
    output.push_str(&format!("SSN: {}\n", patient.ssn));
    output.push_str(&format!("Occupation: {}\n", patient.occupation));
    output.push_str(&format!("Gender: {}\n", patient.gender));
    output.push_str(&format!("Date of Birth: {}\n", patient.date_of_birth));
    output.push_str("\nEntries\n");
    output.push_str(&render_entries(&patient.entries, diagnoses));
    output
}
