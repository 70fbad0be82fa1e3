use clap::{Parser, Subcommand};
use patientor_core::{
    config::unknown_field_policy_from_env_value, constants::UNKNOWN_FIELDS_ENV, render,
    CoreConfig, PatientError, Services,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "patientor")]
#[command(about = "Patientor patient record CLI")]
struct Cli {
    /// YAML seed file to load instead of the built-in seed
    #[arg(long, global = true)]
    seed: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List all patients
    List,
    /// Show one patient with their entries
    Show {
        /// Patient id
        id: String,
    },
    /// List the diagnosis catalogue
    Diagnoses,
    /// Validate a JSON entry file without storing it
    ValidateEntry {
        /// Path to the JSON file
        file: PathBuf,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'patientor --help' for commands");
        return Ok(ExitCode::SUCCESS);
    };

    let policy = unknown_field_policy_from_env_value(std::env::var(UNKNOWN_FIELDS_ENV).ok())?;
    let cfg = CoreConfig::new(cli.seed, policy)?;
    let services = Services::from_config(&cfg)?;

    if run(&services, command)? {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// Execute one command. `Ok(false)` means an unknown patient or an invalid entry.
fn run(services: &Services, command: Commands) -> Result<bool, Box<dyn std::error::Error>> {
    match command {
        Commands::List => {
            let patients = services.patients.list()?;
            if patients.is_empty() {
                println!("No patients found.");
            } else {
                for patient in patients {
                    println!(
                        "ID: {}, Name: {}, Born: {}, Entries: {}",
                        patient.id,
                        patient.name,
                        patient.date_of_birth,
                        patient.entries.len()
                    );
                }
            }
        }
        Commands::Show { id } => match services.patients.get(&id) {
            Ok(patient) => print!("{}", render::render_patient(&patient, &services.diagnoses)),
            Err(PatientError::NotFound(_)) => {
                eprintln!("No patient with id {}", id);
                return Ok(false);
            }
            Err(e) => return Err(e.into()),
        },
        Commands::Diagnoses => {
            for diagnosis in services.diagnoses.list() {
                match &diagnosis.latin {
                    Some(latin) => println!("{} {} ({})", diagnosis.code, diagnosis.name, latin),
                    None => println!("{} {}", diagnosis.code, diagnosis.name),
                }
            }
        }
        Commands::ValidateEntry { file } => {
            let text = std::fs::read_to_string(&file)?;
            let value: serde_json::Value = serde_json::from_str(&text)?;
            match services.entry_schema.parse(&value) {
                Ok(entry) => println!("Valid {} entry", entry.kind()),
                Err(e) => {
                    for issue in e.issues() {
                        eprintln!("{}", issue);
                    }
                    return Ok(false);
                }
            }
        }
    }

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patientor_core::UnknownFieldPolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn services() -> Services {
        let cfg = CoreConfig::new(None, UnknownFieldPolicy::Strip).expect("config");
        Services::from_config(&cfg).expect("builtin seed loads")
    }

    fn entry_file(body: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        write!(file, "{body}").expect("write entry");
        file
    }

    #[test]
    fn test_show_known_patient_succeeds() {
        let ok = run(
            &services(),
            Commands::Show {
                id: "d2773336-f723-11e9-8f0b-362b9e155667".into(),
            },
        )
        .expect("show");
        assert!(ok);
    }

    #[test]
    fn test_show_unknown_patient_fails() {
        for id in ["00000000-0000-4000-8000-000000000000", "nope"] {
            let ok = run(&services(), Commands::Show { id: id.into() }).expect("show");
            assert!(!ok);
        }
    }

    #[test]
    fn test_validate_entry_exit_codes() {
        let valid = entry_file(
            r#"{"type":"HealthCheck","description":"check","date":"2024-01-01","specialist":"Dr. X","healthCheckRating":0}"#,
        );
        let ok = run(
            &services(),
            Commands::ValidateEntry {
                file: valid.path().to_path_buf(),
            },
        )
        .expect("validate");
        assert!(ok);

        let invalid = entry_file(r#"{"type":"Dental"}"#);
        let ok = run(
            &services(),
            Commands::ValidateEntry {
                file: invalid.path().to_path_buf(),
            },
        )
        .expect("validate");
        assert!(!ok);
    }
}
