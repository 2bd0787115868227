use clap::{Parser, Subcommand};
use fhir::PatientResource;
use std::sync::Arc;
use stub_core::{seed, CoreConfig, PatientError, PatientService};

#[derive(Parser)]
#[command(name = "smart-stub")]
#[command(about = "Inspect the SMART-on-FHIR stub's configuration and patient registry")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List seeded patients
    Patients,
    /// Print a patient resource
    Read {
        /// Patient resource id
        id: String,
    },
    /// Search patients by identifier and print the searchset bundle
    Search {
        /// Identifier values, as `value` or `system|value`
        identifiers: Vec<String>,
    },
    /// Print the SMART discovery document
    SmartConfig,
    /// Print the capability statement
    Metadata,
    /// Resolve configuration the way the server does and print it
    CheckConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("Use 'smart-stub --help' for commands");
        return Ok(());
    };

    let cfg = Arc::new(CoreConfig::from_env()?);
    let registry = Arc::new(seed::build_registry(&cfg)?);
    let service = PatientService::new(cfg.clone(), registry);

    match command {
        Commands::Patients => {
            let registry = service.registry();
            if registry.is_empty() {
                println!("No patients found.");
            }
            for patient in registry.patients() {
                println!(
                    "ID: {}, Name: {}, Identifiers: {}",
                    patient.id(),
                    display_name(patient),
                    display_identifiers(patient)
                );
            }
        }
        Commands::Read { id } => match service.read_patient(&id) {
            Ok(patient) => print_json(&patient)?,
            Err(PatientError::NotFound(id)) => eprintln!("Patient not found: {id}"),
            Err(e) => eprintln!("Error reading patient: {e}"),
        },
        Commands::Search { identifiers } => {
            print_json(&service.search_patients(identifiers.as_slice()))?;
        }
        Commands::SmartConfig => print_json(&service.smart_configuration())?,
        Commands::Metadata => print_json(&service.capability_statement())?,
        Commands::CheckConfig => {
            println!("Listen address:       {}", cfg.listen_addr());
            println!("Base URL:             {}", cfg.base_url());
            println!("Auth server base URL: {}", cfg.auth_server_base_url());
            println!("MRN system:           {}", cfg.mrn_system());
            println!("Bearer token:         {}", cfg.bearer_token());
            println!("Identifier system:    {:?}", cfg.identifier_system_policy());
            match cfg.seed_file() {
                Some(path) => println!("Seed file:            {}", path.display()),
                None => println!("Seed file:            (built-in demo patients)"),
            }
            println!("Patients:             {}", service.registry().len());
        }
    }

    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn display_name(patient: &PatientResource) -> String {
    patient
        .name
        .first()
        .map(|name| {
            if let Some(text) = name["text"].as_str() {
                return text.to_string();
            }
            let mut parts: Vec<&str> = name["given"]
                .as_array()
                .into_iter()
                .flatten()
                .filter_map(|given| given.as_str())
                .collect();
            if let Some(family) = name["family"].as_str() {
                parts.push(family);
            }
            parts.join(" ")
        })
        .unwrap_or_else(|| "-".into())
}

fn display_identifiers(patient: &PatientResource) -> String {
    patient
        .identifier
        .iter()
        .map(|identifier| match &identifier.system {
            Some(system) if !system.is_empty() => format!("{system}|{}", identifier.value),
            _ => identifier.value.clone(),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
