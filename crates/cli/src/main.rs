mod render;

use clap::{Parser, Subcommand};
use medboard_client::{GatewayConfig, Notifier, PatientGateway, ToastChannel};
use medboard_core::entries::{append_entry, remove_entry};
use medboard_core::views::{compute_stats, today_utc};
use medboard_core::{
    DiagnosisStatus, NewPatient, PatientId, PatientUpdate, StatusFilter, TabFilter, ViewQuery,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "medboard")]
#[command(about = "MedBoard patient dashboard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// List patients, optionally filtered
    List {
        /// Case-insensitive match on name and email
        #[arg(long, default_value = "")]
        search: String,
        /// all, pending or confirmed
        #[arg(long, default_value = "all")]
        status: StatusFilter,
        /// all, today, pending or confirmed
        #[arg(long, default_value = "all")]
        tab: TabFilter,
    },
    /// Show dashboard counts
    Stats,
    /// Show one patient in full
    Show {
        /// Patient id
        id: String,
    },
    /// Register a new patient
    Create {
        first_name: String,
        last_name: String,
        email: String,
        /// Reference audio recording URL
        #[arg(long)]
        audio_url: String,
        /// Reference video recording URL
        #[arg(long)]
        video_url: String,
        #[arg(long)]
        phone: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        history: Option<String>,
        /// May be repeated
        #[arg(long = "allergy")]
        allergies: Vec<String>,
        /// May be repeated
        #[arg(long = "medication")]
        medications: Vec<String>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Change selected fields of a patient
    Update {
        /// Patient id
        id: String,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        dob: Option<String>,
        #[arg(long)]
        gender: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        history: Option<String>,
        /// pending, confirmed or cancelled
        #[arg(long)]
        status: Option<DiagnosisStatus>,
        /// Model confidence between 0 and 1
        #[arg(long)]
        confidence: Option<f64>,
        #[arg(long)]
        notes: Option<String>,
        /// Remove the stored notes
        #[arg(long, conflicts_with = "notes")]
        clear_notes: bool,
    },
    /// Record the diagnosis outcome
    Diagnose {
        /// Patient id
        id: String,
        /// Diagnosis text
        result: String,
    },
    /// Delete a patient
    Delete {
        /// Patient id
        id: String,
    },
    /// Edit a patient's allergies
    Allergy {
        #[command(subcommand)]
        action: EntryAction,
    },
    /// Edit a patient's medications
    Medication {
        #[command(subcommand)]
        action: EntryAction,
    },
}

#[derive(Subcommand)]
enum EntryAction {
    /// Append an entry
    Add {
        /// Patient id
        id: String,
        entry: String,
    },
    /// Remove the entry at an index (as numbered by `show`)
    Remove {
        /// Patient id
        id: String,
        index: usize,
    },
}

impl EntryAction {
    fn patient_id(&self) -> &str {
        match self {
            EntryAction::Add { id, .. } | EntryAction::Remove { id, .. } => id,
        }
    }
}

#[derive(Clone, Copy)]
enum EntryList {
    Allergies,
    Medications,
}

#[tokio::main]
async fn main() -> CliResult {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medboard_cli=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("Use --help to see available commands.");
        return Ok(());
    };

    let config = GatewayConfig::from_env_value(std::env::var("MEDBOARD_API_URL").ok())?;
    let (toasts, mut rx) = ToastChannel::open();
    let mut gateway = PatientGateway::new(config, toasts);

    let result = run(&mut gateway, command).await;

    gateway.notifier().close();
    while let Some(toast) = rx.recv().await {
        if toast.is_error() {
            eprintln!("{}", render::toast_line(&toast));
        } else {
            println!("{}", render::toast_line(&toast));
        }
    }

    if let Err(e) = result {
        tracing::debug!("command failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn run<N: Notifier>(gateway: &mut PatientGateway<N>, command: Commands) -> CliResult {
    match command {
        Commands::List {
            search,
            status,
            tab,
        } => {
            gateway.fetch_patients().await?;
            let query = ViewQuery {
                search,
                status,
                tab,
            };
            let visible = query.apply(gateway.patients(), today_utc());
            if visible.is_empty() {
                println!("No patients found.");
            }
            for patient in visible {
                println!("{}", render::patient_row(patient));
            }
        }
        Commands::Stats => {
            let patients = gateway.fetch_patients().await?;
            let stats = compute_stats(patients, today_utc());
            println!("{}", render::stats_summary(&stats));
        }
        Commands::Show { id } => {
            let id = PatientId::parse(&id)?;
            let patient = gateway.fetch_patient(&id).await?;
            println!("{}", render::patient_detail(patient, today_utc()));
        }
        Commands::Create {
            first_name,
            last_name,
            email,
            audio_url,
            video_url,
            phone,
            dob,
            gender,
            address,
            history,
            allergies,
            medications,
            notes,
        } => {
            let new = NewPatient {
                first_name: Some(first_name),
                last_name: Some(last_name),
                email: Some(email),
                phone,
                date_of_birth: dob,
                gender,
                address,
                medical_history: history,
                allergies,
                medications,
                notes,
                audio_file_url: Some(audio_url),
                video_file_url: Some(video_url),
                ..NewPatient::default()
            };
            let patient = gateway.create_patient(&new).await?;
            println!("Created patient with ID: {}", patient.id);
        }
        Commands::Update {
            id,
            first_name,
            last_name,
            email,
            phone,
            dob,
            gender,
            address,
            history,
            status,
            confidence,
            notes,
            clear_notes,
        } => {
            let id = PatientId::parse(&id)?;
            let update = PatientUpdate {
                first_name: first_name.map(Some),
                last_name: last_name.map(Some),
                email: email.map(Some),
                phone: phone.map(Some),
                date_of_birth: dob.map(Some),
                gender: gender.map(Some),
                address: address.map(Some),
                medical_history: history.map(Some),
                status,
                model_confidence: confidence.map(Some),
                notes: if clear_notes { Some(None) } else { notes.map(Some) },
                ..PatientUpdate::default()
            };
            if update == PatientUpdate::default() {
                println!("Nothing to update.");
                return Ok(());
            }
            let patient = gateway.update_patient(&id, &update).await?;
            println!("Updated patient with ID: {}", patient.id);
        }
        Commands::Diagnose { id, result } => {
            let id = PatientId::parse(&id)?;
            gateway.update_diagnosis(&id, &result).await?;
        }
        Commands::Delete { id } => {
            let id = PatientId::parse(&id)?;
            gateway.delete_patient(&id).await?;
        }
        Commands::Allergy { action } => edit_entries(gateway, EntryList::Allergies, action).await?,
        Commands::Medication { action } => {
            edit_entries(gateway, EntryList::Medications, action).await?
        }
    }
    Ok(())
}

/// Loads the record, edits one list locally and saves the whole list back.
async fn edit_entries<N: Notifier>(
    gateway: &mut PatientGateway<N>,
    list: EntryList,
    action: EntryAction,
) -> CliResult {
    let id = PatientId::parse(action.patient_id())?;
    let patient = gateway.fetch_patient(&id).await?;

    let current = match list {
        EntryList::Allergies => &patient.allergies,
        EntryList::Medications => &patient.medications,
    };
    let edited = match action {
        EntryAction::Add { entry, .. } => append_entry(current, &entry),
        EntryAction::Remove { index, .. } => {
            if index >= current.len() {
                println!("No entry at index {index}; nothing changed.");
                return Ok(());
            }
            remove_entry(current, index)
        }
    };

    let update = match list {
        EntryList::Allergies => PatientUpdate {
            allergies: Some(Some(edited)),
            ..PatientUpdate::default()
        },
        EntryList::Medications => PatientUpdate {
            medications: Some(Some(edited)),
            ..PatientUpdate::default()
        },
    };
    gateway.update_patient(&id, &update).await?;
    Ok(())
}
