//! Plain-text rendering of patients for the terminal.

use chrono::NaiveDate;
use medboard_client::display::{
    age_on, capitalize_words, format_date, format_phone_number, initials, truncate,
};
use medboard_client::Toast;
use medboard_core::views::{derived_status, DerivedStatus};
use medboard_core::{DashboardStats, Patient};

const NAME_WIDTH: usize = 24;
const EMAIL_WIDTH: usize = 28;

fn status_label(patient: &Patient) -> &'static str {
    match derived_status(patient) {
        DerivedStatus::Pending => "pending",
        DerivedStatus::Confirmed => "confirmed",
    }
}

/// One dashboard row: id, name, email, derived status and creation date.
pub fn patient_row(patient: &Patient) -> String {
    format!(
        "{}  {:<name_w$}  {:<email_w$}  {:<9}  {}",
        patient.id,
        truncate(&patient.full_name(), NAME_WIDTH - 3),
        truncate(patient.email.as_str(), EMAIL_WIDTH - 3),
        status_label(patient),
        patient.created_at.format("%Y-%m-%d"),
        name_w = NAME_WIDTH,
        email_w = EMAIL_WIDTH,
    )
}

pub fn stats_summary(stats: &DashboardStats) -> String {
    format!(
        "Total: {}\nPending: {}\nConfirmed: {}\nToday: {}",
        stats.total, stats.pending, stats.confirmed, stats.today
    )
}

fn numbered(entries: &[String]) -> String {
    if entries.is_empty() {
        return "  (none)".into();
    }
    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| format!("  [{i}] {entry}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Full record view. Allergy and medication entries carry the index used by `remove`.
pub fn patient_detail(patient: &Patient, today: NaiveDate) -> String {
    let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".into());

    let dob = match patient.date_of_birth.as_deref() {
        Some(dob) => match age_on(dob, today) {
            Some(age) => format!("{} (age {})", format_date(Some(dob)), age),
            None => format_date(Some(dob)),
        },
        None => format_date(None),
    };
    let diagnosis = match patient.model_result.as_deref() {
        Some(result) if !result.is_empty() => result.to_string(),
        _ => "Pending".into(),
    };
    let confidence = patient
        .model_confidence
        .map(|c| format!("{:.0}%", c * 100.0))
        .unwrap_or_else(|| "N/A".into());
    let created = patient.created_at.to_rfc3339();
    let last_visit = patient.last_visit.map(|v| v.to_rfc3339());

    [
        format!(
            "[{}] {}",
            initials(patient.first_name.as_str(), patient.last_name.as_str()),
            patient.full_name()
        ),
        format!("ID:              {}", patient.id),
        format!("Email:           {}", patient.email),
        format!(
            "Phone:           {}",
            patient
                .phone
                .as_deref()
                .map(format_phone_number)
                .unwrap_or_else(|| "N/A".into())
        ),
        format!("Date of birth:   {dob}"),
        format!(
            "Gender:          {}",
            patient
                .gender
                .as_deref()
                .map(capitalize_words)
                .unwrap_or_else(|| "N/A".into())
        ),
        format!("Address:         {}", or_na(&patient.address)),
        format!("Medical history: {}", or_na(&patient.medical_history)),
        format!("Allergies:\n{}", numbered(&patient.allergies)),
        format!("Medications:\n{}", numbered(&patient.medications)),
        format!("Diagnosis:       {diagnosis} ({})", status_label(patient)),
        format!("Confidence:      {confidence}"),
        format!("Status:          {}", patient.status),
        format!("Created:         {}", format_date(Some(&created))),
        format!("Last visit:      {}", format_date(last_visit.as_deref())),
        format!("Notes:           {}", or_na(&patient.notes)),
        format!("Audio:           {}", patient.audio_file_url),
        format!("Video:           {}", patient.video_file_url),
    ]
    .join("\n")
}

pub fn toast_line(toast: &Toast) -> String {
    format!("[{}] {}", toast.title, toast.description)
}
