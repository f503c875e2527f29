//! Derived dashboard views over an in-memory patient list.
//!
//! Everything here is a pure function of the list (and, for date-based views, of the date
//! passed in as "today"). The pending/confirmed classification is derived from `modelResult`
//! alone: a non-empty string means confirmed, anything else means pending. The stored
//! [`crate::DiagnosisStatus`] plays no part, so a `cancelled` record without a model result is
//! still pending here.
//!
//! Search, status and tab filters are independent predicates, so they can be applied in any
//! order with the same result.

use crate::model::Patient;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedStatus {
    Pending,
    Confirmed,
}

pub fn derived_status(patient: &Patient) -> DerivedStatus {
    if is_confirmed(patient) {
        DerivedStatus::Confirmed
    } else {
        DerivedStatus::Pending
    }
}

/// True when `modelResult` is present and non-empty.
pub fn is_confirmed(patient: &Patient) -> bool {
    patient
        .model_result
        .as_deref()
        .is_some_and(|result| !result.is_empty())
}

/// True when the UTC date of `createdAt` equals `date`.
pub fn created_on(patient: &Patient, date: NaiveDate) -> bool {
    patient.created_at.date_naive() == date
}

pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown {kind} filter '{value}'")]
pub struct UnknownFilter {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Confirmed,
}

impl FromStr for StatusFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StatusFilter::All),
            "pending" => Ok(StatusFilter::Pending),
            "confirmed" => Ok(StatusFilter::Confirmed),
            _ => Err(UnknownFilter {
                kind: "status",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TabFilter {
    #[default]
    All,
    Today,
    Pending,
    Confirmed,
}

impl FromStr for TabFilter {
    type Err = UnknownFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TabFilter::All),
            "today" => Ok(TabFilter::Today),
            "pending" => Ok(TabFilter::Pending),
            "confirmed" => Ok(TabFilter::Confirmed),
            _ => Err(UnknownFilter {
                kind: "tab",
                value: s.to_string(),
            }),
        }
    }
}

/// Case-insensitive substring match against `"{firstName} {lastName} {email}"`.
///
/// An empty query matches everything.
pub fn matches_search(patient: &Patient, query: &str) -> bool {
    let haystack = format!(
        "{} {} {}",
        patient.first_name, patient.last_name, patient.email
    )
    .to_lowercase();
    haystack.contains(&query.to_lowercase())
}

pub fn matches_status(patient: &Patient, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Pending => !is_confirmed(patient),
        StatusFilter::Confirmed => is_confirmed(patient),
    }
}

pub fn matches_tab(patient: &Patient, tab: TabFilter, today: NaiveDate) -> bool {
    match tab {
        TabFilter::All => true,
        TabFilter::Today => created_on(patient, today),
        TabFilter::Pending => !is_confirmed(patient),
        TabFilter::Confirmed => is_confirmed(patient),
    }
}

pub fn filter_by_search<'a, I>(patients: I, query: &str) -> Vec<&'a Patient>
where
    I: IntoIterator<Item = &'a Patient>,
{
    patients
        .into_iter()
        .filter(|p| matches_search(p, query))
        .collect()
}

pub fn filter_by_status<'a, I>(patients: I, filter: StatusFilter) -> Vec<&'a Patient>
where
    I: IntoIterator<Item = &'a Patient>,
{
    patients
        .into_iter()
        .filter(|p| matches_status(p, filter))
        .collect()
}

pub fn filter_by_tab<'a, I>(patients: I, tab: TabFilter, today: NaiveDate) -> Vec<&'a Patient>
where
    I: IntoIterator<Item = &'a Patient>,
{
    patients
        .into_iter()
        .filter(|p| matches_tab(p, tab, today))
        .collect()
}

/// The dashboard's combined search, status and tab selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub search: String,
    pub status: StatusFilter,
    pub tab: TabFilter,
}

impl ViewQuery {
    /// Patients visible under this query, in list order.
    pub fn apply<'a>(&self, patients: &'a [Patient], today: NaiveDate) -> Vec<&'a Patient> {
        patients
            .iter()
            .filter(|p| {
                matches_search(p, &self.search)
                    && matches_status(p, self.status)
                    && matches_tab(p, self.tab, today)
            })
            .collect()
    }
}

/// Headline counts, always computed over the full unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DashboardStats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub today: usize,
}

pub fn compute_stats(patients: &[Patient], today: NaiveDate) -> DashboardStats {
    let confirmed = patients.iter().filter(|p| is_confirmed(p)).count();
    DashboardStats {
        total: patients.len(),
        pending: patients.len() - confirmed,
        confirmed,
        today: patients.iter().filter(|p| created_on(p, today)).count(),
    }
}
