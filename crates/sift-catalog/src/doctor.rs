//! Doctor directory.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sift::{Dir, Record, Sentinels, ViewConfig};

/// A provider listed in the directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Record)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    #[field(id)]
    pub id: String,

    #[field(Text)]
    pub name: String,

    #[field(Enum)]
    pub specialty: String,

    /// Spoken languages; filtering matches any of them.
    #[field(Enum)]
    #[serde(default)]
    pub languages: Vec<String>,

    #[field(Enum)]
    pub city: String,

    #[field(Enum, rename = "acceptingNewPatients")]
    pub accepting_new_patients: bool,

    #[field(Numeric)]
    #[serde(default)]
    pub rating: Option<f64>,

    #[field(Numeric, rename = "yearsExperience")]
    pub years_experience: u32,

    #[field(Date, rename = "nextAvailable")]
    #[serde(default)]
    pub next_available: Option<NaiveDate>,
}

/// The directory view: best rated first.
pub fn view_config() -> ViewConfig {
    ViewConfig::default()
        .with_searchable([Doctor::NAME, Doctor::SPECIALTY, Doctor::CITY])
        .with_facets([Doctor::SPECIALTY, Doctor::LANGUAGES, Doctor::CITY])
        .with_sentinels(Sentinels::new(["all", "All Specialties", "All Languages", "Any City"]))
        .with_page_size(12)
        .with_default_sort(Doctor::RATING, Dir::Desc)
}
