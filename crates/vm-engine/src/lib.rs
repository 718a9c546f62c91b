pub mod fairness;
pub mod logging;
pub mod matching;
pub mod similarity;
pub mod skill_gap;
pub mod text;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use matching::pipeline::{EngineConfig, MatchingEngine};
pub use matching::scoring::MatchResult;

// Commonly used data models for the matching functions. These arrive
// already deserialized from the repository layer; scoring code never
// touches raw documents.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Default for SkillLevel {
    fn default() -> Self {
        SkillLevel::Beginner
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
    #[serde(default)]
    pub years_experience: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VolunteerProfile {
    pub volunteer_id: String,
    #[serde(default)]
    pub skills: Vec<Skill>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub availability: Option<Availability>,
}

impl VolunteerProfile {
    /// Skill names as plain strings, the shape every scorer consumes.
    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name.clone()).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub job_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub organization: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub skills_required: Vec<String>,
    #[serde(default)]
    pub time_commitment: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Busy,
    PartiallyAvailable,
}

/// One weekly availability slot. Older profile documents carry a bare
/// `available` boolean instead of `status`; both forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySlot {
    pub day_of_week: u8,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub status: Option<SlotStatus>,
    #[serde(default)]
    pub available: Option<bool>,
}

impl AvailabilitySlot {
    /// A slot counts as open when status says so, or when the legacy
    /// boolean flag is set on documents that predate the status field.
    pub fn is_open(&self) -> bool {
        match self.status {
            Some(status) => status == SlotStatus::Available,
            None => self.available.unwrap_or(false),
        }
    }

    pub fn is_weekend(&self) -> bool {
        self.day_of_week == 5 || self.day_of_week == 6
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferredDays {
    Weekdays,
    Weekends,
    Flexible,
}

impl Default for PreferredDays {
    fn default() -> Self {
        PreferredDays::Flexible
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAvailability {
    #[serde(rename = "hoursPerWeek", default)]
    pub hours_per_week: Option<f64>,
    #[serde(rename = "preferredDays", default)]
    pub preferred_days: PreferredDays,
    #[serde(rename = "timePreference", default)]
    pub time_preference: Option<String>,
}

/// The two availability representations found in profile documents.
/// Both normalize to the same feature set (see `matching::availability`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Availability {
    Weekly { schedule: Vec<AvailabilitySlot> },
    Monthly(MonthlyAvailability),
}

/// Append-only assignment history row. The fairness re-ranker reads these;
/// persisting them is the calling layer's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub volunteer_id: String,
    pub job_id: String,
    pub assigned_date: DateTime<Utc>,
}
