use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Text written for a cell that is missing from its row.
pub const PLACEHOLDER: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Impact {
    High,
    Medium,
    Low,
    Holiday,
    Unknown,
}

/// One event row of a day's calendar table.
///
/// Field names are renamed so that serializing a record produces the day
/// file's header: `Time,Currency,Impact,Event,Actual,Forecast,Previous`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarRecord {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Currency")]
    pub currency: String,
    #[serde(rename = "Impact")]
    pub impact: Impact,
    #[serde(rename = "Event")]
    pub event: String,
    #[serde(rename = "Actual")]
    pub actual: String,
    #[serde(rename = "Forecast")]
    pub forecast: String,
    #[serde(rename = "Previous")]
    pub previous: String,
}

pub const HEADER: [&str; 7] = [
    "Time", "Currency", "Impact", "Event", "Actual", "Forecast", "Previous",
];

/// Exact-match lookup from the impact marker's class string to an [`Impact`].
#[derive(Debug, Clone)]
pub struct ImpactLookup {
    classes: HashMap<String, Impact>,
}

impl ImpactLookup {
    pub fn new<S: Into<String>>(classes: impl IntoIterator<Item = (S, Impact)>) -> Self {
        Self {
            classes: classes
                .into_iter()
                .map(|(class, impact)| (class.into(), impact))
                .collect(),
        }
    }

    /// Unmapped (including empty) class strings are [`Impact::Unknown`].
    pub fn classify(&self, class: &str) -> Impact {
        self.classes
            .get(class.trim())
            .copied()
            .unwrap_or(Impact::Unknown)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Impact)> {
        self.classes.iter().map(|(class, impact)| (class.as_str(), *impact))
    }
}

impl Default for ImpactLookup {
    fn default() -> Self {
        Self::new([
            ("icon icon--ff-impact-red", Impact::High),
            ("icon icon--ff-impact-ora", Impact::Medium),
            ("icon icon--ff-impact-yel", Impact::Low),
            ("icon icon--ff-impact-gra", Impact::Holiday),
        ])
    }
}
