use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Format used for day-precision dates in every projection.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// A repository listing as returned by the remote API.
///
/// Absent string fields are represented as empty strings; only timestamps
/// keep their optionality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawListing {
    /// Remote numeric identifier.
    pub id: i64,
    /// Combined "owner/name" identifier.
    pub full_name: String,
    /// Free-text description, conventionally "category:description".
    pub description: String,
    /// Browser URL of the repository.
    pub html_url: String,
    /// Project homepage.
    pub homepage: String,
    /// Topic tags in remote order.
    pub topics: Vec<String>,
    /// Creation instant.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update instant.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Normalized repository record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Short repository name, also the key-value reconciliation key.
    pub name: String,
    /// Owner login derived from the full name.
    pub owner: String,
    /// Untouched "owner/name" string from the remote.
    pub full_name: String,
    /// Left segment of the description split on the first `:`.
    pub category: String,
    /// Right segment of the description split.
    pub description: String,
    /// Untouched description from the remote.
    pub raw_description: String,
    pub html_url: String,
    pub homepage: String,
    pub topics: Vec<String>,
    pub created_at: Option<NaiveDate>,
    pub updated_at: Option<NaiveDate>,
    /// Remote numeric identifier, stable across runs.
    pub uid: i64,
}

impl Record {
    /// Creation date as `YYYY-MM-DD`, or an empty string when unknown.
    pub fn created_day(&self) -> String {
        format_day(self.created_at)
    }

    /// Update date as `YYYY-MM-DD`, or an empty string when unknown.
    pub fn updated_day(&self) -> String {
        format_day(self.updated_at)
    }
}

fn format_day(day: Option<NaiveDate>) -> String {
    day.map(|d| d.format(DAY_FORMAT).to_string())
        .unwrap_or_default()
}
