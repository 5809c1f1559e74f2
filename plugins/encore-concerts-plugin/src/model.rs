//! Concert records.

use chrono::{DateTime, NaiveDate, Utc};
use encore_plugin_api::{PluginError, PluginResult};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concert {
    pub id: String,
    pub title: String,
    pub venue: String,
    pub city: String,
    pub date: NaiveDate,
    /// Free-form start time, e.g. "20:00".
    pub time: String,
    pub description: Option<String>,
    pub ticket_url: Option<String>,
    pub image_url: Option<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Concert {
    #[must_use]
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }
}

/// Body of create and update requests.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcertInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub city: String,
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: String,
    pub description: Option<String>,
    pub ticket_url: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub published: bool,
}

impl ConcertInput {
    /// Checks required fields and normalizes empty optionals to `None`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidInput`] naming the first missing field.
    pub fn validated(mut self) -> PluginResult<(Self, NaiveDate)> {
        for (name, value) in [("title", &self.title), ("venue", &self.venue), ("city", &self.city)] {
            if value.trim().is_empty() {
                return Err(PluginError::invalid_input(format!("{name} is required")));
            }
        }
        let date = self
            .date
            .ok_or_else(|| PluginError::invalid_input("date is required"))?;

        for field in [&mut self.description, &mut self.ticket_url, &mut self.image_url] {
            if field.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *field = None;
            }
        }
        Ok((self, date))
    }
}
