//! The structured shape a Warm row's `content` JSON decodes to (§4.7).

use serde::{Deserialize, Serialize};

/// One session's distilled outcome, written to Warm at `SESSION_END`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WarmSummary {
    /// What the session accomplished.
    pub accomplished: Vec<String>,
    /// Tests completed during the session.
    pub tests_completed: Vec<String>,
    /// One-line status at session end.
    pub status_string: String,
    /// Suggested next steps for a future session.
    pub next_steps: Vec<String>,
    /// Issues discovered but not necessarily fixed.
    pub issues_found: Vec<String>,
    /// Issues discovered and fixed.
    pub issues_fixed: Vec<String>,
    /// Free-text notes.
    pub notes: String,
}

impl WarmSummary {
    /// Serialize to the JSON text a [`arcadia_storage::models::MemoryRow`]
    /// stores as its `content`.
    ///
    /// # Panics
    ///
    /// Never — every field is a plain `String`/`Vec<String>`.
    #[must_use]
    pub fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a Warm row's `content` back into a summary. Falls back to
    /// a summary whose `notes` carries the raw text if it isn't valid
    /// JSON (e.g. a row written before this shape existed).
    #[must_use]
    pub fn from_content(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|_| Self {
            notes: content.to_string(),
            ..Self::default()
        })
    }

    /// Whitespace-tokenized, lowercased keywords drawn from every text
    /// field, for the Cold keyword index.
    #[must_use]
    pub fn keywords(&self) -> Vec<String> {
        let mut words: Vec<String> = self
            .accomplished
            .iter()
            .chain(&self.tests_completed)
            .chain(&self.next_steps)
            .chain(&self.issues_found)
            .chain(&self.issues_fixed)
            .chain(std::iter::once(&self.status_string))
            .chain(std::iter::once(&self.notes))
            .flat_map(|text| text.split_whitespace())
            .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
            .filter(|word| !word.is_empty())
            .collect();
        words.sort();
        words.dedup();
        words
    }
}
