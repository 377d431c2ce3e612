//! Result type definitions

use serde::{Deserialize, Serialize};

/// A single normalized search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacultyResult {
    /// Display name (empty when the service sent none)
    pub name: String,
    /// Research areas, free text
    pub specialization: String,
    /// Relevance as returned by the service, nominally in [0, 1]
    pub score: f64,
    /// Absolute image URL, or the configured placeholder
    pub image_url: String,
    /// Outbound profile link, passed through untouched
    pub profile_url: String,
    /// Courses taught, when the service includes them
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub teaching: Option<String>,
    /// Publication summary, when the service includes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publications: Option<String>,
}

impl FacultyResult {
    /// Score as a whole percentage, `round(score * 100)`.
    ///
    /// Out-of-range scores are not clamped, so 1.5 yields 150.
    pub fn match_percent(&self) -> i64 {
        (self.score * 100.0).round() as i64
    }
}

/// Results for the current query, in the order the service ranked them
pub type ResultSet = Vec<FacultyResult>;
