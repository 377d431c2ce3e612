//! Normalization of raw service records into [`FacultyResult`]s

use super::types::{FacultyResult, ResultSet};
use crate::config::ResultSettings;
use crate::search::RawFacultyRecord;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

/// Applies per-field fallbacks to raw records
#[derive(Debug, Clone)]
pub struct Normalizer {
    image_base: Option<Url>,
    image_base_raw: String,
    placeholder_image: String,
}

impl Normalizer {
    pub fn new(settings: &ResultSettings) -> Self {
        let image_base = Url::parse(&settings.image_base_url).ok();
        if image_base.is_none() {
            warn!(
                "Image base URL {:?} does not parse, relative images will be concatenated",
                settings.image_base_url
            );
        }

        Self {
            image_base,
            image_base_raw: settings.image_base_url.clone(),
            placeholder_image: settings.placeholder_image.clone(),
        }
    }

    /// Normalize every raw record, preserving order
    pub fn normalize_all(&self, records: &[Value]) -> ResultSet {
        records
            .iter()
            .enumerate()
            .map(|(position, value)| self.normalize_value(position, value))
            .collect()
    }

    /// Normalize one raw JSON element. Elements that do not decode as a
    /// record are kept with every fallback applied.
    pub fn normalize_value(&self, position: usize, value: &Value) -> FacultyResult {
        let record = match RawFacultyRecord::deserialize_lenient(value) {
            Ok(record) => record,
            Err(e) => {
                warn!("Result #{} is not a faculty record: {}", position, e);
                RawFacultyRecord::default()
            }
        };
        self.normalize(record)
    }

    pub fn normalize(&self, record: RawFacultyRecord) -> FacultyResult {
        if record.score.is_none() {
            debug!("Record {:?} has no score", record.name);
        }

        FacultyResult {
            image_url: self.image_url(record.image_url.as_deref()),
            name: record.name.unwrap_or_default(),
            specialization: record.specialization.unwrap_or_default(),
            score: record.score.unwrap_or(0.0),
            profile_url: record.profile_url.unwrap_or_default(),
            teaching: record.teaching,
            publications: record.publications,
        }
    }

    /// Absolute image URL for a raw value
    pub fn image_url(&self, raw: Option<&str>) -> String {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() => raw,
            _ => return self.placeholder_image.clone(),
        };

        if is_absolute(raw) {
            return raw.to_string();
        }

        match self.image_base.as_ref().and_then(|base| base.join(raw).ok()) {
            Some(url) => url.to_string(),
            None => format!(
                "{}/{}",
                self.image_base_raw.trim_end_matches('/'),
                raw.trim_start_matches('/')
            ),
        }
    }
}

fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

impl RawFacultyRecord {
    /// Decode a record, tolerating non-object elements and mistyped fields
    pub fn deserialize_lenient(value: &Value) -> Result<Self, serde_json::Error> {
        let Some(map) = value.as_object() else {
            return serde_json::from_value(value.clone());
        };

        let text = |key: &str| match map.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        Ok(Self {
            name: text("name"),
            specialization: text("specialization"),
            score: map.get("score").and_then(|s| match s {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse().ok(),
                _ => None,
            }),
            image_url: text("image_url"),
            profile_url: text("profile_url"),
            teaching: text("teaching"),
            publications: text("publications"),
        })
    }
}
