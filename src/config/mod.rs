//! Configuration module for faculty-connect
//!
//! Handles loading and validating settings from YAML files and environment variables.

mod settings;

pub use settings::*;

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{field} is not a valid URL ({value}): {source}")]
    InvalidUrl {
        field: &'static str,
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("service.request_timeout is out of range: {0} seconds")]
    InvalidTimeout(f64),
}

/// Environment variable naming an explicit settings file
pub const SETTINGS_PATH_ENV: &str = "FACULTY_CONNECT_SETTINGS_PATH";

/// Load settings, preferring `explicit`, then the environment, then the
/// default locations, and finally built-in defaults.
///
/// Returns the file that was read, if any, so the caller can report it once
/// logging is up.
pub fn load(explicit: Option<&Path>) -> Result<(Settings, Option<PathBuf>), ConfigError> {
    let path = locate(explicit);
    let mut settings = match path {
        Some(ref path) => Settings::from_file(path)?,
        None => Settings::default(),
    };
    settings.merge_env();
    settings.validate()?;
    Ok((settings, path))
}

fn locate(explicit: Option<&Path>) -> Option<PathBuf> {
    // An explicit path is returned even when missing so the read error surfaces
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(SETTINGS_PATH_ENV) {
        let path = PathBuf::from(path);
        if path.exists() {
            return Some(path);
        }
    }

    let mut candidates = vec![
        PathBuf::from("settings.yml"),
        PathBuf::from("config/settings.yml"),
    ];
    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("faculty-connect/settings.yml"));
    }

    candidates.into_iter().find(|p| p.exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = load(Some(&dir.path().join("absent.yml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        std::fs::write(&path, "ui:\n  specialization_max_chars: 40\n").unwrap();

        let (settings, source) = load(Some(&path)).unwrap();
        assert_eq!(settings.ui.specialization_max_chars, 40);
        assert_eq!(source.as_deref(), Some(path.as_path()));
    }

    #[test]
    fn test_load_rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.yml");
        std::fs::write(&path, "results:\n  image_base_url: \"::nope\"\n").unwrap();

        assert!(matches!(
            load(Some(&path)),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }
}
