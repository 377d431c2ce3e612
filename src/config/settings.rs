//! Settings structures for faculty-connect configuration

use super::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub service: ServiceSettings,
    pub results: ResultSettings,
    pub ui: UiSettings,
    pub server: ServerSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Merge with environment variables (FACULTY_CONNECT_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    /// Merge overrides from an arbitrary variable source
    pub fn merge_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("FACULTY_CONNECT_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Some(val) = lookup("FACULTY_CONNECT_SEARCH_URL") {
            self.service.search_url = val;
        }
        if let Some(val) = lookup("FACULTY_CONNECT_HEALTH_URL") {
            self.service.health_url = val;
        }
        if let Some(val) = lookup("FACULTY_CONNECT_IMAGE_BASE_URL") {
            self.results.image_base_url = val;
        }
        if let Some(val) = lookup("FACULTY_CONNECT_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Some(val) = lookup("FACULTY_CONNECT_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
    }

    /// Check that every configured URL parses
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("service.search_url", &self.service.search_url)?;
        check_url("service.health_url", &self.service.health_url)?;
        check_url("results.image_base_url", &self.results.image_base_url)?;
        if let Some(ref proxy) = self.service.proxy {
            check_url("service.proxy", proxy)?;
        }
        if let Some(secs) = self.service.request_timeout {
            if secs > 0.0 && Duration::try_from_secs_f64(secs).is_err() {
                return Err(ConfigError::InvalidTimeout(secs));
            }
        }
        Ok(())
    }
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    Url::parse(value)
        .map(|_| ())
        .map_err(|source| ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
            source,
        })
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Name displayed in page titles and the terminal banner
    pub instance_name: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Connect2Faculty".to_string(),
        }
    }
}

/// Remote semantic-search service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSettings {
    /// Endpoint receiving `POST {"query": ...}`
    pub search_url: String,
    /// Endpoint answering `GET` when the service is awake
    pub health_url: String,
    /// Request timeout in seconds (none = transport default)
    pub request_timeout: Option<f64>,
    /// Seconds between keep-alive probes in the terminal shell
    pub keep_alive_interval: Option<u64>,
    /// Verify TLS certificates
    pub verify_ssl: bool,
    /// Proxy for all outgoing requests
    pub proxy: Option<String>,
}

impl ServiceSettings {
    /// Configured timeout; zero, negative and unrepresentable values mean none
    pub fn timeout(&self) -> Option<Duration> {
        self.request_timeout
            .filter(|secs| *secs > 0.0)
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
    }
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            search_url: "https://faculty-connect.onrender.com/search".to_string(),
            health_url: "https://faculty-connect.onrender.com/".to_string(),
            request_timeout: None,
            keep_alive_interval: None,
            verify_ssl: true,
            proxy: None,
        }
    }
}

/// Result normalization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultSettings {
    /// Base URL that relative image paths are resolved against
    pub image_base_url: String,
    /// Image shown when a record carries none
    pub placeholder_image: String,
}

impl Default for ResultSettings {
    fn default() -> Self {
        Self {
            image_base_url: "https://www.daiict.ac.in".to_string(),
            placeholder_image: "/static/img/faculty-placeholder.svg".to_string(),
        }
    }
}

/// Output format for rendered results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Html,
}

/// UI settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Specialization text longer than this is cut with an ellipsis
    pub specialization_max_chars: usize,
    /// Format used by the terminal shell
    pub format: OutputFormat,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            specialization_max_chars: 180,
            format: OutputFormat::Text,
        }
    }
}

/// Web shell settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_address: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 8888,
        }
    }
}
