//! Datafeed settings loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file) yields a working
//! anonymous configuration against the public Hub.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use thiserror::Error;

use crate::datafeed::Granularity;

/// What a query does when the time-series fetch itself fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchFailurePolicy {
    /// Return the error to the caller.
    #[default]
    Propagate,
    /// Report a diagnostic and return no bars.
    Report,
}

/// Credentials forwarded to the dataset transport.
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: SecretString::new("".into()),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HubSettings {
    pub endpoint: String,
    pub config: String,
    pub split: String,
    /// Request timeout; `None` blocks until the server answers.
    pub timeout_secs: Option<u64>,
}

impl Default for HubSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://huggingface.co".into(),
            config: "default".into(),
            split: "train".into(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub namespace: String,
    pub universe: String,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            namespace: "edarchimbaud".into(),
            universe: "perimeter-stocks".into(),
        }
    }
}

impl DatasetSettings {
    /// Dataset id of the symbol universe, e.g. `edarchimbaud/perimeter-stocks`.
    pub fn universe_dataset(&self) -> String {
        format!("{}/{}", self.namespace, self.universe)
    }

    /// Dataset id of a time-series table, e.g. `edarchimbaud/timeseries-1d-stocks`.
    pub fn timeseries_dataset(&self, granularity: Granularity) -> String {
        format!(
            "{}/timeseries-{}-stocks",
            self.namespace,
            granularity.as_str()
        )
    }
}

/// Complete datafeed configuration.
#[derive(Debug, Default)]
pub struct DatafeedSettings {
    pub credentials: Credentials,
    pub fetch_failure: FetchFailurePolicy,
    pub hub: HubSettings,
    pub datasets: DatasetSettings,
}

/// On-disk shape of the settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SettingsFile {
    datafeed: DatafeedSection,
    hub: HubSettings,
    datasets: DatasetSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatafeedSection {
    username: String,
    password: String,
    fetch_failure: FetchFailurePolicy,
}

impl DatafeedSettings {
    /// Load settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse settings from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = toml::from_str(content)?;
        let settings = Self {
            credentials: Credentials {
                username: file.datafeed.username,
                password: SecretString::new(file.datafeed.password.into()),
            },
            fetch_failure: file.datafeed.fetch_failure,
            hub: file.hub,
            datasets: file.datasets,
        };
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), SettingsError> {
        let endpoint = &self.hub.endpoint;
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(SettingsError::Invalid(format!(
                "hub.endpoint must be an http(s) URL, got '{endpoint}'"
            )));
        }
        if self.hub.timeout_secs == Some(0) {
            return Err(SettingsError::Invalid(
                "hub.timeout_secs must be > 0 (omit it for no timeout)".into(),
            ));
        }
        if self.datasets.namespace.trim().is_empty() {
            return Err(SettingsError::Invalid("datasets.namespace is empty".into()));
        }
        if self.datasets.universe.trim().is_empty() {
            return Err(SettingsError::Invalid("datasets.universe is empty".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}
