use crate::error::{EmotionError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::{path::Path, time::Duration};

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_COLLECTOR_URL: &str = "https://api.example.com";

pub const ENV_BACKEND: &str = "EMOTION_BACKEND";
pub const ENV_ANALYZER_URL: &str = "EMOTION_ANALYZER_URL";
pub const ENV_API_KEY: &str = "EMOTION_API_KEY";

/// Loads a JSON object from disk.
///
/// A missing file, unreadable file, malformed JSON or a non-object document
/// is logged and yields an empty map.
pub fn load_config(path: impl AsRef<Path>) -> Map<String, Value> {
    let path = path.as_ref();
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("Configuration file not found: {}", path.display());
            return Map::new();
        }
        Err(e) => {
            log::warn!("Failed to read configuration file {}: {}", path.display(), e);
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&text) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            log::warn!("Configuration file is not a JSON object: {}", path.display());
            Map::new()
        }
        Err(e) => {
            log::warn!("Invalid JSON in configuration file {}: {}", path.display(), e);
            Map::new()
        }
    }
}

/// Which facial-analysis capability to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Remote,
    #[default]
    Demo,
}

impl std::str::FromStr for BackendKind {
    type Err = EmotionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "remote" => Ok(BackendKind::Remote),
            "demo" => Ok(BackendKind::Demo),
            other => Err(EmotionError::Config(format!("unknown backend: {other}"))),
        }
    }
}

/// Settings of the facial-analysis capability, the `analyzer` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Requested capability; `remote` without a `base_url` runs the demo.
    pub backend: BackendKind,
    /// Root URL of the remote analysis service.
    pub base_url: Option<String>,
    /// Bearer token for the remote service.
    pub api_key: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Ask the capability to fail when no face is found.
    pub enforce_detection: bool,
    /// Fixes the demo capability's random source.
    pub demo_seed: Option<u64>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            base_url: None,
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            enforce_detection: false,
            demo_seed: None,
        }
    }
}

impl AnalyzerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Settings of the sample collector, the `collector` section.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Root URL of the external data source.
    pub base_url: String,
    /// Bearer token for the data source.
    pub api_key: Option<String>,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_COLLECTOR_URL.to_string(),
            api_key: None,
        }
    }
}

/// Typed application settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub analyzer: AnalyzerConfig,
    pub collector: CollectorConfig,
}

impl AppConfig {
    /// Maps a loaded JSON object onto typed settings.
    pub fn from_map(map: Map<String, Value>) -> Result<Self> {
        serde_json::from_value(Value::Object(map))
            .map_err(|e| EmotionError::Config(e.to_string()))
    }

    /// Loads settings from a JSON file. Anything unusable falls back to the
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Self {
        Self::from_map(load_config(path)).unwrap_or_else(|e| {
            log::warn!("Ignoring configuration: {}", e);
            Self::default()
        })
    }

    /// Applies `EMOTION_BACKEND`, `EMOTION_ANALYZER_URL` and
    /// `EMOTION_API_KEY` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(backend) = lookup(ENV_BACKEND) {
            match backend.parse() {
                Ok(kind) => self.analyzer.backend = kind,
                Err(e) => log::warn!("Ignoring {}: {}", ENV_BACKEND, e),
            }
        }
        if let Some(url) = lookup(ENV_ANALYZER_URL) {
            self.analyzer.base_url = Some(url);
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.analyzer.api_key = Some(key.clone());
            self.collector.api_key = Some(key);
        }
        self
    }
}
