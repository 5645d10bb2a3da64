//! Graph database configurations
//!
//! Each configuration file in a directory describes one graph database the
//! user can import from: a display name, the graph type used to pick a
//! factory from the [`GraphRegistry`](crate::registry::GraphRegistry), an
//! optional location and free-form driver properties.
//!
//! ```toml
//! graph-name = "Temporal store"
//! graph-type = "fluxgraph"
//! graph-location = "datomic:free://localhost:4334/schema"
//!
//! [properties]
//! cache-size = "512"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name given to configurations whose `graph-name` is blank
pub const UNKNOWN_GRAPH_NAME: &str = "Unknown database - check configuration element graph-name";

/// Errors raised while loading configurations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Graph configuration directory does not exist: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("No graph configuration files found in {0}")]
    NoConfigurations(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration file {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Missing or empty configuration element: {0}")]
    MissingElement(&'static str),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// One graph database configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfiguration {
    #[serde(rename = "graph-name", default)]
    pub name: String,

    #[serde(rename = "graph-type")]
    pub graph_type: String,

    #[serde(rename = "graph-location", default)]
    pub location: Option<String>,

    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

impl GraphConfiguration {
    pub fn new(name: impl Into<String>, graph_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            graph_type: graph_type.into(),
            location: None,
            properties: BTreeMap::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// The trimmed location, required by stores that connect somewhere
    pub fn require_location(&self) -> ConfigResult<&str> {
        match self.location.as_deref().map(str::trim) {
            Some(location) if !location.is_empty() => Ok(location),
            _ => Err(ConfigError::MissingElement("graph-location")),
        }
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    fn normalized(mut self) -> Self {
        if self.name.trim().is_empty() {
            self.name = UNKNOWN_GRAPH_NAME.to_string();
        } else {
            self.name = self.name.trim().to_string();
        }
        self
    }
}

/// Load every configuration file in `dir`, keyed by graph name
///
/// `*.toml` and `*.json` files are read in file name order; other files are
/// ignored. When two files share a graph name the later one wins.
pub fn load_configurations(dir: &Path) -> ConfigResult<BTreeMap<String, GraphConfiguration>> {
    if !dir.exists() {
        return Err(ConfigError::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(ConfigError::NotADirectory(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| ConfigError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && config_format(&path).is_some() {
            files.push(path);
        }
    }
    files.sort();

    if files.is_empty() {
        return Err(ConfigError::NoConfigurations(dir.to_path_buf()));
    }

    let mut configurations = BTreeMap::new();
    for path in files {
        let configuration = load_configuration(&path)?;
        debug!(
            name = %configuration.name,
            graph_type = %configuration.graph_type,
            path = %path.display(),
            "Loaded graph configuration"
        );
        if let Some(previous) = configurations.insert(configuration.name.clone(), configuration) {
            warn!(
                "Graph configuration '{}' in {} replaces an earlier one",
                previous.name,
                path.display()
            );
        }
    }

    Ok(configurations)
}

/// Load a single configuration file
pub fn load_configuration(path: &Path) -> ConfigResult<GraphConfiguration> {
    let format = config_format(path).ok_or_else(|| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: "unsupported file extension".to_string(),
    })?;
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let parsed = match format {
        ConfigFormat::Toml => GraphConfiguration::from_toml(&text).map_err(|e| e.to_string()),
        ConfigFormat::Json => GraphConfiguration::from_json(&text).map_err(|e| e.to_string()),
    };

    parsed
        .map(GraphConfiguration::normalized)
        .map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigFormat {
    Toml,
    Json,
}

fn config_format(path: &Path) -> Option<ConfigFormat> {
    match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
        "toml" => Some(ConfigFormat::Toml),
        "json" => Some(ConfigFormat::Json),
        _ => None,
    }
}
