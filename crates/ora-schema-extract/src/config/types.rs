//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection parameters.
    pub connection: ConnectionConfig,

    /// Extraction behavior configuration.
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

/// Oracle connection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Database host.
    pub host: String,

    /// Listener port (default: 1521).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Service name. Either this or `sid` must be set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,

    /// System identifier, used instead of a service name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    /// Username.
    pub user: String,

    /// Password.
    pub password: String,
}

/// Extraction behavior configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Schemas to extract.
    #[serde(default)]
    pub schemas: Vec<String>,

    /// Base output directory for the file tree and manifest.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Optional subset of object type identifiers to extract. All twelve
    /// catalog types are extracted when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_types: Option<Vec<String>>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            schemas: Vec::new(),
            output_dir: default_output_dir(),
            object_types: None,
        }
    }
}

impl ConnectionConfig {
    /// Build the connect descriptor for the Oracle driver. Service names
    /// use EZCONNECT; SIDs need a full descriptor.
    pub fn connect_descriptor(&self) -> String {
        if let Some(ref service) = self.service {
            format!("//{}:{}/{}", self.host, self.port, service)
        } else if let Some(ref sid) = self.sid {
            format!(
                "(DESCRIPTION=(ADDRESS=(PROTOCOL=TCP)(HOST={})(PORT={}))(CONNECT_DATA=(SID={})))",
                self.host, self.port, sid
            )
        } else {
            String::new()
        }
    }

    /// Database identifier recorded in the manifest.
    pub fn identifier(&self) -> String {
        self.service
            .clone()
            .or_else(|| self.sid.clone())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }
}

fn default_port() -> u16 {
    1521
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("extract_output")
}
