//! Writer configuration

use crate::rdf::NamespaceMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed YAML
    #[error("Invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// RDF/XML writer configuration
///
/// ```yaml
/// indent: "  "
/// file_mode: 384   # 0o600
/// prefixes:
///   ex: "http://example.org#"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// String repeated once per nesting level
    pub indent: String,
    /// Permission bits of files written by `write_to_file` (unix only)
    pub file_mode: u32,
    /// Namespace declarations merged over the ones passed to the serializer
    pub prefixes: NamespaceMap,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            file_mode: 0o644,
            prefixes: NamespaceMap::new(),
        }
    }
}

impl WriterConfig {
    /// Parse a YAML document
    pub fn from_yaml_str(yaml: &str) -> ConfigResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load a YAML file
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Same configuration with a different indent
    pub fn with_indent(mut self, indent: impl Into<String>) -> Self {
        self.indent = indent.into();
        self
    }
}
