//! Structured data formats a config file can be parsed as.

use crate::error::{ConfigError, Result};
use serde_json::Value;
use std::fmt;
use std::path::Path;

/// Literal data formats understood without an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Json,
    Yaml,
    Toml,
}

impl DataFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(DataFormat::Json),
            "yaml" | "yml" => Some(DataFormat::Yaml),
            "toml" => Some(DataFormat::Toml),
            _ => None,
        }
    }

    /// Format to try for `path`. Unknown extensions are tried as JSON.
    pub fn for_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .unwrap_or(DataFormat::Json)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataFormat::Json => "json",
            DataFormat::Yaml => "yaml",
            DataFormat::Toml => "toml",
        }
    }

    /// Parse `text`. A null or empty document yields `None`.
    pub fn parse(&self, path: &Path, text: &str) -> Result<Option<Value>> {
        let value = match self {
            DataFormat::Json => serde_json::from_str::<Value>(text)
                .map_err(|e| ConfigError::parse(path, self.as_str(), e))?,
            DataFormat::Yaml => {
                if text.trim().is_empty() {
                    return Ok(None);
                }
                serde_yaml::from_str::<Value>(text)
                    .map_err(|e| ConfigError::parse(path, self.as_str(), e))?
            }
            DataFormat::Toml => {
                if text.trim().is_empty() {
                    return Ok(None);
                }
                toml::from_str::<Value>(text)
                    .map_err(|e| ConfigError::parse(path, self.as_str(), e))?
            }
        };
        Ok(Some(value).filter(|v| !v.is_null()))
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
