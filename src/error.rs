//! Error types for config discovery and loading.
//!
//! Only genuine failures live here. "No file found", "file produced no value"
//! and "rewrite rejected the file" are encoded in return shapes, never as errors.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can escape a load.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path} as {format}: {message}")]
    Parse {
        path: PathBuf,
        format: &'static str,
        message: String,
    },

    #[error("Failed to evaluate {path}: {message}")]
    Evaluate { path: PathBuf, message: String },

    #[error("Hook failed for {path}: {source}")]
    Hook {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("No evaluator available to load {path} as code")]
    NoEvaluator { path: PathBuf },

    #[error("Computation suspended under the blocking driver")]
    Suspended,
}

impl ConfigError {
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub fn parse(path: impl AsRef<Path>, format: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            format,
            message: err.to_string(),
        }
    }

    pub fn evaluate(path: impl AsRef<Path>, err: impl std::fmt::Display) -> Self {
        Self::Evaluate {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }

    pub fn hook(path: impl AsRef<Path>, source: anyhow::Error) -> Self {
        Self::Hook {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Path of the file the error relates to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Io { path, .. }
            | ConfigError::Parse { path, .. }
            | ConfigError::Evaluate { path, .. }
            | ConfigError::Hook { path, .. }
            | ConfigError::NoEvaluator { path } => Some(path),
            ConfigError::Suspended => None,
        }
    }
}

/// Result type for config operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_path() {
        let err = ConfigError::parse("/tmp/app.json", "json", "expected value");
        assert_eq!(err.path(), Some(Path::new("/tmp/app.json")));
        assert!(err.to_string().contains("as json"));
        assert!(ConfigError::Suspended.path().is_none());
    }

    #[test]
    fn test_hook_error_keeps_source() {
        let err = ConfigError::hook("/tmp/app.ts", anyhow::anyhow!("boom"));
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "boom");
    }
}
