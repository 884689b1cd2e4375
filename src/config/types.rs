//! Load results and loader state.

use super::merge::merge_layers;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;

/// Where a returned configuration came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// At least one file contributed.
    #[default]
    Files,
    /// No candidate file exists for any source; the value is `defaults`.
    NoFilesFound,
    /// Files were found, but every one was empty, rejected or skipped.
    NoUsableFiles,
}

/// A parsed configuration with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadResult {
    /// The parsed, possibly merged value.
    pub config: Value,
    /// Absolute paths of the files that contributed, strongest first.
    pub sources: Vec<PathBuf>,
    /// Files read while evaluating sources as code, when the evaluator tracks them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<Vec<PathBuf>>,
    pub origin: Origin,
}

impl LoadResult {
    /// Result for a single loaded file.
    pub fn from_file(config: Value, path: PathBuf, dependencies: Option<Vec<PathBuf>>) -> Self {
        Self {
            config,
            sources: vec![path],
            dependencies,
            origin: Origin::Files,
        }
    }

    /// Result made of `defaults` alone.
    pub fn defaults_only(defaults: Value, origin: Origin) -> Self {
        Self {
            config: defaults,
            sources: Vec::new(),
            dependencies: None,
            origin,
        }
    }

    /// Merge results in precedence order over `defaults`.
    pub fn combine(results: Vec<LoadResult>, defaults: Value) -> Self {
        let mut sources = Vec::new();
        let mut dependencies: Option<Vec<PathBuf>> = None;
        let mut layers = Vec::with_capacity(results.len());

        for result in results {
            sources.extend(result.sources);
            if let Some(deps) = result.dependencies {
                dependencies.get_or_insert_with(Vec::new).extend(deps);
            }
            layers.push(result.config);
        }

        Self {
            config: merge_layers(layers, defaults),
            sources,
            dependencies,
            origin: Origin::Files,
        }
    }

    /// Whether no file contributed to this result.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Deserialize the configuration into a typed struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        T::deserialize(&self.config)
    }
}

/// Files matched for one source during the last search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMatches {
    /// Index of the source in the loader's list.
    pub source: usize,
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn test_combine_concatenates_provenance() {
        let first = LoadResult::from_file(
            json!({"port": 1}),
            PathBuf::from("/w/a.json"),
            None,
        );
        let second = LoadResult::from_file(
            json!({"port": 2, "host": "h"}),
            PathBuf::from("/a.js"),
            Some(vec![PathBuf::from("/shared.js")]),
        );

        let combined = LoadResult::combine(vec![first, second], json!({"debug": true}));
        assert_eq!(combined.config, json!({"port": 1, "host": "h", "debug": true}));
        assert_eq!(
            combined.sources,
            vec![PathBuf::from("/w/a.json"), PathBuf::from("/a.js")]
        );
        assert_eq!(combined.dependencies, Some(vec![PathBuf::from("/shared.js")]));
        assert_eq!(combined.origin, Origin::Files);
    }

    #[test]
    fn test_combine_without_tracked_results_has_no_dependencies() {
        let only = LoadResult::from_file(json!({}), PathBuf::from("/a.json"), None);
        assert!(LoadResult::combine(vec![only], Value::Null).dependencies.is_none());
    }

    #[test]
    fn test_deserialize_typed() {
        #[derive(Deserialize)]
        struct Server {
            port: u16,
        }

        let result = LoadResult::defaults_only(json!({"port": 8080}), Origin::NoFilesFound);
        assert!(result.is_empty());
        assert_eq!(result.deserialize::<Server>().unwrap().port, 8080);
    }
}
