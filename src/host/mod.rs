//! Host collaborators: file system access and module evaluation.
//!
//! Every operation exists twice, once blocking and once non-blocking. The
//! execution mode picked at the outermost call decides which variant runs
//! (see [`crate::dual`]).

mod command;
mod fs;

pub use command::CommandEvaluator;
pub use fs::StdFileSystem;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File system primitives used while searching and loading.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Whether `path` is a regular file. Never fails; any error means `false`.
    fn is_file_blocking(&self, path: &Path, follow_symlinks: bool) -> bool;

    async fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool;

    fn read_to_string_blocking(&self, path: &Path) -> io::Result<String>;

    async fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn write_blocking(&self, path: &Path, contents: &str) -> io::Result<()>;

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    fn remove_file_blocking(&self, path: &Path) -> io::Result<()>;

    async fn remove_file(&self, path: &Path) -> io::Result<()>;
}

/// Output of evaluating a config file as code.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluated {
    /// The exported value, possibly still wrapped in a default-export marker.
    pub value: Value,
    /// Files read during evaluation. Only tracked evaluators report these.
    pub dependencies: Option<Vec<PathBuf>>,
}

impl Evaluated {
    pub fn new(value: Value) -> Self {
        Self {
            value,
            dependencies: None,
        }
    }

    pub fn with_dependencies(mut self, dependencies: Vec<PathBuf>) -> Self {
        self.dependencies = Some(dependencies);
        self
    }
}

/// Backend that turns a file path into the value it exports.
#[async_trait]
pub trait Evaluator: Send + Sync {
    fn evaluate_blocking(&self, path: &Path) -> anyhow::Result<Evaluated>;

    async fn evaluate(&self, path: &Path) -> anyhow::Result<Evaluated>;
}

/// The collaborators a load runs against.
#[derive(Clone)]
pub struct Host {
    fs: Arc<dyn FileSystem>,
    evaluator: Option<Arc<dyn Evaluator>>,
}

impl Host {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self {
            fs,
            evaluator: None,
        }
    }

    /// Set the backend used for the code-evaluation parser.
    pub fn with_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    pub fn fs(&self) -> &Arc<dyn FileSystem> {
        &self.fs
    }

    pub fn evaluator(&self) -> Option<&Arc<dyn Evaluator>> {
        self.evaluator.as_ref()
    }
}

impl Default for Host {
    fn default() -> Self {
        Self::new(Arc::new(StdFileSystem))
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("evaluator", &self.evaluator.is_some())
            .finish_non_exhaustive()
    }
}
