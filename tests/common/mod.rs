//! Shared test doubles for the integration suites.

#![allow(dead_code)]

use anyhow::{Context, bail};
use async_trait::async_trait;
use configseek::host::{Evaluated, Evaluator, FileSystem, StdFileSystem};
use serde_json::Value;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Real file system that records every existence probe.
#[derive(Default)]
pub struct CountingFs {
    inner: StdFileSystem,
    probes: AtomicUsize,
    probed: Mutex<Vec<PathBuf>>,
}

impl CountingFs {
    pub fn probes(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.lock().unwrap().clone()
    }

    fn record(&self, path: &Path) {
        self.probes.fetch_add(1, Ordering::SeqCst);
        self.probed.lock().unwrap().push(path.to_path_buf());
    }
}

#[async_trait]
impl FileSystem for CountingFs {
    fn is_file_blocking(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.record(path);
        self.inner.is_file_blocking(path, follow_symlinks)
    }

    async fn is_file(&self, path: &Path, follow_symlinks: bool) -> bool {
        self.record(path);
        self.inner.is_file(path, follow_symlinks).await
    }

    fn read_to_string_blocking(&self, path: &Path) -> io::Result<String> {
        self.inner.read_to_string_blocking(path)
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.inner.read_to_string(path).await
    }

    fn write_blocking(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.inner.write_blocking(path, contents)
    }

    async fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        self.inner.write(path, contents).await
    }

    fn remove_file_blocking(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_file_blocking(path)
    }

    async fn remove_file(&self, path: &Path) -> io::Result<()> {
        self.inner.remove_file(path).await
    }
}

/// Stand-in for a script interpreter: "evaluates" a file by reading it as JSON.
#[derive(Default)]
pub struct JsonEvaluator {
    calls: AtomicUsize,
    evaluated: Mutex<Vec<PathBuf>>,
    dependencies: Option<Vec<PathBuf>>,
}

impl JsonEvaluator {
    /// Evaluator that reports `dependencies` for every file.
    pub fn tracked(dependencies: Vec<PathBuf>) -> Self {
        Self {
            dependencies: Some(dependencies),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn evaluated(&self) -> Vec<PathBuf> {
        self.evaluated.lock().unwrap().clone()
    }

    fn eval(&self, path: &Path, text: &str) -> anyhow::Result<Evaluated> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.evaluated.lock().unwrap().push(path.to_path_buf());
        if text.trim() == "throw" {
            bail!("script threw");
        }
        let value: Value = serde_json::from_str(text).context("script is not an object literal")?;
        let evaluated = Evaluated::new(value);
        Ok(match &self.dependencies {
            Some(deps) => evaluated.with_dependencies(deps.clone()),
            None => evaluated,
        })
    }
}

#[async_trait]
impl Evaluator for JsonEvaluator {
    fn evaluate_blocking(&self, path: &Path) -> anyhow::Result<Evaluated> {
        let text = std::fs::read_to_string(path)?;
        self.eval(path, &text)
    }

    async fn evaluate(&self, path: &Path) -> anyhow::Result<Evaluated> {
        let text = tokio::fs::read_to_string(path).await?;
        self.eval(path, &text)
    }
}

/// Write `contents` to `dir/name`, creating parent directories.
pub fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, contents).unwrap();
    path
}
