//! Evaluator that delegates to an external program.
//!
//! The program is run with its configured arguments followed by the config
//! file path, and must print the exported value as JSON on stdout. A tracked
//! program prints `{"value": ..., "dependencies": [...]}` instead.

use super::{Evaluated, Evaluator};
use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::Output;

#[derive(Deserialize)]
struct TrackedOutput {
    value: Value,
    #[serde(default)]
    dependencies: Vec<PathBuf>,
}

/// Runs `program [args..] <path>` and reads the exported value from stdout.
#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    program: String,
    args: Vec<String>,
    tracked: bool,
}

impl CommandEvaluator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            tracked: false,
        }
    }

    /// Evaluator whose program also reports the files it read.
    pub fn tracked(program: impl Into<String>) -> Self {
        Self {
            tracked: true,
            ..Self::new(program)
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn is_tracked(&self) -> bool {
        self.tracked
    }

    fn decode(&self, path: &Path, output: Output) -> Result<Evaluated> {
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!(
                "{} exited with {} while evaluating {}: {}",
                self.program,
                output.status,
                path.display(),
                stderr.trim()
            );
        }

        let stdout = String::from_utf8(output.stdout)
            .with_context(|| format!("{} printed non UTF-8 output", self.program))?;

        if self.tracked {
            let tracked: TrackedOutput = serde_json::from_str(&stdout)
                .with_context(|| format!("{} printed malformed tracked output", self.program))?;
            Ok(Evaluated::new(tracked.value).with_dependencies(tracked.dependencies))
        } else {
            let value: Value = serde_json::from_str(&stdout)
                .with_context(|| format!("{} printed invalid JSON", self.program))?;
            Ok(Evaluated::new(value))
        }
    }
}

#[async_trait]
impl Evaluator for CommandEvaluator {
    fn evaluate_blocking(&self, path: &Path) -> Result<Evaluated> {
        let output = std::process::Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .with_context(|| format!("failed to spawn {}", self.program))?;
        self.decode(path, output)
    }

    async fn evaluate(&self, path: &Path) -> Result<Evaluated> {
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .await
            .with_context(|| format!("failed to spawn {}", self.program))?;
        self.decode(path, output)
    }
}
