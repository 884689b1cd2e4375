//! Load subcommand for configseek CLI
//!
//! Loads the configuration and prints it together with its provenance.

use super::SourceArgs;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use serde_json::Value;

/// Output format for the loaded configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Arguments for the load subcommand
#[derive(Args, Debug)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Load and merge every match instead of stopping at the first
    #[arg(short, long)]
    pub merge: bool,

    /// Default values as a JSON object (weakest layer)
    #[arg(short, long, value_name = "JSON")]
    pub defaults: Option<String>,

    /// Program used to evaluate code config files; it receives the path and
    /// must print the exported value as JSON
    #[arg(long, value_name = "PROGRAM")]
    pub evaluator: Option<String>,

    /// Extra arguments passed to the evaluator before the path
    #[arg(long = "evaluator-arg", value_name = "ARG", requires = "evaluator")]
    pub evaluator_args: Vec<String>,

    /// The evaluator prints `{"value": .., "dependencies": [..]}`
    #[arg(long, requires = "evaluator")]
    pub tracked: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Print only the configuration, without sources and dependencies
    #[arg(long)]
    pub config_only: bool,
}

impl LoadArgs {
    /// Parse `--defaults`, or null when absent.
    pub fn defaults_value(&self) -> Result<Value> {
        match self.defaults {
            Some(ref raw) => serde_json::from_str(raw).context("--defaults is not valid JSON"),
            None => Ok(Value::Null),
        }
    }
}

/// Render `value` in the chosen format.
pub fn render(value: &Value, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}
