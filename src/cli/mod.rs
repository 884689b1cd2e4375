//! Command line for configseek.
//!
//! `find` and `load` share the search flags on [`Cli`] and describe what to
//! look for with [`SourceArgs`], which turns into the loader's source list.

pub mod find;
pub mod load;

use crate::config::{DEFAULT_EXTENSIONS, Parser as ConfigParser, SourceDescriptor, presets};
use clap::{Args, Parser, Subcommand, ValueEnum};
use find::FindArgs;
use load::LoadArgs;
use std::path::PathBuf;

/// Locate, load and merge configuration files
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to start searching from (default: current directory)
    #[arg(long, global = true, env = "CONFIGSEEK_CWD")]
    pub cwd: Option<PathBuf>,

    /// Ancestor directory the search never reaches
    #[arg(long, global = true)]
    pub stop_at: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2", global = true)]
    pub log: String,

    /// Do not follow symbolic links when testing candidates
    #[arg(long, global = true)]
    pub no_symlinks: bool,

    /// Drive the search with the async runtime instead of blocking calls
    #[arg(long = "async", global = true)]
    pub use_async: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the config files that would be considered
    Find(FindArgs),

    /// Load and print the resulting configuration
    Load(LoadArgs),
}

/// Parser selection on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ParserArg {
    /// Literal data first, then code evaluation
    #[default]
    Auto,
    Json,
    Yaml,
    Toml,
    /// Evaluate with the configured evaluator
    Code,
}

impl From<ParserArg> for ConfigParser {
    fn from(arg: ParserArg) -> Self {
        match arg {
            ParserArg::Auto => ConfigParser::Auto,
            ParserArg::Json => ConfigParser::Json,
            ParserArg::Yaml => ConfigParser::Yaml,
            ParserArg::Toml => ConfigParser::Toml,
            ParserArg::Code => ConfigParser::Code,
        }
    }
}

/// Options describing which files to look for.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// Base file names to search for, e.g. `app.config` or `.apprc`
    #[arg(value_name = "NAME")]
    pub names: Vec<String>,

    /// Comma-separated extensions to try (empty entry = bare name)
    #[arg(short, long, value_name = "LIST", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// How matched files are parsed
    #[arg(short, long, value_enum, default_value_t = ParserArg::Auto)]
    pub parser: ParserArg,

    /// Treat files that fail to load as absent
    #[arg(long)]
    pub skip_on_error: bool,

    /// Also read these fields from package.json (first present wins)
    #[arg(long, value_name = "FIELD", value_delimiter = ',')]
    pub package_json: Option<Vec<String>>,

    /// Also read `[package.metadata.<TOOL>]` from Cargo.toml
    #[arg(long, value_name = "TOOL")]
    pub cargo_metadata: Option<String>,
}

impl SourceArgs {
    /// Build the source list: named files first, then manifest presets.
    pub fn descriptors(&self) -> Vec<SourceDescriptor> {
        let mut sources = Vec::new();

        if !self.names.is_empty() {
            let extensions = self.extensions.clone().unwrap_or_else(|| {
                DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect()
            });
            sources.push(
                SourceDescriptor::new(self.names.clone())
                    .extensions(extensions)
                    .parser(self.parser.into())
                    .skip_on_error(self.skip_on_error),
            );
        }

        if let Some(ref fields) = self.package_json {
            sources.push(presets::package_json_field(fields.clone()).skip_on_error(self.skip_on_error));
        }

        if let Some(ref tool) = self.cargo_metadata {
            sources.push(presets::cargo_metadata(tool.clone()).skip_on_error(self.skip_on_error));
        }

        sources
    }
}
