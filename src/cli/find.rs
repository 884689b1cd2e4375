//! Find subcommand for configseek CLI
//!
//! Prints every file the loader would consider, closest first.

use super::SourceArgs;
use clap::Args;

/// Arguments for the find subcommand
#[derive(Args, Debug)]
pub struct FindArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Report every match instead of only the closest per source
    #[arg(short, long)]
    pub all: bool,
}
