//! configseek
//!
//! Command-line front end for inspecting which configuration files a tool
//! would pick up and what they merge into.

use anyhow::{Result, bail};
use clap::Parser;
use configseek::cli::find::FindArgs;
use configseek::cli::load::{LoadArgs, render};
use configseek::cli::{Cli, Command};
use configseek::config::{ConfigLoader, FindUpOptions, LoadOptions, find_up};
use configseek::host::{CommandEvaluator, Host};
use configseek::logging::{self, LogTarget};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

fn working_dir(cli: &Cli) -> Result<PathBuf> {
    match &cli.cwd {
        Some(dir) => Ok(std::path::absolute(dir)?),
        None => Ok(std::env::current_dir()?),
    }
}

/// `--stop-at` as typed in the shell, relative to the process directory.
fn stop_dir(cli: &Cli) -> Result<Option<PathBuf>> {
    Ok(cli.stop_at.as_deref().map(std::path::absolute).transpose()?)
}

async fn run_find(cli: &Cli, args: &FindArgs) -> Result<()> {
    let sources = args.source.descriptors();
    if sources.is_empty() {
        bail!("nothing to search for: pass file names or a manifest preset");
    }

    let host = Host::default();
    let cwd = working_dir(cli)?;
    for source in &sources {
        let candidates = source.candidates();
        let mut options = FindUpOptions::new(&cwd)
            .multiple(args.all)
            .allow_symlinks(!cli.no_symlinks);
        if let Some(stop_at) = stop_dir(cli)? {
            options = options.stop_at(stop_at);
        }

        let search = find_up(&host, &candidates, &options);
        let found = if cli.use_async {
            search.await?
        } else {
            search.sync()?
        };
        for path in found {
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn run_load(cli: &Cli, args: &LoadArgs) -> Result<()> {
    let sources = args.source.descriptors();
    if sources.is_empty() {
        bail!("nothing to load: pass file names or a manifest preset");
    }

    let mut options = LoadOptions::new(working_dir(cli)?)
        .merge(args.merge)
        .defaults(args.defaults_value()?)
        .allow_symlinks(!cli.no_symlinks);
    if let Some(stop_at) = stop_dir(cli)? {
        options = options.stop_at(stop_at);
    }

    let mut host = Host::default();
    if let Some(ref program) = args.evaluator {
        let evaluator = if args.tracked {
            CommandEvaluator::tracked(program.clone())
        } else {
            CommandEvaluator::new(program.clone())
        };
        host = host.with_evaluator(Arc::new(evaluator.args(args.evaluator_args.clone())));
    }

    let mut loader = ConfigLoader::with_host(sources, options, host);
    let result = if cli.use_async {
        loader.load(false).await?
    } else {
        loader.load(false).sync()?
    };
    debug!(origin = ?result.origin, sources = result.sources.len(), "load finished");

    let output = if args.config_only {
        result.config
    } else {
        json!({
            "config": result.config,
            "sources": result.sources,
            "dependencies": result.dependencies,
            "origin": result.origin,
        })
    };
    println!("{}", render(&output, args.format)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose, &LogTarget::parse(&cli.log))?;

    match &cli.command {
        Command::Find(args) => run_find(&cli, args).await,
        Command::Load(args) => run_load(&cli, args).await,
    }
}
