//! Configuration loader over an ordered list of sources.
//!
//! Sources are searched and loaded strictly in declaration order. Without
//! merging, the first source whose closest file yields a value wins. With
//! merging, every matched file of every source is loaded and the results are
//! deep-merged, earlier ones taking precedence, over `defaults`.

use super::file::load_file_in;
use super::find::{FindUpOptions, find_up_in};
use super::source::SourceDescriptor;
use super::types::{LoadResult, Origin, SourceMatches};
use crate::dual::{Dual, Io};
use crate::error::Result;
use crate::host::Host;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Global options for a [`ConfigLoader`].
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Directory the upward search starts in.
    pub cwd: PathBuf,
    /// Ancestor the search never reaches. Relative paths resolve against
    /// `cwd`. Defaults to the filesystem root.
    pub stop_at: Option<PathBuf>,
    /// Load and merge every match instead of stopping at the first.
    pub merge: bool,
    /// Weakest layer, filling keys no loaded file sets.
    pub defaults: Value,
    /// Follow symbolic links when testing candidates.
    pub allow_symlinks: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

impl LoadOptions {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        let cwd = cwd.as_ref();
        Self {
            cwd: std::path::absolute(cwd).unwrap_or_else(|_| cwd.to_path_buf()),
            stop_at: None,
            merge: false,
            defaults: Value::Null,
            allow_symlinks: true,
        }
    }

    pub fn stop_at(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stop_at = Some(dir.into());
        self
    }

    pub fn merge(mut self, merge: bool) -> Self {
        self.merge = merge;
        self
    }

    pub fn defaults(mut self, defaults: Value) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn allow_symlinks(mut self, allow: bool) -> Self {
        self.allow_symlinks = allow;
        self
    }

    fn find_options(&self) -> FindUpOptions {
        FindUpOptions {
            cwd: self.cwd.clone(),
            stop_at: self.stop_at.clone(),
            multiple: self.merge,
            first_per_directory: self.merge,
            allow_symlinks: self.allow_symlinks,
        }
    }
}

/// Loader that searches for and loads configuration files.
///
/// The last search is cached; [`ConfigLoader::load`] reuses it unless forced.
/// One logical caller should drive a loader at a time.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    sources: Vec<SourceDescriptor>,
    options: LoadOptions,
    host: Host,
    matches: Option<Vec<SourceMatches>>,
}

impl ConfigLoader {
    pub fn new(sources: Vec<SourceDescriptor>, options: LoadOptions) -> Self {
        Self::with_host(sources, options, Host::default())
    }

    pub fn with_host(sources: Vec<SourceDescriptor>, options: LoadOptions, host: Host) -> Self {
        Self {
            sources,
            options,
            host,
            matches: None,
        }
    }

    pub fn sources(&self) -> &[SourceDescriptor] {
        &self.sources
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    /// Matches from the last search, if one ran.
    pub fn matches(&self) -> Option<&[SourceMatches]> {
        self.matches.as_deref()
    }

    /// Search for every source and cache the matches.
    ///
    /// Returns all matched paths in source order.
    pub fn find_configs(&mut self) -> Dual<'_, Vec<PathBuf>> {
        let host = self.host.clone();
        Dual::new(host, move |io| async move { self.find_configs_in(&io).await })
    }

    /// [`ConfigLoader::find_configs`] run under the caller's [`Io`].
    pub async fn find_configs_in(&mut self, io: &Io) -> Result<Vec<PathBuf>> {
        let find_options = self.options.find_options();
        let mut matches = Vec::with_capacity(self.sources.len());

        for (index, source) in self.sources.iter().enumerate() {
            let candidates = source.candidates();
            let files = find_up_in(io, &candidates, &find_options).await;
            debug!(source = index, matched = files.len(), "searched config source");
            matches.push(SourceMatches {
                source: index,
                files,
            });
        }

        let found = matches.iter().flat_map(|m| m.files.iter().cloned()).collect();
        self.matches = Some(matches);
        Ok(found)
    }

    /// Load the configuration, searching first if nothing is cached or `force` is set.
    pub fn load(&mut self, force: bool) -> Dual<'_, LoadResult> {
        let host = self.host.clone();
        Dual::new(host, move |io| async move { self.load_in(&io, force).await })
    }

    /// [`ConfigLoader::load`] run under the caller's [`Io`].
    pub async fn load_in(&mut self, io: &Io, force: bool) -> Result<LoadResult> {
        if force || self.matches.is_none() {
            self.find_configs_in(io).await?;
        }

        let matches = self.matches.as_deref().unwrap_or_default();
        let found_any = matches.iter().any(|m| !m.files.is_empty());
        let mut results = Vec::new();

        for entry in matches {
            let source = &self.sources[entry.source];
            if self.options.merge {
                for file in &entry.files {
                    if let Some(result) = load_file_in(io, file, source).await? {
                        results.push(result);
                    }
                }
            } else if let Some(file) = entry.files.first()
                && let Some(result) = load_file_in(io, file, source).await?
            {
                info!(path = %file.display(), "loaded config");
                return Ok(LoadResult::combine(vec![result], self.options.defaults.clone()));
            }
        }

        if results.is_empty() {
            let origin = if found_any {
                Origin::NoUsableFiles
            } else {
                Origin::NoFilesFound
            };
            debug!(?origin, "falling back to defaults");
            return Ok(LoadResult::defaults_only(self.options.defaults.clone(), origin));
        }

        info!(files = results.len(), "merged config files");
        Ok(LoadResult::combine(results, self.options.defaults.clone()))
    }
}

/// Build a loader and load once.
pub fn load_config(sources: Vec<SourceDescriptor>, options: LoadOptions) -> Dual<'static, LoadResult> {
    load_config_with_host(sources, options, Host::default())
}

/// [`load_config`] against explicit host collaborators.
pub fn load_config_with_host(
    sources: Vec<SourceDescriptor>,
    options: LoadOptions,
    host: Host,
) -> Dual<'static, LoadResult> {
    let loader = ConfigLoader::with_host(sources, options, host.clone());
    Dual::new(host, move |io| async move {
        let mut loader = loader;
        loader.load_in(&io, false).await
    })
}
