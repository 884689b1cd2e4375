//! Upward file search.
//!
//! Walks from a starting directory toward a boundary, testing candidate
//! relative paths in each directory it visits.

use crate::dual::{Dual, Io};
use crate::host::Host;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Options for [`find_up`].
#[derive(Debug, Clone)]
pub struct FindUpOptions {
    /// Directory the search starts in.
    pub cwd: PathBuf,
    /// Ancestor at which the search stops. Never tested itself.
    /// Relative paths resolve against `cwd`. Defaults to the root of `cwd`.
    pub stop_at: Option<PathBuf>,
    /// Collect every match instead of returning the first one.
    pub multiple: bool,
    /// With `multiple`, keep only the first matching candidate per directory.
    pub first_per_directory: bool,
    /// Follow symbolic links when testing whether a candidate is a file.
    pub allow_symlinks: bool,
}

impl FindUpOptions {
    pub fn new(cwd: impl AsRef<Path>) -> Self {
        let cwd = cwd.as_ref();
        Self {
            cwd: std::path::absolute(cwd).unwrap_or_else(|_| cwd.to_path_buf()),
            stop_at: None,
            multiple: false,
            first_per_directory: false,
            allow_symlinks: true,
        }
    }

    pub fn stop_at(mut self, dir: impl Into<PathBuf>) -> Self {
        self.stop_at = Some(dir.into());
        self
    }

    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn first_per_directory(mut self, first: bool) -> Self {
        self.first_per_directory = first;
        self
    }

    pub fn allow_symlinks(mut self, allow: bool) -> Self {
        self.allow_symlinks = allow;
        self
    }
}

/// Find `candidates` in `options.cwd` or any ancestor below `options.stop_at`.
///
/// Matches are ordered closest directory first, then by candidate order.
pub fn find_up<'a>(
    host: &Host,
    candidates: &'a [String],
    options: &'a FindUpOptions,
) -> Dual<'a, Vec<PathBuf>> {
    Dual::new(host.clone(), move |io| async move {
        Ok(find_up_in(&io, candidates, options).await)
    })
}

/// [`find_up`] run under the caller's [`Io`].
pub async fn find_up_in(io: &Io, candidates: &[String], options: &FindUpOptions) -> Vec<PathBuf> {
    let cwd = normalize(&options.cwd);
    let stop_at = match &options.stop_at {
        Some(dir) => normalize(&cwd.join(dir)),
        None => root_of(&cwd),
    };

    let mut matches = Vec::new();
    let mut dir = cwd.as_path();
    loop {
        if dir == stop_at.as_path() {
            break;
        }

        for candidate in candidates {
            let path = dir.join(candidate);
            if !io.is_file(&path, options.allow_symlinks).await {
                continue;
            }
            debug!(path = %path.display(), "found config candidate");
            if !options.multiple {
                return vec![path];
            }
            matches.push(path);
            if options.first_per_directory {
                break;
            }
        }

        match dir.parent() {
            Some(parent) if parent != dir => dir = parent,
            _ => break,
        }
    }
    matches
}

/// Convenience wrapper returning the closest match only.
pub fn find_up_first<'a>(
    host: &Host,
    candidates: &'a [String],
    options: &'a FindUpOptions,
) -> Dual<'a, Option<PathBuf>> {
    Dual::new(host.clone(), move |io| async move {
        let options = FindUpOptions {
            multiple: false,
            ..options.clone()
        };
        Ok(find_up_in(&io, candidates, &options).await.into_iter().next())
    })
}

fn root_of(path: &Path) -> PathBuf {
    path.ancestors()
        .last()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

/// Resolve `.` and `..` lexically.
fn normalize(path: &Path) -> PathBuf {
    let mut components = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if let Some(Component::Normal(_)) = components.last() {
                    components.pop();
                } else if !matches!(
                    components.last(),
                    Some(Component::RootDir | Component::Prefix(_))
                ) {
                    components.push(Component::ParentDir);
                }
            }
            other => components.push(other),
        }
    }
    components.iter().collect()
}
